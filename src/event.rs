use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::app::{InputMode, Overlay};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

/// Terminal key events merged with a fixed-rate tick.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if tx.send(AppEvent::Tick).is_err() {
                            break;
                        }
                    }
                    event = reader.next() => {
                        match event {
                            Some(Ok(Event::Key(key))) => {
                                if tx.send(AppEvent::Key(key)).is_err() {
                                    break;
                                }
                            }
                            Some(Ok(_)) => {}
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Map a key event to an action based on current app state
pub fn key_to_action(
    key: KeyEvent,
    input_mode: &InputMode,
    overlay: &Overlay,
    input_buffer: &str,
) -> Option<Action> {
    if let Overlay::Help = overlay {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Some(Action::ToggleHelp),
            _ => None,
        };
    }

    match input_mode {
        InputMode::Command => {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseOverlay),
                KeyCode::Enter => Some(Action::SubmitCommandInput(input_buffer.to_string())),
                KeyCode::Tab => {
                    // Complete to the first matching command
                    let input_cmd = input_buffer.split_whitespace().next().unwrap_or("");
                    let matches = crate::input::commands::matching_commands(input_cmd);
                    matches
                        .first()
                        .map(|cmd| Action::UpdateInputBuffer(format!("{} ", cmd.name)))
                }
                KeyCode::Backspace => {
                    let mut buf = input_buffer.to_string();
                    buf.pop();
                    Some(Action::UpdateInputBuffer(buf))
                }
                KeyCode::Char(c) => {
                    let mut buf = input_buffer.to_string();
                    buf.push(c);
                    Some(Action::UpdateInputBuffer(buf))
                }
                _ => None,
            };
        }
        InputMode::PendingG => {
            return match key.code {
                KeyCode::Char('g') => Some(Action::NavigateTop),
                _ => Some(Action::Back), // Cancel the pending chord
            };
        }
        InputMode::Normal => {}
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('d') => Some(Action::PageDown),
            KeyCode::Char('u') => Some(Action::PageUp),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char(':') => Some(Action::OpenCommandInput),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::NavigateDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::NavigateUp),
        KeyCode::Char('g') => Some(Action::EnterPendingG),
        KeyCode::Char('G') => Some(Action::NavigateBottom),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ToggleExpand),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::FacetLeft),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::FacetRight),
        KeyCode::Char('f') => Some(Action::ToggleFacetAtCursor),
        KeyCode::Char('x') => Some(Action::ClearFilter),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|digit| Action::ToggleFacet(digit as usize - 1)),
        KeyCode::Esc => Some(Action::Back),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn normal(code: KeyCode) -> Option<Action> {
        key_to_action(key(code), &InputMode::Normal, &Overlay::None, "")
    }

    #[test]
    fn digits_toggle_facets_by_position() {
        assert!(matches!(normal(KeyCode::Char('1')), Some(Action::ToggleFacet(0))));
        assert!(matches!(normal(KeyCode::Char('9')), Some(Action::ToggleFacet(8))));
        assert!(normal(KeyCode::Char('0')).is_none());
    }

    #[test]
    fn enter_and_space_toggle_expansion() {
        assert!(matches!(normal(KeyCode::Enter), Some(Action::ToggleExpand)));
        assert!(matches!(normal(KeyCode::Char(' ')), Some(Action::ToggleExpand)));
    }

    #[test]
    fn ctrl_r_reloads() {
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        let action = key_to_action(ctrl_r, &InputMode::Normal, &Overlay::None, "");
        assert!(matches!(action, Some(Action::Refresh)));
    }

    #[test]
    fn pending_g_chord() {
        let top = key_to_action(key(KeyCode::Char('g')), &InputMode::PendingG, &Overlay::None, "");
        assert!(matches!(top, Some(Action::NavigateTop)));
        let cancel = key_to_action(key(KeyCode::Char('j')), &InputMode::PendingG, &Overlay::None, "");
        assert!(matches!(cancel, Some(Action::Back)));
    }

    #[test]
    fn command_mode_edits_buffer_and_completes() {
        let typed = key_to_action(key(KeyCode::Char('x')), &InputMode::Command, &Overlay::None, "fil");
        assert!(matches!(typed, Some(Action::UpdateInputBuffer(ref b)) if b == "filx"));

        let completed = key_to_action(key(KeyCode::Tab), &InputMode::Command, &Overlay::None, "rel");
        assert!(matches!(completed, Some(Action::UpdateInputBuffer(ref b)) if b == "reload "));

        let submit = key_to_action(key(KeyCode::Enter), &InputMode::Command, &Overlay::None, "clear");
        assert!(matches!(submit, Some(Action::SubmitCommandInput(ref c)) if c == "clear"));
    }

    #[test]
    fn help_overlay_swallows_other_keys() {
        let action = key_to_action(key(KeyCode::Char('j')), &InputMode::Normal, &Overlay::Help, "");
        assert!(action.is_none());
        let close = key_to_action(key(KeyCode::Esc), &InputMode::Normal, &Overlay::Help, "");
        assert!(matches!(close, Some(Action::ToggleHelp)));
    }
}
