use std::time::{Duration, Instant};

use ratatui::widgets::ListState;

use crate::action::Action;
use crate::domain::RawEvent;
use crate::input::commands::find_command;
use crate::stats::ActivityStats;
use crate::timeline::Timeline;

const ERROR_TOAST_TTL: Duration = Duration::from_secs(5);
const PAGE_HEIGHT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    PendingG,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
    Error(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadEvents,
    Quit,
}

pub struct App {
    // View state
    pub input_mode: InputMode,
    pub overlay: Overlay,

    // Data
    pub source_name: String,
    pub timeline: Timeline,
    pub stats: ActivityStats,
    pub load_state: LoadState,
    pub last_refresh: Option<Instant>,

    // Cursors
    pub list_state: ListState,
    pub facet_cursor: usize,

    // Input
    pub input_buffer: String,

    // App
    pub should_quit: bool,
    pub last_error: Option<(String, Instant)>,
}

impl App {
    pub fn new(source_name: String) -> Self {
        Self {
            input_mode: InputMode::Normal,
            overlay: Overlay::None,

            source_name,
            timeline: Timeline::default(),
            stats: ActivityStats::default(),
            load_state: LoadState::NotLoaded,
            last_refresh: None,

            list_state: ListState::default(),
            facet_cursor: 0,

            input_buffer: String::new(),

            should_quit: false,
            last_error: None,
        }
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        // Clear stale error toasts
        if let Some((_, at)) = &self.last_error {
            if at.elapsed() > ERROR_TOAST_TTL {
                self.last_error = None;
            }
        }

        match action {
            // Navigation
            Action::NavigateUp => {
                self.navigate_up();
                vec![]
            }
            Action::NavigateDown => {
                self.navigate_down();
                vec![]
            }
            Action::NavigateTop => {
                self.input_mode = InputMode::Normal;
                if self.visible_len() > 0 {
                    self.list_state.select_first();
                }
                vec![]
            }
            Action::NavigateBottom => {
                let len = self.visible_len();
                if len > 0 {
                    self.list_state.select(Some(len - 1));
                }
                vec![]
            }
            Action::PageUp => {
                for _ in 0..PAGE_HEIGHT {
                    self.navigate_up();
                }
                vec![]
            }
            Action::PageDown => {
                for _ in 0..PAGE_HEIGHT {
                    self.navigate_down();
                }
                vec![]
            }
            Action::Back => {
                self.input_mode = InputMode::Normal;
                self.last_error = None;
                vec![]
            }

            // Vim chord
            Action::EnterPendingG => {
                self.input_mode = InputMode::PendingG;
                vec![]
            }

            // Timeline
            Action::ToggleExpand => {
                if let Some(id) = self.selected_event().map(|event| event.id.clone()) {
                    self.timeline.toggle_expanded(&id);
                }
                vec![]
            }
            Action::FacetLeft => {
                self.facet_cursor = self.facet_cursor.saturating_sub(1);
                vec![]
            }
            Action::FacetRight => {
                let groups = self.timeline.groups().len();
                if self.facet_cursor + 1 < groups {
                    self.facet_cursor += 1;
                }
                vec![]
            }
            Action::ToggleFacetAtCursor => {
                self.toggle_facet(self.facet_cursor);
                vec![]
            }
            Action::ToggleFacet(index) => {
                if index < self.timeline.groups().len() {
                    self.facet_cursor = index;
                }
                self.toggle_facet(index);
                vec![]
            }
            Action::ClearFilter => {
                self.timeline.clear_filter();
                self.clamp_selection();
                vec![]
            }

            // UI
            Action::OpenCommandInput => {
                self.input_mode = InputMode::Command;
                self.input_buffer.clear();
                vec![]
            }
            Action::CloseOverlay => {
                if self.overlay != Overlay::None {
                    self.overlay = Overlay::None;
                } else if self.input_mode != InputMode::Normal {
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                }
                vec![]
            }
            Action::SubmitCommandInput(cmd) => {
                self.input_mode = InputMode::Normal;
                let effects = self.execute_command(&cmd);
                self.input_buffer.clear();
                effects
            }
            Action::UpdateInputBuffer(buf) => {
                self.input_buffer = buf;
                vec![]
            }
            Action::ToggleHelp => {
                self.overlay = if self.overlay == Overlay::Help {
                    Overlay::None
                } else {
                    Overlay::Help
                };
                vec![]
            }

            // Data responses
            Action::EventsLoaded(events) => {
                self.apply_events(events);
                vec![]
            }

            // App control
            Action::Refresh => self.reload(),
            Action::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            Action::Tick => vec![],
            Action::Error(msg) => {
                tracing::error!("{}", msg);
                if self.load_state.is_loading() {
                    self.load_state = LoadState::Error(msg.clone());
                }
                self.last_error = Some((msg, Instant::now()));
                vec![]
            }
        }
    }

    /// The event under the list cursor, if any.
    pub fn selected_event(&self) -> Option<&RawEvent> {
        let idx = self.list_state.selected()?;
        self.timeline.visible().get(idx).copied()
    }

    pub fn visible_len(&self) -> usize {
        self.timeline.visible().len()
    }

    fn apply_events(&mut self, events: Vec<RawEvent>) {
        self.timeline.set_events(events);
        self.stats = ActivityStats::from_events(self.timeline.events());
        self.load_state = LoadState::Loaded;
        self.last_refresh = Some(Instant::now());

        let groups = self.timeline.groups().len();
        if self.facet_cursor >= groups {
            self.facet_cursor = groups.saturating_sub(1);
        }
        self.clamp_selection();
    }

    fn reload(&mut self) -> Vec<Effect> {
        if self.load_state.is_loading() {
            return vec![];
        }
        self.load_state = LoadState::Loading;
        vec![Effect::LoadEvents]
    }

    fn toggle_facet(&mut self, index: usize) {
        let Some(representative) = self
            .timeline
            .groups()
            .get(index)
            .map(|group| group.representative_type.clone())
        else {
            return;
        };
        self.timeline.toggle_filter(&representative);
        self.clamp_selection();
    }

    fn navigate_up(&mut self) {
        if let Some(idx) = self.list_state.selected() {
            self.list_state.select(Some(idx.saturating_sub(1)));
        }
    }

    fn navigate_down(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        match self.list_state.selected() {
            Some(idx) if idx + 1 < len => self.list_state.select(Some(idx + 1)),
            Some(_) => {}
            None => self.list_state.select_first(),
        }
    }

    /// Keep the list cursor inside the visible range after the list changed.
    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let idx = self.list_state.selected().unwrap_or(0).min(len - 1);
        self.list_state.select(Some(idx));
    }

    fn execute_command(&mut self, cmd: &str) -> Vec<Effect> {
        let parts: Vec<&str> = cmd.trim().splitn(2, ' ').collect();
        let command = parts[0];
        let args = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

        let Some(def) = find_command(command) else {
            if !command.is_empty() {
                self.set_error(format!("unknown command: {}", command));
            }
            return vec![];
        };

        match def.name {
            "filter" => {
                let Some(target) = args else {
                    self.set_error("usage: :filter <label|type>".to_string());
                    return vec![];
                };
                match self.facet_index(target) {
                    Some(index) => {
                        self.facet_cursor = index;
                        self.toggle_facet(index);
                    }
                    None => self.set_error(format!("no facet matches: {}", target)),
                }
                vec![]
            }
            "clear" => self.update(Action::ClearFilter),
            "expand" => {
                self.timeline.expand_visible();
                vec![]
            }
            "collapse" => {
                self.timeline.collapse_all();
                vec![]
            }
            "reload" => self.reload(),
            "quit" => self.update(Action::Quit),
            "help" => {
                self.overlay = Overlay::Help;
                vec![]
            }
            _ => vec![],
        }
    }

    /// Facet whose label or one of whose raw types equals `target`, ignoring case.
    fn facet_index(&self, target: &str) -> Option<usize> {
        self.timeline.groups().iter().position(|group| {
            group.label.eq_ignore_ascii_case(target)
                || group
                    .member_types
                    .iter()
                    .any(|t| t.eq_ignore_ascii_case(target))
        })
    }

    fn set_error(&mut self, msg: String) {
        self.last_error = Some((msg, Instant::now()));
    }
}
