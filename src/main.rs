use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::Result;
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use etrace::action::Action;
use etrace::app::{App, Effect, InputMode, Overlay};
use etrace::config::{Cli, ConfigFile, Settings};
use etrace::event::{key_to_action, AppEvent, EventHandler};
use etrace::source::{EventSource, FileEventSource};
use etrace::timeline::Timeline;
use etrace::widgets;
use etrace::worker::{LoadHandle, LoadRequest, LoadWorker};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let (config_file, config_error) = match ConfigFile::load() {
        Ok(file) => (file, None),
        Err(e) => (None, Some(e)),
    };
    let settings = Settings::resolve(cli, config_file)?;

    // Held for the life of the process so buffered log lines are flushed on exit
    let log_guard = match settings.log_file {
        Some(ref path) => Some(init_logging(path)?),
        None => None,
    };
    if let Some(e) = config_error {
        match log_guard {
            Some(_) => tracing::warn!("{}", e),
            None => eprintln!("warning: {}", e),
        }
    }

    let source: Arc<dyn EventSource> = Arc::new(FileEventSource::new(settings.events.clone()));

    if settings.json {
        return print_json(source.as_ref()).await;
    }

    run_tui(settings, source).await
}

fn init_logging(path: &Path) -> Result<WorkerGuard> {
    let file = std::fs::File::create(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    Ok(guard)
}

async fn print_json(source: &dyn EventSource) -> Result<()> {
    let timeline = Timeline::new(source.load_events().await?);
    let output = timeline.export(Utc::now());
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run_tui(settings: Settings, source: Arc<dyn EventSource>) -> Result<()> {
    let mut app = App::new(source.describe());

    // Set up channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let (worker, load_handle) = LoadWorker::new(source, action_tx);
    tokio::spawn(worker.run());

    // Initial data load
    let effects = app.update(Action::Refresh);
    handle_effects(effects, &load_handle);

    let mut terminal = etrace::tui::init()?;
    let mut events = EventHandler::new(settings.tick_rate);

    loop {
        terminal.draw(|frame| render(&mut app, frame))?;

        tokio::select! {
            Some(event) = events.next() => {
                let action = match event {
                    AppEvent::Key(key) => {
                        key_to_action(key, &app.input_mode, &app.overlay, &app.input_buffer)
                    }
                    AppEvent::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    let effects = app.update(action);
                    handle_effects(effects, &load_handle);
                }
            }
            Some(action) = action_rx.recv() => {
                let effects = app.update(action);
                handle_effects(effects, &load_handle);
            }
        }

        if app.should_quit {
            break;
        }
    }

    etrace::tui::restore()?;

    Ok(())
}

fn render(app: &mut App, frame: &mut ratatui::Frame) {
    let area = frame.area();

    frame.render_widget(
        ratatui::widgets::Block::default()
            .style(ratatui::style::Style::default().bg(etrace::theme::BG_DARK)),
        area,
    );

    let command_mode = app.input_mode == InputMode::Command;
    let layout = Layout::vertical([
        Constraint::Length(1),                        // Status bar
        Constraint::Length(1),                        // Facets
        Constraint::Fill(1),                          // Timeline
        Constraint::Length(u16::from(command_mode)), // Suggestions
        Constraint::Length(1),                        // Footer / command line
    ])
    .split(area);

    widgets::status_bar::render(app, frame, layout[0]);
    widgets::facet_bar::render(app, frame, layout[1]);
    widgets::timeline_list::render(app, frame, layout[2]);

    if command_mode {
        widgets::command_input::render_suggestions(app, frame, layout[3]);
        widgets::command_input::render(app, frame, layout[4]);
    } else {
        widgets::footer::render(app, frame, layout[4]);
    }

    if app.overlay == Overlay::Help {
        widgets::help_overlay::render(frame, area);
    }

    widgets::error_toast::render(app, frame, area);
}

fn handle_effects(effects: Vec<Effect>, load_handle: &LoadHandle) {
    for effect in effects {
        match effect {
            Effect::LoadEvents => load_handle.send(LoadRequest::Events),
            Effect::Quit => {}
        }
    }
}
