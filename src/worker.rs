use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::action::Action;
use crate::domain::RawEvent;
use crate::source::EventSource;

#[derive(Debug)]
pub enum LoadRequest {
    Events,
}

#[derive(Clone)]
pub struct LoadHandle {
    tx: mpsc::UnboundedSender<LoadRequest>,
}

impl LoadHandle {
    pub fn send(&self, request: LoadRequest) {
        let _ = self.tx.send(request);
    }
}

/// Runs source loads off the UI loop and reports each result as one action.
pub struct LoadWorker {
    source: Arc<dyn EventSource>,
    rx: mpsc::UnboundedReceiver<LoadRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl LoadWorker {
    pub fn new(
        source: Arc<dyn EventSource>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> (Self, LoadHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = LoadHandle { tx };
        let worker = Self {
            source,
            rx,
            action_tx,
        };
        (worker, handle)
    }

    pub async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            let action = self.process(request).await;
            if self.action_tx.send(action).is_err() {
                break;
            }
        }
    }

    async fn process(&self, request: LoadRequest) -> Action {
        match request {
            LoadRequest::Events => match self.source.load_events().await {
                Ok(events) => {
                    info!("loaded {} events from {}", events.len(), self.source.describe());
                    warn_unparsable_timestamps(&events);
                    Action::EventsLoaded(events)
                }
                Err(e) => Action::Error(format!("failed to load events: {}", e)),
            },
        }
    }
}

fn warn_unparsable_timestamps(events: &[RawEvent]) {
    for event in events.iter().filter(|e| e.timestamp().is_none()) {
        warn!(
            "event {} has unparsable created_at {:?}; showing it verbatim",
            event.id, event.created_at
        );
    }
}
