//! Where outward UI events go.
//!
//! The turn controller never knows whether it is talking to a WebSocket, a
//! terminal or a test. Emission is synchronous and never fails the turn: a
//! UI that has gone away simply stops receiving.

use tokio::sync::mpsc;
use tracing::debug;

use devdesk_types::event::UiEvent;

/// Receives UI events in emission order.
pub trait UiSink: Send + Sync {
    fn emit(&self, event: UiEvent);
}

impl UiSink for mpsc::UnboundedSender<UiEvent> {
    fn emit(&self, event: UiEvent) {
        if self.send(event).is_err() {
            debug!("UI receiver dropped; discarding event");
        }
    }
}

/// Records every event it receives.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: std::sync::Mutex<Vec<UiEvent>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Text of every `StreamFragment`, in order.
    pub(crate) fn fragments(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::StreamFragment { text } => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl UiSink for RecordingSink {
    fn emit(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }
}
