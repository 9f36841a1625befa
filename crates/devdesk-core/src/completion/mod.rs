//! The completion service seam.
//!
//! A `CompletionService` turns a conversation history plus a routing
//! configuration into a lazily produced [`StreamedRun`]. The turn controller
//! only depends on this trait, so tests can drive it with scripted runs.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};

use devdesk_types::agent::{RoutingConfig, RunEvent};
use devdesk_types::chat::History;
use devdesk_types::llm::LlmError;

/// Boxed stream of run events.
pub type RunEventStream = Pin<Box<dyn Stream<Item = Result<RunEvent, LlmError>> + Send + 'static>>;

/// Produces streamed agent runs.
pub trait CompletionService: Send + Sync {
    /// Start a run over `history`, entering at `routing.entry_agent`.
    ///
    /// Nothing is sent to the model until the returned run is polled.
    fn run_streamed(
        &self,
        history: History,
        routing: Arc<RoutingConfig>,
    ) -> Result<StreamedRun, LlmError>;
}

/// One in-flight run: a sequence of events followed by a final output.
///
/// Not restartable. After an error or exhaustion, `next_event` keeps
/// returning `None`.
pub struct StreamedRun {
    events: RunEventStream,
    final_output: Option<String>,
    last_agent: Option<String>,
    finished: bool,
}

impl StreamedRun {
    pub fn new(events: RunEventStream) -> Self {
        Self {
            events,
            final_output: None,
            last_agent: None,
            finished: false,
        }
    }

    /// Build a run that replays a fixed list of events.
    pub fn from_events(events: Vec<Result<RunEvent, LlmError>>) -> Self {
        Self::new(Box::pin(futures_util::stream::iter(events)))
    }

    /// Next event of the run, or `None` once it is over.
    pub async fn next_event(&mut self) -> Option<Result<RunEvent, LlmError>> {
        if self.finished {
            return None;
        }

        match self.events.next().await {
            Some(Ok(event)) => {
                if let RunEvent::Completed {
                    final_output,
                    last_agent,
                } = &event
                {
                    self.final_output = Some(final_output.clone());
                    self.last_agent = Some(last_agent.clone());
                }
                Some(Ok(event))
            }
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(e))
            }
            None => {
                self.finished = true;
                None
            }
        }
    }

    /// The assembled reply. Set once the terminal `Completed` event was seen.
    pub fn final_output(&self) -> Option<&str> {
        self.final_output.as_deref()
    }

    /// The agent that produced the final output.
    pub fn last_agent(&self) -> Option<&str> {
        self.last_agent.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl std::fmt::Debug for StreamedRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamedRun")
            .field("final_output", &self.final_output)
            .field("last_agent", &self.last_agent)
            .field("finished", &self.finished)
            .finish()
    }
}
