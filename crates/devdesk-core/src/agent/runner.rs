//! HandoffRunner -- the provider-backed completion service.
//!
//! Each provider call is made on behalf of one "active" agent: its system
//! prompt, plus one transfer tool per handoff target. When the model calls a
//! transfer tool the runner switches the active agent and calls the provider
//! again with the same history. The model decides; the runner only obeys.

use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{debug, info, info_span};

use devdesk_types::agent::{AgentSpec, RoutingConfig, RunEvent};
use devdesk_types::chat::History;
use devdesk_types::config::ProviderSettings;
use devdesk_types::llm::{
    CompletionRequest, LlmError, Message, ProviderCapabilities, StreamEvent,
};

use crate::completion::{CompletionService, RunEventStream, StreamedRun};
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::instrumented::InstrumentedStream;

use super::prompt::AgentPromptBuilder;

/// Default cap on handoffs within a single run.
pub const DEFAULT_MAX_HANDOFFS: usize = 8;

/// Per-request model settings shared by every agent.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub max_handoffs: usize,
}

impl From<&ProviderSettings> for RunnerSettings {
    fn from(settings: &ProviderSettings) -> Self {
        Self {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            max_handoffs: settings.max_handoffs,
        }
    }
}

/// Runs agents against an LLM provider, following model-initiated handoffs.
pub struct HandoffRunner {
    provider: Arc<BoxLlmProvider>,
    settings: RunnerSettings,
}

impl HandoffRunner {
    pub fn new(provider: BoxLlmProvider, settings: RunnerSettings) -> Self {
        Self {
            provider: Arc::new(provider),
            settings,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// `max_tokens` never exceeds what the provider can produce.
    fn build_request(
        settings: &RunnerSettings,
        capabilities: &ProviderCapabilities,
        routing: &RoutingConfig,
        agent: &AgentSpec,
        messages: &[Message],
    ) -> CompletionRequest {
        CompletionRequest {
            model: settings.model.clone(),
            messages: messages.to_vec(),
            system: Some(AgentPromptBuilder::build(routing, agent)),
            max_tokens: settings.max_tokens.min(capabilities.max_output_tokens),
            temperature: settings.temperature,
            stream: true,
            tools: AgentPromptBuilder::handoff_tools(routing, agent),
        }
    }
}

impl CompletionService for HandoffRunner {
    fn run_streamed(
        &self,
        history: History,
        routing: Arc<RoutingConfig>,
    ) -> Result<StreamedRun, LlmError> {
        let entry = routing
            .entry()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
            .name
            .clone();
        if !self.provider.capabilities().tool_calling
            && routing.agents.iter().any(|a| !a.handoffs.is_empty())
        {
            return Err(LlmError::InvalidRequest(format!(
                "provider '{}' does not support tool calling, which handoffs require",
                self.provider.name()
            )));
        }
        let messages: Vec<Message> = history.iter().map(Message::from).collect();
        let provider = Arc::clone(&self.provider);
        let settings = self.settings.clone();

        let events: RunEventStream = Box::pin(async_stream::try_stream! {
            let mut active = entry;
            let mut final_output = String::new();
            let mut handoffs = 0usize;

            yield RunEvent::AgentUpdated { agent: active.clone() };

            loop {
                let agent = routing.agent(&active).ok_or_else(|| {
                    LlmError::InvalidRequest(format!("agent '{active}' is not defined"))
                })?;
                let request = Self::build_request(
                    &settings,
                    provider.capabilities(),
                    &routing,
                    agent,
                    &messages,
                );

                let span = info_span!(
                    "gen_ai.agent",
                    gen_ai.system = provider.name(),
                    gen_ai.request.model = %request.model,
                    gen_ai.request.max_tokens = request.max_tokens,
                    gen_ai.agent.name = %agent.name,
                    gen_ai.request.tools = request.tools.len(),
                );
                let mut stream = InstrumentedStream::new(provider.stream(request), span);
                let mut next_agent: Option<String> = None;

                while let Some(event) = stream.next().await {
                    match event? {
                        StreamEvent::TextDelta { text, .. } => {
                            final_output.push_str(&text);
                            yield RunEvent::TextDelta { text };
                        }
                        StreamEvent::ToolUseComplete { id, name, .. } => {
                            let target = AgentPromptBuilder::resolve_handoff(&routing, agent, &name)
                                .ok_or_else(|| {
                                    LlmError::InvalidRequest(format!(
                                        "agent '{}' called unknown tool '{name}'",
                                        agent.name
                                    ))
                                })?;
                            if next_agent.is_none() {
                                next_agent = Some(target);
                            } else {
                                debug!(tool_call_id = %id, tool = %name, "Ignoring extra handoff in the same response");
                            }
                        }
                        other => yield RunEvent::Raw(other),
                    }
                }

                let Some(target) = next_agent else {
                    break;
                };

                handoffs += 1;
                if handoffs > settings.max_handoffs {
                    Err::<(), _>(LlmError::InvalidRequest(format!(
                        "run exceeded {} handoffs",
                        settings.max_handoffs
                    )))?;
                }

                info!(from = %active, to = %target, "Agent handoff");
                yield RunEvent::Handoff { from: active.clone(), to: target.clone() };
                yield RunEvent::AgentUpdated { agent: target.clone() };
                active = target;
            }

            yield RunEvent::Completed { final_output, last_agent: active };
        });

        Ok(StreamedRun::new(events))
    }
}

impl std::fmt::Debug for HandoffRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffRunner")
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .finish()
    }
}
