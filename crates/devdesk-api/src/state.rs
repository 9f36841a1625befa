//! Application state wiring all services together.
//!
//! AppState holds the chat service shared by the terminal chat and the
//! HTTP/WebSocket server, plus the configuration it was built from.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use devdesk_core::agent::runner::{HandoffRunner, RunnerSettings};
use devdesk_core::chat::ChatService;
use devdesk_core::session::SessionStore;
use devdesk_infra::config::{apply_env_overrides, load_app_config, load_routing};
use devdesk_infra::llm::create_provider;
use devdesk_infra::secret::env::require_api_key;
use devdesk_types::config::AppConfig;

/// Shared application state.
///
/// Cheap to clone; handlers receive their own copy per request.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Load configuration from `config_path` with environment overrides applied.
    pub async fn load_config(config_path: &Path) -> AppConfig {
        let mut config = load_app_config(config_path).await;
        apply_env_overrides(&mut config);
        config
    }

    /// Wire the provider, routing graph, and chat service from `config`.
    ///
    /// Fails when the API key is missing or the routing file is invalid.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let api_key = require_api_key(&config.provider.api_key_env)?;
        let provider = create_provider(&config.provider, api_key);
        let routing = load_routing(config.chat.routing_file.as_deref()).await?;

        info!(
            provider = provider.name(),
            model = %config.provider.model,
            entry_agent = %routing.entry_agent,
            agents = routing.agents.len(),
            "Chat service ready"
        );

        let runner = HandoffRunner::new(provider, RunnerSettings::from(&config.provider));
        let chat = ChatService::new(
            Arc::new(SessionStore::new()),
            Arc::new(runner),
            Arc::new(routing),
            config.chat.greeting.clone(),
        );

        Ok(Self::from_parts(chat, config))
    }

    pub fn from_parts(chat: ChatService, config: AppConfig) -> Self {
        Self {
            chat: Arc::new(chat),
            config: Arc::new(config),
        }
    }
}

/// Scripted completion service for handler tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use devdesk_core::agent::defaults::default_routing;
    use devdesk_core::chat::ChatService;
    use devdesk_core::completion::{CompletionService, StreamedRun};
    use devdesk_core::session::SessionStore;
    use devdesk_types::agent::{RoutingConfig, RunEvent};
    use devdesk_types::chat::{ChatRole, History};
    use devdesk_types::config::AppConfig;
    use devdesk_types::llm::LlmError;

    use super::AppState;

    /// Replies "echo: <last user message>" in two fragments.
    pub(crate) struct EchoService;

    impl CompletionService for EchoService {
        fn run_streamed(
            &self,
            history: History,
            routing: Arc<RoutingConfig>,
        ) -> Result<StreamedRun, LlmError> {
            let last = history
                .iter()
                .rev()
                .find(|m| m.role == ChatRole::User)
                .map(|m| m.content.clone())
                .unwrap_or_default();
            let agent = routing.entry_agent.clone();
            Ok(StreamedRun::from_events(vec![
                Ok(RunEvent::AgentUpdated { agent: agent.clone() }),
                Ok(RunEvent::TextDelta { text: "echo: ".to_string() }),
                Ok(RunEvent::TextDelta { text: last.clone() }),
                Ok(RunEvent::Completed {
                    final_output: format!("echo: {last}"),
                    last_agent: agent,
                }),
            ]))
        }
    }

    pub(crate) fn echo_state() -> AppState {
        let chat = ChatService::new(
            Arc::new(SessionStore::new()),
            Arc::new(EchoService),
            Arc::new(default_routing()),
            "Hello!",
        );
        AppState::from_parts(chat, AppConfig::default())
    }
}
