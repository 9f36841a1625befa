//! LLM provider implementations.
//!
//! Contains the concrete implementation of the [`LlmProvider`] trait defined
//! in `devdesk-core`, plus a factory ([`create_provider`]) that builds it
//! from [`ProviderSettings`].
//!
//! [`LlmProvider`]: devdesk_core::llm::provider::LlmProvider

pub mod openai_compat;

use secrecy::SecretString;
use tracing::info;

use devdesk_core::llm::box_provider::BoxLlmProvider;
use devdesk_types::config::ProviderSettings;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] for the configured endpoint.
pub fn create_provider(settings: &ProviderSettings, api_key: SecretString) -> BoxLlmProvider {
    let config = openai_compat::config::from_settings(settings, api_key);
    info!(
        provider = %config.provider_name,
        base_url = %config.base_url,
        model = %config.model,
        "Configured LLM provider"
    );
    BoxLlmProvider::new(OpenAiCompatibleProvider::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_default_provider() {
        let provider = create_provider(
            &ProviderSettings::default(),
            SecretString::from("gemini-key".to_string()),
        );
        assert_eq!(provider.name(), "gemini");
        assert!(provider.capabilities().tool_calling);
    }

    #[test]
    fn test_create_named_provider() {
        let settings = ProviderSettings {
            name: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            ..ProviderSettings::default()
        };
        let provider = create_provider(&settings, SecretString::from("sk-test".to_string()));
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.capabilities().max_context_tokens, 128_000);
    }
}
