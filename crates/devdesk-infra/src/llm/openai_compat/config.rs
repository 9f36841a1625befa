//! Configuration and per-provider defaults for OpenAI-compatible providers.
//!
//! Each endpoint that speaks the OpenAI chat completions protocol gets a
//! factory function returning an [`OpenAiCompatConfig`] with the right base
//! URL and capabilities.

use secrecy::SecretString;

use devdesk_types::config::ProviderSettings;
use devdesk_types::llm::ProviderCapabilities;

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "gemini").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Default model, used when a request leaves `model` empty.
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
/// Capabilities: streaming, tool calling; 128K context, 16K output.
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            streaming: true,
            tool_calling: true,
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}

/// Google Gemini default configuration (OpenAI-compatible beta endpoint).
///
/// Base URL: `https://generativelanguage.googleapis.com/v1beta/openai`
/// Capabilities: streaming, tool calling; 1M context, 8K output.
pub fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            streaming: true,
            tool_calling: true,
            max_context_tokens: 1_048_576,
            max_output_tokens: 8_192,
        },
    }
}

/// Configuration for whatever endpoint `settings` describes.
///
/// Well-known provider names pick up their capabilities; the configured
/// base URL always wins over the factory default.
pub fn from_settings(settings: &ProviderSettings, api_key: SecretString) -> OpenAiCompatConfig {
    let mut config = match settings.name.as_str() {
        "openai" => openai_defaults(api_key, &settings.model),
        "gemini" => gemini_defaults(api_key, &settings.model),
        other => OpenAiCompatConfig {
            provider_name: other.to_string(),
            base_url: settings.base_url.clone(),
            api_key,
            model: settings.model.clone(),
            capabilities: ProviderCapabilities {
                streaming: true,
                tool_calling: true,
                max_context_tokens: 128_000,
                max_output_tokens: settings.max_tokens,
            },
        },
    };
    config.base_url = settings.base_url.trim_end_matches('/').to_string();
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn key(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_openai_defaults() {
        let config = openai_defaults(key("sk-test"), "gpt-4o");
        assert_eq!(config.provider_name, "openai");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.api_key.expose_secret(), "sk-test");
        assert_eq!(config.model, "gpt-4o");
        assert!(config.capabilities.tool_calling);
        assert_eq!(config.capabilities.max_context_tokens, 128_000);
    }

    #[test]
    fn test_gemini_defaults() {
        let config = gemini_defaults(key("gemini-key"), "gemini-2.0-flash");
        assert_eq!(config.provider_name, "gemini");
        assert!(config.base_url.contains("generativelanguage.googleapis.com"));
        assert_eq!(config.capabilities.max_context_tokens, 1_048_576);
    }

    #[test]
    fn test_from_default_settings_is_gemini() {
        let config = from_settings(&ProviderSettings::default(), key("k"));
        assert_eq!(config.provider_name, "gemini");
        assert_eq!(
            config.base_url,
            "https://generativelanguage.googleapis.com/v1beta/openai"
        );
        assert_eq!(config.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_from_settings_custom_endpoint() {
        let settings = ProviderSettings {
            name: "local".to_string(),
            base_url: "http://localhost:11434/v1/".to_string(),
            model: "llama3.1".to_string(),
            ..ProviderSettings::default()
        };
        let config = from_settings(&settings, key("unused"));
        assert_eq!(config.provider_name, "local");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.capabilities.max_output_tokens, settings.max_tokens);
    }
}
