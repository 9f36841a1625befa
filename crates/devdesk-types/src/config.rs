//! Application configuration types for devdesk.
//!
//! `AppConfig` represents the top-level `devdesk.toml` controlling the LLM
//! endpoint, the HTTP server, and chat behavior. All fields have defaults,
//! so an empty or missing file yields a working Gemini-backed setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default OpenAI-compatible endpoint (Google Gemini beta).
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Default model served through [`DEFAULT_BASE_URL`].
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub chat: ChatSettings,
}

/// Which OpenAI-compatible endpoint to stream completions from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Human-readable provider name used in logs and spans.
    #[serde(default = "default_provider_name")]
    pub name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Upper bound on handoffs within a single turn.
    #[serde(default = "default_max_handoffs")]
    pub max_handoffs: usize,
}

fn default_provider_name() -> String {
    "gemini".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_max_handoffs() -> usize {
    8
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: None,
            max_handoffs: default_max_handoffs(),
        }
    }
}

/// HTTP server binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7860
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Chat session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Shown when a session starts. Not part of the history.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Optional TOML file replacing the built-in agent graph.
    #[serde(default)]
    pub routing_file: Option<PathBuf>,
}

fn default_greeting() -> String {
    "👋 Hello from the Web Development Agent! How can I help you?".to_string()
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            routing_file: None,
        }
    }
}
