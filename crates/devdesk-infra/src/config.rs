//! Configuration loaders for devdesk.
//!
//! Reads `devdesk.toml` into [`AppConfig`], falling back to defaults when the
//! file is missing or malformed, and loads the agent routing graph from an
//! optional TOML file.

use std::path::Path;

use devdesk_core::agent::defaults::default_routing;
use devdesk_types::agent::RoutingConfig;
use devdesk_types::config::AppConfig;
use devdesk_types::error::ConfigError;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "devdesk.toml";

/// Load application configuration from `path`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_app_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Apply environment overrides using `lookup` to read variables.
///
/// `PORT` replaces `server.port` when it holds a valid port number.
pub fn apply_env_overrides_with(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(raw) = lookup("PORT") {
        match raw.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => tracing::warn!("Ignoring invalid PORT value '{raw}'"),
        }
    }
}

/// Apply environment overrides from the process environment.
pub fn apply_env_overrides(config: &mut AppConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

/// Load the routing graph.
///
/// Without a routing file the built-in three-agent graph is used. A
/// configured file that cannot be read, parsed or validated is an error.
pub async fn load_routing(routing_file: Option<&Path>) -> Result<RoutingConfig, ConfigError> {
    let routing = match routing_file {
        None => default_routing(),
        Some(path) => {
            let content =
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| ConfigError::Read {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
            let routing: RoutingConfig =
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            tracing::info!(
                path = %path.display(),
                agents = routing.agents.len(),
                entry = %routing.entry_agent,
                "Loaded routing file"
            );
            routing
        }
    };

    routing.validate()?;
    Ok(routing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use devdesk_types::error::RoutingError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_app_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_app_config(&tmp.path().join(DEFAULT_CONFIG_FILE)).await;
        assert_eq!(config.server.port, 7860);
        assert_eq!(config.provider.model, "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn load_app_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(
            &path,
            r#"
[provider]
model = "gemini-2.5-flash"
max_handoffs = 3

[server]
port = 9000
"#,
        )
        .await
        .unwrap();

        let config = load_app_config(&path).await;
        assert_eq!(config.provider.model, "gemini-2.5-flash");
        assert_eq!(config.provider.max_handoffs, 3);
        assert_eq!(config.server.port, 9000);
    }

    #[tokio::test]
    async fn load_app_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_app_config(&path).await;
        assert_eq!(config.server.port, 7860);
    }

    #[test]
    fn port_override() {
        let mut config = AppConfig::default();
        apply_env_overrides_with(&mut config, |name| {
            (name == "PORT").then(|| "8123".to_string())
        });
        assert_eq!(config.server.port, 8123);
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let mut config = AppConfig::default();
        apply_env_overrides_with(&mut config, |_| Some("not-a-port".to_string()));
        assert_eq!(config.server.port, 7860);
    }

    #[tokio::test]
    async fn load_routing_default() {
        let routing = load_routing(None).await.unwrap();
        assert_eq!(routing.entry_agent, "Web Development Agent");
        assert_eq!(routing.agents.len(), 3);
    }

    #[tokio::test]
    async fn load_routing_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("agents.toml");
        tokio::fs::write(
            &path,
            r#"
entry_agent = "Triage"

[[agents]]
name = "Triage"
instructions = "Route web questions."
handoffs = ["Docs"]

[[agents]]
name = "Docs"
instructions = "Answer documentation questions."
"#,
        )
        .await
        .unwrap();

        let routing = load_routing(Some(&path)).await.unwrap();
        assert_eq!(routing.entry_agent, "Triage");
        assert_eq!(routing.agent("Triage").unwrap().handoffs, vec!["Docs"]);
    }

    #[tokio::test]
    async fn load_routing_invalid_graph_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("agents.toml");
        tokio::fs::write(
            &path,
            r#"
entry_agent = "Triage"

[[agents]]
name = "Triage"
instructions = "Route."
handoffs = ["Mobile"]
"#,
        )
        .await
        .unwrap();

        let err = load_routing(Some(&path)).await.unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Routing(RoutingError::UnknownHandoffTarget { .. })
        ));
    }

    #[tokio::test]
    async fn load_routing_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_routing(Some(&tmp.path().join("nope.toml")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
