//! CLI command definitions for the `devdesk` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod agents;
pub mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use devdesk_infra::config::DEFAULT_CONFIG_FILE;

/// Web development help desk: a multi-agent chat over an OpenAI-compatible LLM.
#[derive(Parser)]
#[command(name = "devdesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text (JSON logs for `serve`).
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the configuration file.
    #[arg(long, global = true, env = "DEVDESK_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP/WebSocket chat server.
    Serve {
        /// Port to listen on (defaults to `server.port`, or `PORT`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Start an interactive chat session in the terminal.
    Chat,

    /// Show the agent routing graph.
    Agents,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["devdesk", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, None);
                assert_eq!(host, None);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["devdesk", "agents", "--json", "-vv", "--config", "x.toml"])
                .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Commands::Agents));
    }
}
