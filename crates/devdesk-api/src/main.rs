//! devdesk CLI and HTTP/WebSocket server entry point.
//!
//! Binary name: `devdesk`
//!
//! Parses CLI arguments, loads `.env` and configuration, wires the chat
//! service, then dispatches to the terminal chat, the agents listing, or the
//! server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing::{info, warn};

use devdesk_infra::config::load_routing;
use devdesk_infra::secret::env::load_dotenv;
use devdesk_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use devdesk_types::config::AppConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need configuration or tracing
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "devdesk", &mut std::io::stdout());
        return Ok(());
    }

    load_dotenv();

    let mut tracing_options = TracingOptions::from_verbosity(cli.verbose, cli.quiet);
    tracing_options.otel = cli.otel;
    if matches!(cli.command, Commands::Serve { .. }) {
        tracing_options = tracing_options.at_least_info();
        tracing_options.json = cli.json;
    }
    init_tracing(&tracing_options)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config = AppState::load_config(&cli.config).await;

    let result = match cli.command {
        Commands::Agents => {
            let routing = load_routing(config.chat.routing_file.as_deref()).await?;
            cli::agents::print_agents(&routing, cli.json)
        }
        Commands::Chat => {
            let state = AppState::init(config).await?;
            cli::chat::loop_runner::run_chat_loop(&state).await
        }
        Commands::Serve { port, host } => serve(config, host, port).await,
        Commands::Completions { .. } => Ok(()),
    };

    shutdown_tracing();
    result
}

async fn serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::init(config).await?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "devdesk listening");

    println!(
        "  {} devdesk listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!(
        "  {}",
        console::style(format!("Chat WebSocket: ws://{addr}/ws/chat")).dim()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// A handler that cannot be installed never fires; the other one still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
