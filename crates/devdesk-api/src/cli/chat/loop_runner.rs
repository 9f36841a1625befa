//! Main chat loop orchestration.
//!
//! Starts a session, prints the banner and greeting, then reads lines until
//! `/exit` or Ctrl+D. Each message runs as a turn while its UI events are
//! rendered concurrently, so fragments appear as soon as they stream in.

use std::io::Write;

use console::style;
use tokio::sync::mpsc;
use tracing::{info, warn};

use devdesk_core::chat::ChatService;
use devdesk_types::chat::{ChatRole, SessionId};
use devdesk_types::error::TurnError;
use devdesk_types::event::UiEvent;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::TurnRenderer;

/// Run the interactive chat loop against the configured agents.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let chat = state.chat.as_ref();
    let entry_agent = chat.routing().entry_agent.clone();

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    let mut renderer = TurnRenderer::new(writer, entry_agent.clone(), true);

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let mut session_id = chat.on_session_start(&ui_tx);
    print_welcome_banner(
        renderer.writer(),
        &entry_agent,
        &state.config.provider.model,
        &session_id.to_string(),
    )?;
    drain(&mut ui_rx, &mut renderer)?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                writeln!(
                    renderer.writer(),
                    "\n  {}",
                    style("Press Ctrl+D or type /exit to quit.").dim()
                )?;
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(renderer.writer())?,
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => break,
                ChatCommand::New => {
                    chat.on_session_end(session_id);
                    session_id = chat.on_session_start(&ui_tx);
                    info!(session_id = %session_id, "Started a new chat session");
                    writeln!(renderer.writer(), "\n  {}\n", style("New session.").dim())?;
                    drain(&mut ui_rx, &mut renderer)?;
                }
                ChatCommand::History => print_history(chat, session_id, renderer.writer())?,
                ChatCommand::Unknown(name) => {
                    writeln!(
                        renderer.writer(),
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    )?;
                }
            }
            continue;
        }

        let result = run_turn(chat, session_id, &text, &ui_tx, &mut ui_rx, &mut renderer).await?;
        match result {
            Ok(_) => {}
            // Shown to the user through the `turn_error` event.
            Err(TurnError::Service(reason)) => warn!(%reason, "Turn failed"),
            Err(err) => return Err(err.into()),
        }
    }

    chat.on_session_end(session_id);
    writeln!(renderer.writer(), "\n  {}", style("Session ended.").dim())?;
    Ok(())
}

/// Run one turn, rendering its events while it streams.
async fn run_turn<W: Write>(
    chat: &ChatService,
    session_id: SessionId,
    text: &str,
    ui_tx: &mpsc::UnboundedSender<UiEvent>,
    ui_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    renderer: &mut TurnRenderer<W>,
) -> std::io::Result<Result<String, TurnError>> {
    let turn = chat.on_user_message(session_id, text, ui_tx);
    tokio::pin!(turn);

    let result = loop {
        tokio::select! {
            result = &mut turn => break result,
            Some(event) = ui_rx.recv() => renderer.render(&event)?,
        }
    };
    drain(ui_rx, renderer)?;
    Ok(result)
}

/// Render every event already queued.
fn drain<W: Write>(
    ui_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    renderer: &mut TurnRenderer<W>,
) -> std::io::Result<()> {
    while let Ok(event) = ui_rx.try_recv() {
        renderer.render(&event)?;
    }
    Ok(())
}

fn print_history(
    chat: &ChatService,
    session_id: SessionId,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let history = chat.history(session_id)?;
    writeln!(out)?;
    if history.is_empty() {
        writeln!(out, "  {}", style("No messages yet.").dim())?;
    }
    for msg in &history {
        let label = match msg.role {
            ChatRole::User => style("You").green().bold(),
            ChatRole::Assistant => style("Agent").cyan().bold(),
        };
        let preview: String = if msg.content.chars().count() > 100 {
            format!("{}...", msg.content.chars().take(97).collect::<String>())
        } else {
            msg.content.clone()
        };
        writeln!(out, "  {label} {preview}")?;
    }
    writeln!(out)?;
    Ok(())
}
