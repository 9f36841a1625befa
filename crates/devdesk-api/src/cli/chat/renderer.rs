//! Terminal rendering of UI events.
//!
//! Fragments are printed raw as they stream in, under the name of the agent
//! that is answering. A spinner covers the gap between the placeholder and
//! the first fragment.

use std::io::{self, Write};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use devdesk_types::chat::ChatRole;
use devdesk_types::event::UiEvent;

pub struct TurnRenderer<W: Write> {
    out: W,
    show_spinner: bool,
    spinner: Option<ProgressBar>,
    agent: String,
    streaming: bool,
}

impl<W: Write> TurnRenderer<W> {
    /// `agent` labels replies until the first `agent_changed` event.
    pub fn new(out: W, agent: impl Into<String>, show_spinner: bool) -> Self {
        Self {
            out,
            show_spinner,
            spinner: None,
            agent: agent.into(),
            streaming: false,
        }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn render(&mut self, event: &UiEvent) -> io::Result<()> {
        match event {
            UiEvent::SessionStarted { .. } | UiEvent::Message { role: ChatRole::User, .. } => {}
            UiEvent::Message { content, .. } if content.is_empty() => {
                self.streaming = false;
                self.start_spinner();
            }
            UiEvent::Message { content, .. } => {
                writeln!(self.out, "  {} {content}", style(&self.agent).cyan().bold())?;
                writeln!(self.out)?;
            }
            UiEvent::AgentChanged { agent } => {
                if *agent != self.agent {
                    tracing::debug!(from = %self.agent, to = %agent, "Agent changed");
                }
                self.agent = agent.clone();
                if let Some(spinner) = &self.spinner {
                    spinner.set_message(format!("{} is thinking...", self.agent));
                }
            }
            UiEvent::StreamFragment { text } => {
                if !self.streaming {
                    self.stop_spinner();
                    self.streaming = true;
                    write!(self.out, "\n  {} ", style(&self.agent).cyan().bold())?;
                }
                write!(self.out, "{text}")?;
                self.out.flush()?;
            }
            UiEvent::TurnComplete { content } => {
                self.stop_spinner();
                if !self.streaming {
                    // Nothing streamed; show the committed reply in one piece.
                    write!(self.out, "\n  {} {content}", style(&self.agent).cyan().bold())?;
                }
                self.streaming = false;
                writeln!(self.out)?;
                writeln!(self.out)?;
            }
            UiEvent::TurnError { reason } => {
                self.stop_spinner();
                self.streaming = false;
                writeln!(self.out)?;
                writeln!(self.out, "  {} {reason}", style("!").red().bold())?;
                writeln!(
                    self.out,
                    "  {}",
                    style("Type a message to retry, /exit to quit.").dim()
                )?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    fn start_spinner(&mut self) {
        self.stop_spinner();
        if !self.show_spinner {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(spinner_style);
        spinner.set_message(format!("{} is thinking...", self.agent));
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_all(events: &[UiEvent]) -> String {
        let mut renderer = TurnRenderer::new(Vec::new(), "Web Development Agent", false);
        for event in events {
            renderer.render(event).unwrap();
        }
        String::from_utf8(renderer.out).unwrap()
    }

    fn placeholder() -> UiEvent {
        UiEvent::Message {
            role: ChatRole::Assistant,
            content: String::new(),
        }
    }

    #[test]
    fn test_fragments_print_under_current_agent() {
        let text = render_all(&[
            placeholder(),
            UiEvent::AgentChanged {
                agent: "Backend Agent".to_string(),
            },
            UiEvent::StreamFragment { text: "Sure".to_string() },
            UiEvent::StreamFragment { text: ", here's".to_string() },
            UiEvent::TurnComplete {
                content: "Sure, here's".to_string(),
            },
        ]);
        assert!(text.contains("Backend Agent"));
        assert!(text.contains("Sure, here's"));
        // Streamed text is not repeated on completion.
        assert_eq!(text.matches("Sure").count(), 1);
    }

    #[test]
    fn test_greeting_is_printed() {
        let text = render_all(&[UiEvent::Message {
            role: ChatRole::Assistant,
            content: "Hello!".to_string(),
        }]);
        assert!(text.contains("Hello!"));
    }

    #[test]
    fn test_error_keeps_partial_text() {
        let text = render_all(&[
            placeholder(),
            UiEvent::StreamFragment { text: "Part".to_string() },
            UiEvent::TurnError {
                reason: "completion service error: stream error: eof".to_string(),
            },
        ]);
        assert!(text.contains("Part"));
        assert!(text.contains("stream error: eof"));
    }

    #[test]
    fn test_empty_stream_shows_final_reply() {
        let text = render_all(&[
            placeholder(),
            UiEvent::TurnComplete {
                content: "Done.".to_string(),
            },
        ]);
        assert!(text.contains("Done."));
    }
}
