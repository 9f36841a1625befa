//! Welcome banner display for chat sessions.

use std::io::{self, Write};

use console::style;

/// Print the welcome banner: entry agent, model, and short session id.
pub fn print_welcome_banner(
    out: &mut impl Write,
    agent: &str,
    model: &str,
    session_id: &str,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  * {}", style(agent).cyan().bold())?;
    writeln!(out)?;
    writeln!(out, "  {}    {}", style("Model:").bold(), style(model).dim())?;
    writeln!(
        out,
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        style("Type /help for commands, /exit or Ctrl+D to quit").dim()
    )?;
    writeln!(out, "  {}", style("---").dim())?;
    writeln!(out)
}
