//! Slash commands for the chat loop.

use std::io::{self, Write};

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Clear the terminal screen.
    Clear,
    Exit,
    /// End this session and start a fresh one.
    New,
    /// Show the conversation so far.
    History,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/new" => Some(ChatCommand::New),
        "/history" => Some(ChatCommand::History),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

pub fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style("Available commands:").bold())?;
    writeln!(out)?;
    for (name, help) in [
        ("/help   ", "Show this help message"),
        ("/clear  ", "Clear the screen"),
        ("/new    ", "Start a new session"),
        ("/history", "Show conversation history"),
        ("/exit   ", "End the chat session"),
    ] {
        writeln!(out, "  {} {help}", style(name).cyan())?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse(" /Q "), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_with_trailing_args() {
        assert_eq!(parse("/history please"), Some(ChatCommand::History));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("How do I center a div?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo"), Some(ChatCommand::Unknown("/foo".to_string())));
    }

    #[test]
    fn test_help_mentions_exit() {
        let mut out = Vec::new();
        print_help(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("/exit"));
    }
}
