//! Slash commands understood by the chat REPL

/// A parsed REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Log in again, optionally against a different service address.
    Login { host: Option<String> },
    Logout,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`. Returns `None` for ordinary messages,
    /// including those escaped with a leading `//`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.starts_with("//") {
            return None;
        }
        let rest = line.strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();

        let command = match name {
            "login" => ReplCommand::Login {
                host: parts.next().map(str::to_string),
            },
            "logout" => ReplCommand::Logout,
            "status" => ReplCommand::Status,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line.to_string()),
        };
        Some(command)
    }

    /// Text to send for a line that is not a command.
    ///
    /// A leading `//` stands for a literal `/`.
    pub fn message_text(line: &str) -> &str {
        let line = line.trim();
        if line.starts_with("//") {
            &line[1..]
        } else {
            line
        }
    }

    pub fn help_text() -> &'static str {
        "Commands:\n  \
         /login [URL]     - Log in again (optionally to another address)\n  \
         /logout          - Drop the token\n  \
         /status          - Show session state\n  \
         /help, /h, /?    - Show this help\n  \
         /quit, /exit, /q - Exit chat\n  \
         //text           - Send a message starting with /"
    }
}
