//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::ReplCommand;
use crate::config::ReplConfig;
use crate::output::console::ConsoleRenderer;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::io;
use std::sync::Arc;
use streamchat_application::{ChatGateway, SessionController, Submission};
use streamchat_domain::{Credentials, SessionStatus};
use tracing::{debug, warn};

const HISTORY_CAPACITY: usize = 1000;

enum Flow {
    Continue,
    Quit,
}

/// What the REPL does before reading the next line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextStep {
    Relogin,
    ReadLine,
}

fn next_step(status: SessionStatus) -> NextStep {
    if status == SessionStatus::Expired {
        NextStep::Relogin
    } else {
        NextStep::ReadLine
    }
}

/// Whether a cancelled credential prompt should log out.
///
/// An expired session would otherwise ask again on the very next turn.
fn logout_on_cancel(status: SessionStatus) -> bool {
    status == SessionStatus::Expired
}

/// Credentials known between logins
///
/// The username is remembered once entered. A preset password is handed
/// out for the first attempt only, so a wrong one is never retried without
/// asking.
#[derive(Default)]
struct CredentialStore {
    username: Option<String>,
    preset_password: Option<String>,
}

impl CredentialStore {
    fn new(username: Option<String>, preset_password: Option<String>) -> Self {
        Self {
            username,
            preset_password,
        }
    }

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Fill in what is missing through `prompt`. `None` when a prompt is
    /// cancelled.
    fn resolve(
        &mut self,
        mut prompt: impl FnMut(&str) -> io::Result<Option<String>>,
    ) -> io::Result<Option<Credentials>> {
        let username = match &self.username {
            Some(username) => username.clone(),
            None => match prompt("username")? {
                Some(username) => username,
                None => return Ok(None),
            },
        };
        let password = match self.preset_password.take() {
            Some(password) => password,
            None => match prompt("password")? {
                Some(password) => password,
                None => return Ok(None),
            },
        };

        self.username = Some(username.clone());
        Ok(Some(Credentials::new(username, password)))
    }
}

/// Interactive chat REPL
pub struct ChatRepl<G: ChatGateway + 'static> {
    controller: Arc<SessionController<G>>,
    renderer: Arc<ConsoleRenderer>,
    config: ReplConfig,
    credentials: CredentialStore,
}

impl<G: ChatGateway + 'static> ChatRepl<G> {
    /// Create a new ChatRepl
    pub fn new(
        controller: Arc<SessionController<G>>,
        renderer: Arc<ConsoleRenderer>,
        mut config: ReplConfig,
    ) -> Self {
        let credentials =
            CredentialStore::new(config.username.take(), config.password.take());
        Self {
            controller,
            renderer,
            config,
            credentials,
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> io::Result<()> {
        let mut editor = self.create_editor();

        self.print_welcome();
        self.login(None).await?;

        loop {
            if next_step(self.controller.session().status()) == NextStep::Relogin {
                self.renderer.notice("Session expired, please log in again.");
                self.login(None).await?;
                continue;
            }

            let label = if self.renderer.is_input_locked() {
                "offline"
            } else {
                "you"
            };
            let prompt = DefaultPrompt::new(
                DefaultPromptSegment::Basic(label.to_string()),
                DefaultPromptSegment::Empty,
            );

            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ReplCommand::parse(line) {
                        if let Flow::Quit = self.handle_command(command).await? {
                            break;
                        }
                        continue;
                    }

                    let text = ReplCommand::message_text(line);
                    if let Err(e) = self.controller.submit_message(text).await {
                        debug!("Message not delivered: {}", e);
                    }
                }
                Signal::CtrlD => {
                    self.renderer.notice("Bye!");
                    break;
                }
                // Ctrl-C clears the line.
                _ => continue,
            }
        }

        Ok(())
    }

    fn create_editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.config.history_file else {
            return editor;
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("Could not open history file {}: {}", path.display(), e);
                editor
            }
        }
    }

    fn print_welcome(&self) {
        self.renderer.notice("");
        self.renderer
            .notice("╭─────────────────────────────────────────────╮");
        self.renderer
            .notice("│               streamchat                    │");
        self.renderer
            .notice("╰─────────────────────────────────────────────╯");
        self.renderer.notice("");
        self.renderer.notice(&format!("Service: {}", self.config.host));
        self.renderer.notice("");
        self.renderer.notice(ReplCommand::help_text());
        self.renderer.notice("");
    }

    /// Ask for whatever credentials are missing and log in.
    async fn login(&mut self, host: Option<String>) -> io::Result<()> {
        if let Some(host) = host {
            self.config.host = host;
        }

        let Some(credentials) = self.credentials.resolve(prompt_field)? else {
            self.renderer.notice("Login cancelled. Type /login to try again.");
            if logout_on_cancel(self.controller.session().status()) {
                self.controller.logout();
            }
            return Ok(());
        };

        if let Err(e) = self
            .controller
            .submit_login(&self.config.host, &credentials)
            .await
        {
            debug!("Login failed: {}", e);
        }
        Ok(())
    }

    /// Handle slash commands.
    async fn handle_command(&mut self, command: ReplCommand) -> io::Result<Flow> {
        match command {
            ReplCommand::Login { host } => {
                self.login(host).await?;
            }
            ReplCommand::Logout => {
                if self.controller.logout() == Submission::Ignored {
                    self.renderer.notice("Cannot log out while a request is running.");
                }
            }
            ReplCommand::Status => {
                let session = self.controller.session();
                let (_, status) = self.renderer.status();
                self.renderer.notice(&format!(
                    "Status:  {} ({})",
                    status,
                    session.status()
                ));
                self.renderer.notice(&format!(
                    "Service: {}",
                    session
                        .host()
                        .map(|h| h.as_str().to_string())
                        .unwrap_or_else(|| self.config.host.clone())
                ));
                self.renderer.notice(&format!(
                    "User:    {}",
                    self.credentials.username().unwrap_or("-")
                ));
                self.renderer.notice(&format!(
                    "Token:   {}",
                    if session.token().is_some() {
                        "present"
                    } else {
                        "none"
                    }
                ));
            }
            ReplCommand::Help => {
                self.renderer.notice(ReplCommand::help_text());
            }
            ReplCommand::Quit => {
                self.renderer.notice("Bye!");
                return Ok(Flow::Quit);
            }
            ReplCommand::Unknown(cmd) => {
                self.renderer.notice(&format!("Unknown command: {}", cmd));
                self.renderer.notice("Type /help for available commands");
            }
        }
        Ok(Flow::Continue)
    }
}

/// Read one non-empty value. `None` when the user cancels.
///
/// Each prompt gets a fresh editor so entered values never reach the
/// message history.
fn prompt_field(label: &str) -> io::Result<Option<String>> {
    let mut editor = Reedline::create();
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(label.to_string()),
        DefaultPromptSegment::Empty,
    );

    loop {
        match editor.read_line(&prompt)? {
            Signal::Success(value) => {
                if !value.trim().is_empty() {
                    return Ok(Some(value));
                }
            }
            _ => return Ok(None),
        }
    }
}
