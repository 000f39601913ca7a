//! Console renderer for the chat session
//!
//! Prints the transcript to a terminal. A model reply is written piece by
//! piece as it streams in; the line stays open until the next thing is
//! printed. Busy states show an `indicatif` spinner on stderr, which is
//! suspended while any other line is written.

use crate::config::OutputConfig;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use streamchat_application::{MessageHandle, MessageRenderer};
use streamchat_domain::{HintTarget, Role, Severity};

struct Terminal {
    writer: Box<dyn Write + Send>,
    line_open: bool,
    last_error: Option<String>,
}

impl Terminal {
    fn close_line(&mut self) {
        if self.line_open {
            let _ = writeln!(self.writer);
            self.line_open = false;
        }
    }

    fn write_line(&mut self, text: &str) {
        self.close_line();
        let _ = writeln!(self.writer, "{}", text);
        let _ = self.writer.flush();
    }
}

fn lock(terminal: &Mutex<Terminal>) -> MutexGuard<'_, Terminal> {
    terminal.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle for a transcript entry that is still being written
struct ConsoleMessage {
    terminal: Arc<Mutex<Terminal>>,
}

impl MessageHandle for ConsoleMessage {
    fn append_text(&mut self, text: &str) {
        let mut terminal = lock(&self.terminal);
        let _ = write!(terminal.writer, "{}", text);
        let _ = terminal.writer.flush();
        terminal.line_open = true;
    }
}

type SpinnerTarget = Box<dyn Fn() -> ProgressDrawTarget + Send + Sync>;

/// Renders the chat session on a terminal
pub struct ConsoleRenderer {
    config: OutputConfig,
    terminal: Arc<Mutex<Terminal>>,
    spinner: Mutex<Option<ProgressBar>>,
    spinner_target: SpinnerTarget,
    status: Mutex<(Severity, String)>,
    input_locked: AtomicBool,
}

impl ConsoleRenderer {
    /// Render to stdout.
    pub fn new(config: OutputConfig) -> Self {
        Self::with_writer(config, Box::new(io::stdout()))
    }

    pub fn with_writer(config: OutputConfig, writer: Box<dyn Write + Send>) -> Self {
        Self {
            config,
            terminal: Arc::new(Mutex::new(Terminal {
                writer,
                line_open: false,
                last_error: None,
            })),
            spinner: Mutex::new(None),
            spinner_target: Box::new(ProgressDrawTarget::stderr),
            status: Mutex::new((Severity::Idle, String::new())),
            input_locked: AtomicBool::new(true),
        }
    }

    /// Draw the busy spinner somewhere other than stderr.
    pub fn with_spinner_target(
        mut self,
        target: impl Fn() -> ProgressDrawTarget + Send + Sync + 'static,
    ) -> Self {
        self.spinner_target = Box::new(target);
        self
    }

    /// Whether the session currently refuses new messages
    pub fn is_input_locked(&self) -> bool {
        self.input_locked.load(Ordering::SeqCst)
    }

    /// Last status reported by the session
    pub fn status(&self) -> (Severity, String) {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Print a line outside the transcript, e.g. REPL command output.
    pub fn notice(&self, text: &str) {
        self.stop_spinner();
        self.write_line(text);
    }

    /// Terminate a reply that is still open.
    pub fn finish_line(&self) {
        let mut terminal = lock(&self.terminal);
        terminal.close_line();
        let _ = terminal.writer.flush();
    }

    fn label(&self, role: Role) -> String {
        let label = format!("{} ›", role.label());
        if !self.config.color {
            return label;
        }
        match role {
            Role::User => label.cyan().bold().to_string(),
            Role::Model => label.green().bold().to_string(),
            Role::Error => label.red().bold().to_string(),
        }
    }

    /// Write a complete line, with the spinner cleared for the duration.
    fn write_line(&self, text: &str) {
        let spinner = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match spinner {
            Some(spinner) => spinner.suspend(|| lock(&self.terminal).write_line(text)),
            None => lock(&self.terminal).write_line(text),
        }
    }

    fn start_spinner(&self, text: &str) {
        if !self.config.show_progress {
            return;
        }
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::with_draw_target(None, (self.spinner_target)());
        spinner.set_style(style);
        spinner.set_message(text.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        let previous = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(spinner);
        if let Some(previous) = previous {
            previous.finish_and_clear();
        }
    }

    fn stop_spinner(&self) {
        let spinner = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
    }
}

impl MessageRenderer for ConsoleRenderer {
    fn append_message(&self, role: Role, text: &str) -> Box<dyn MessageHandle> {
        self.stop_spinner();
        let label = self.label(role);
        {
            let mut terminal = lock(&self.terminal);
            terminal.close_line();
            let _ = write!(terminal.writer, "{} {}", label, text);
            terminal.line_open = true;
            match role {
                // Replies keep growing; everything else is complete.
                Role::Model => {}
                Role::Error => {
                    terminal.last_error = Some(text.to_string());
                    terminal.close_line();
                }
                Role::User => terminal.close_line(),
            }
            let _ = terminal.writer.flush();
        }
        Box::new(ConsoleMessage {
            terminal: Arc::clone(&self.terminal),
        })
    }

    fn set_status(&self, severity: Severity, text: &str) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) =
            (severity, text.to_string());

        match severity {
            Severity::Busy => self.start_spinner(text),
            Severity::Idle | Severity::Ok => {
                self.stop_spinner();
                self.finish_line();
            }
        }
    }

    fn set_hint(&self, target: HintTarget, text: &str, is_error: bool) {
        let line = if is_error {
            // The transcript already shows this failure.
            let repeated = lock(&self.terminal).last_error.as_deref() == Some(text);
            if target == HintTarget::Chat && repeated {
                return;
            }
            let line = format!("✗ {}", text);
            if self.config.color {
                line.red().to_string()
            } else {
                line
            }
        } else if self.config.show_progress {
            if self.config.color {
                text.dimmed().to_string()
            } else {
                text.to_string()
            }
        } else {
            return;
        };
        self.write_line(&line);
    }

    fn lock_input(&self, disabled: bool) {
        self.input_locked.store(disabled, Ordering::SeqCst);
        if disabled {
            lock(&self.terminal).last_error = None;
        }
    }
}
