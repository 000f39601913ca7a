//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for streamchat
#[derive(Parser, Debug)]
#[command(name = "streamchat")]
#[command(author, version, about = "Terminal client for a token-authenticated streaming chat service")]
#[command(long_about = r#"
streamchat logs in to a chat service, then sends your messages and prints
the model's reply as it streams in.

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./streamchat.toml        Project-level config
3. ~/.config/streamchat/config.toml   Global config

Example:
  streamchat --host http://localhost:8082 --username alice
  STREAMCHAT_PASSWORD=secret streamchat --username alice -m "Hello there"
"#)]
pub struct Cli {
    /// Base address of the chat service (overrides server.host)
    #[arg(long, value_name = "URL")]
    pub host: Option<String>,

    /// Account name used to log in (overrides account.username)
    #[arg(short, long, value_name = "NAME")]
    pub username: Option<String>,

    /// Password used to log in; prompted for when missing
    #[arg(long, value_name = "PASS", env = "STREAMCHAT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Send a single message, print the reply and exit
    #[arg(short, long, value_name = "TEXT")]
    pub message: Option<String>,

    /// Append the conversation as JSONL to this file (overrides transcript.path)
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress status lines and the progress spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Whether output should be colored, given the configured preference.
    pub fn color_enabled(&self, configured: bool) -> bool {
        configured && !self.no_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_one_shot() {
        let cli = Cli::try_parse_from([
            "streamchat",
            "--host",
            "http://localhost:9000",
            "-u",
            "alice",
            "--password",
            "pw",
            "-m",
            "hello",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.host.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cli.username.as_deref(), Some("alice"));
        assert_eq!(cli.password.as_deref(), Some("pw"));
        assert_eq!(cli.message.as_deref(), Some("hello"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_color_enabled() {
        let cli = Cli::try_parse_from(["streamchat"]).unwrap();
        assert!(cli.color_enabled(true));
        assert!(!cli.color_enabled(false));

        let cli = Cli::try_parse_from(["streamchat", "--no-color"]).unwrap();
        assert!(!cli.color_enabled(true));
    }
}
