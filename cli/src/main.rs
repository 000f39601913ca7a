//! CLI entrypoint for streamchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use streamchat_application::SessionController;
use streamchat_domain::Credentials;
use streamchat_infrastructure::{ConfigLoader, FileConfig, HttpChatGateway, JsonlConversationLogger};
use streamchat_presentation::{ChatRepl, Cli, ConsoleRenderer, OutputConfig, ReplConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // Logs go to stderr so they never interleave with a streamed reply.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    let config = apply_cli_overrides(config, &cli);
    config.validate()?;

    info!("Starting streamchat against {}", config.server.host);

    // === Dependency Injection ===
    let gateway = Arc::new(HttpChatGateway::with_options(config.server.http_options())?);
    let renderer = Arc::new(ConsoleRenderer::new(OutputConfig {
        color: cli.color_enabled(config.output.color),
        show_progress: !cli.quiet,
    }));

    let mut controller = SessionController::new(gateway, renderer.clone());
    if let Some(path) = &config.transcript.path {
        match JsonlConversationLogger::open(path) {
            Ok(logger) => controller = controller.with_conversation_logger(Arc::new(logger)),
            Err(e) => warn!("Could not open transcript {}: {}", path, e),
        }
    }
    let controller = Arc::new(controller);

    // One-shot mode
    if let Some(message) = cli.message.as_deref() {
        let Some(username) = config.account.username.clone() else {
            bail!("--username is required with --message");
        };
        let Some(password) = cli.password.clone() else {
            bail!("--password or STREAMCHAT_PASSWORD is required with --message");
        };

        controller
            .submit_login(&config.server.host, &Credentials::new(username, password))
            .await?;
        let result = controller.submit_message(message).await;
        renderer.finish_line();
        result?;
        return Ok(());
    }

    let mut repl_config = ReplConfig::new(config.server.host.clone());
    repl_config.username = config.account.username.clone();
    repl_config.password = cli.password.clone();

    ChatRepl::new(controller, renderer, repl_config).run().await?;
    Ok(())
}

/// Command-line flags win over every configuration file.
fn apply_cli_overrides(mut config: FileConfig, cli: &Cli) -> FileConfig {
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(username) = &cli.username {
        config.account.username = Some(username.clone());
    }
    if let Some(path) = &cli.transcript {
        config.transcript.path = Some(path.display().to_string());
    }
    config
}
