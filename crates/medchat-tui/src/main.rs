use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use medchat_core::{ChatBackend, Config, ExchangeController, HttpBackend, DEFAULT_ENDPOINT, FAILURE_TEXT};
use tracing::{info, warn};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

#[cfg(test)]
mod test_support;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "medchat", version)]
#[command(about = "Chat with the medical assistant backend from your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Chat endpoint URL (overrides MEDCHAT_ENDPOINT and the config file)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log file (interactive mode logs to the data directory by default)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// Your question
        question: String,
    },
    /// Check that the backend is up
    Status,
    /// Show or change the saved settings
    Config {
        /// Save this chat endpoint URL
        #[arg(long)]
        set_endpoint: Option<String>,
        /// Save this opening message (an empty string turns it off)
        #[arg(long)]
        set_greeting: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat);

    let log_file = match (&command, cli.log_file) {
        (_, Some(path)) => Some(path),
        (Commands::Chat, None) => Some(logging::default_log_path()),
        _ => None,
    };
    logging::init(cli.verbose, log_file.as_deref())?;

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "could not read config, using defaults");
        Config::new()
    });
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());

    match command {
        Commands::Chat => {
            let backend = connect(&endpoint)?;
            let controller =
                ExchangeController::new(Arc::new(backend)).with_greeting(config.greeting());
            run_tui(App::new(controller, endpoint)).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ask { question } => {
            let backend = connect(&endpoint)?;
            if ask_once(Arc::new(backend), &question).await? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Status => check_status(&connect(&endpoint)?).await,
        Commands::Config { set_endpoint, set_greeting } => {
            update_config(set_endpoint.as_deref(), set_greeting.as_deref())
        }
    }
}

fn connect(endpoint: &str) -> Result<HttpBackend> {
    let backend = HttpBackend::new(endpoint)?;
    info!(%endpoint, "starting medchat");
    Ok(backend)
}

/// Apply requested changes; returns whether anything changed
fn apply_config_changes(
    config: &mut Config,
    set_endpoint: Option<&str>,
    set_greeting: Option<&str>,
) -> Result<bool> {
    if let Some(endpoint) = set_endpoint {
        config.set_endpoint(endpoint)?;
    }
    if let Some(greeting) = set_greeting {
        config.set_greeting(greeting);
    }
    Ok(set_endpoint.is_some() || set_greeting.is_some())
}

fn update_config(set_endpoint: Option<&str>, set_greeting: Option<&str>) -> Result<ExitCode> {
    // A broken file is reported rather than overwritten with defaults
    let mut config = Config::load()?;
    if apply_config_changes(&mut config, set_endpoint, set_greeting)? {
        config.save()?;
        info!("config saved");
    }

    println!("Config file: {}", Config::get_config_path()?.display());
    println!("endpoint: {}", config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT));
    println!("greeting: {}", config.greeting());
    Ok(ExitCode::SUCCESS)
}

/// Print the answer to one question; returns whether the backend answered
async fn ask_once(backend: Arc<dyn ChatBackend>, question: &str) -> Result<bool> {
    if question.trim().is_empty() {
        bail!("Question must not be empty");
    }

    let mut controller = ExchangeController::new(backend);
    match controller.ask(question).await {
        Some(Ok(answer)) => {
            println!("{}", answer);
            Ok(true)
        }
        Some(Err(e)) => {
            println!("{}", e.user_message());
            eprintln!("{}", e);
            Ok(false)
        }
        None => bail!("No answer was recorded for the question"),
    }
}

async fn check_status(backend: &HttpBackend) -> Result<ExitCode> {
    match backend.health().await {
        Ok(status) => {
            println!("{}: {}", backend.endpoint(), status);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", FAILURE_TEXT);
            eprintln!("{}: {}", backend.endpoint(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_tui(mut app: App) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run_loop(&mut terminal, &mut app).await;

    tui::restore()?;
    info!(entries = app.entries().len(), "chat session ended");
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        tokio::select! {
            Some(event) = events.next() => handler::handle_event(app, event),
            Some(done) = app.controller.next_completion() => app.settle(done),
            else => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{answering, failing};

    #[tokio::test]
    async fn test_ask_once_success_follows_the_outcome() {
        // An answer that happens to read like the failure text is still an answer
        assert!(ask_once(answering(FAILURE_TEXT), "test").await.unwrap());
        assert!(ask_once(answering("Rest."), "test").await.unwrap());
        assert!(!ask_once(failing(), "test").await.unwrap());
    }

    #[tokio::test]
    async fn test_ask_once_rejects_blank_question() {
        assert!(ask_once(answering("unused"), "  ").await.is_err());
    }

    #[test]
    fn test_config_changes() {
        let mut config = Config::new();
        assert!(!apply_config_changes(&mut config, None, None).unwrap());
        assert_eq!(config, Config::new());

        assert!(apply_config_changes(&mut config, Some("http://10.0.0.5:8000/chat"), Some("Hi.")).unwrap());
        assert_eq!(config.endpoint.as_deref(), Some("http://10.0.0.5:8000/chat"));
        assert_eq!(config.greeting(), "Hi.");

        assert!(apply_config_changes(&mut config, Some("not a url"), None).is_err());
    }
}
