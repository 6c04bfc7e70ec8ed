use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use relaychat_controller::{AutoConfirm, Controller, NullRenderer, Renderer};
use relaychat_core::config::FileLoggingConfig;
use relaychat_core::logging::{self, LoggingConfig};
use relaychat_core::storage;
use relaychat_core::{Config, KeyValueStore, MemoryStore, Preferences, ProviderConfig};
use relaychat_providers::{ProviderFactory, ProviderHealthChecker};
use relaychat_store::SqliteStore;
use relaychat_ui::{App, AppState, TranscriptView, default_export_dir};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// relaychat - terminal chat client for a Gemini relay proxy
#[derive(Parser, Debug)]
#[command(name = "relaychat")]
#[command(about = "A terminal chat client for Gemini-style completion endpoints", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to config.toml (default: ~/.relaychat/config.toml)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Conversation store file (overrides [storage].path)
    #[arg(long, value_name = "PATH", global = true)]
    store: Option<PathBuf>,

    /// Keep the conversation in memory only
    #[arg(long, global = true, conflicts_with = "store")]
    ephemeral: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Write the saved conversation to chat-export-<date>.txt
    Export {
        /// Output directory (default: Downloads, then home)
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Delete the saved conversation
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show configuration, saved conversation and provider health
    Status,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("{} Failed to read .env: {}", "Warning:".yellow().bold(), e);
    }

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = load_or_create_config(&config_path)?;
    config.provider = config.provider.with_env_api_key();

    let command = cli.command.clone().unwrap_or(Commands::Chat);
    let _guard = init_logging(&config, &command, cli.verbose)?;

    if cli.verbose {
        println!("{} Using config: {}", "Info:".blue().bold(), config_path.display());
        println!("{} Provider: {}", "Info:".blue().bold(), config.provider.name().cyan());
    }

    let (store, store_location) = open_store(&cli, &config)?;
    tracing::debug!(store = %store_location, command = ?command, "starting");

    match command {
        Commands::Chat => cmd_chat(config, store).await?,
        Commands::Export { out } => cmd_export(&config, store, out)?,
        Commands::Clear { yes } => cmd_clear(&config, store, yes)?,
        Commands::Status => cmd_status(&config, &config_path, store, &store_location).await?,
    }

    Ok(())
}

fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".relaychat").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Load config from file, or write the example there and use it
fn load_or_create_config(path: &Path) -> Result<Config> {
    if path.exists() {
        return Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e));
    }

    println!("{} Config not found at {}", "Warning:".yellow().bold(), path.display());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    std::fs::write(path, Config::example()).context("Failed to create config")?;
    println!("{} Created config at {} with default settings", "Success:".green().bold(), path.display());

    Config::from_toml_str(Config::example()).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
}

/// The chat screen owns the terminal, so it logs to file only.
fn init_logging(
    config: &Config, command: &Commands, verbose: bool,
) -> Result<Option<relaychat_core::logging::WorkerGuard>> {
    let mut logging_config = LoggingConfig::from(config.logging.clone());
    if verbose {
        logging_config = logging_config.with_level("debug");
    }

    if *command == Commands::Chat {
        let file = logging_config.file.take().unwrap_or_default();
        logging_config = logging_config.without_stderr().with_file_logging(FileLoggingConfig { enabled: true, ..file });
    }

    logging::init_logging(Some(logging_config)).context("Failed to initialize logging")
}

fn open_store(cli: &Cli, config: &Config) -> Result<(Arc<dyn KeyValueStore>, String)> {
    let quota = config.storage.max_value_bytes;
    if cli.ephemeral {
        return Ok((Arc::new(MemoryStore::with_quota(quota)), "memory (not saved)".to_string()));
    }

    let path = match &cli.store {
        Some(path) => path.clone(),
        None => config.storage.resolve_path().context("Failed to resolve store path")?,
    };
    let store = SqliteStore::open(&path)
        .with_context(|| format!("Failed to open store at {}", path.display()))?
        .with_quota(quota);

    Ok((Arc::new(store), path.display().to_string()))
}

fn build_controller<R: Renderer>(config: &Config, store: Arc<dyn KeyValueStore>, renderer: R) -> Result<Controller<R>> {
    let provider = ProviderFactory::create_from_config(&config.provider).context("Failed to create provider")?;
    let privacy = LoggingConfig::from(config.logging.clone()).privacy;

    Ok(Controller::new(provider, store, renderer).with_generation(config.generation).with_privacy(privacy))
}

/// Start the interactive chat
async fn cmd_chat(config: Config, store: Arc<dyn KeyValueStore>) -> Result<()> {
    let controller = build_controller(&config, store.clone(), TranscriptView::new())?;
    let provider_name = controller.provider().name().to_string();

    let state = AppState::new(Preferences::load(store), config.ui.templates.clone(), config.ui.max_message_length)
        .with_provider_name(provider_name.as_str());
    let mut app = App::new(state, controller);

    let restored = app.initialize();
    tracing::info!(restored, provider = %provider_name, "chat started");

    app.run().await.context("Terminal UI failed")?;
    tracing::info!("chat closed");
    Ok(())
}

/// Write the saved conversation to a text file
fn cmd_export(config: &Config, store: Arc<dyn KeyValueStore>, out: Option<PathBuf>) -> Result<()> {
    let mut controller = build_controller(config, store, NullRenderer)?;
    let turns = controller.restore();

    let dir = out.unwrap_or_else(default_export_dir);
    let path = controller
        .export()
        .write_to(&dir)
        .with_context(|| format!("Failed to write export to {}", dir.display()))?;

    println!(
        "{} Exported {} messages to {}",
        "Success:".green().bold(),
        turns,
        path.display().cyan()
    );
    Ok(())
}

/// Delete the saved conversation
fn cmd_clear(config: &Config, store: Arc<dyn KeyValueStore>, yes: bool) -> Result<()> {
    let unreadable = storage::load_transcript(store.as_ref()).is_err();
    let mut controller = build_controller(config, store, NullRenderer)?;
    let turns = controller.restore();
    if turns == 0 && !unreadable {
        println!("{} No saved conversation", "Info:".blue().bold());
        return Ok(());
    }
    if unreadable {
        println!("{} Saved conversation is unreadable", "Warning:".yellow().bold());
    }

    let cleared = if yes { controller.clear(&AutoConfirm) } else { controller.clear(&prompt_stdin) };

    if cleared {
        println!("{} Cleared {} messages", "Success:".green().bold(), turns);
    } else {
        println!("{} Kept {} messages", "Info:".blue().bold(), turns);
    }
    Ok(())
}

fn prompt_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(_) => false,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Show current status
async fn cmd_status(
    config: &Config, config_path: &Path, store: Arc<dyn KeyValueStore>, store_location: &str,
) -> Result<()> {
    println!("{}", "relaychat status".green().bold().underline());
    println!();

    println!("{} Configuration", "Info:".blue().bold());
    println!("  Config file: {}", config_path.display().cyan());
    println!("  Provider: {}", config.provider.name().cyan());
    match &config.provider {
        ProviderConfig::Relay { endpoint } => println!("  Endpoint: {}", endpoint.cyan()),
        ProviderConfig::Gemini { model, base_url, .. } => {
            println!("  Model: {}", model.cyan());
            println!("  Base URL: {}", base_url.cyan());
        }
        ProviderConfig::Mock { responses_file } => match responses_file {
            Some(path) => println!("  Responses: {}", path.display().cyan()),
            None => println!("  Responses: {}", "built-in".cyan()),
        },
    }
    println!(
        "  Generation: temperature {}, max {} tokens",
        config.generation.temperature, config.generation.max_output_tokens
    );

    println!();
    println!("{} Storage", "Info:".blue().bold());
    println!("  Location: {}", store_location.cyan());
    match storage::load_transcript(store.as_ref()) {
        Ok(transcript) => println!("  Saved messages: {}", transcript.len().to_string().cyan()),
        Err(e) => println!("  Saved messages: {} ({})", "unreadable".red(), e),
    }
    let preferences = Preferences::load(store);
    println!("  Theme: {}", preferences.theme().as_str().cyan());
    println!("  Font size: {}", preferences.font_size().as_str().cyan());

    println!();
    println!("{} Provider health", "Info:".blue().bold());
    let provider = ProviderFactory::create_from_config(&config.provider).context("Failed to create provider")?;
    if !provider.is_configured() {
        println!("  {}", "API key not configured".yellow());
    }

    let result = ProviderHealthChecker::new(provider, Duration::from_secs(5)).check().await;
    if result.healthy {
        println!("  {} ({} ms)", "healthy".green(), result.latency_ms);
    } else {
        println!("  {} {}", "unhealthy:".red(), result.error.unwrap_or_default());
    }

    Ok(())
}
