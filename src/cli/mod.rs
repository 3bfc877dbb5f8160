//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `run` (default) -- watch the configured chat and answer room requests
//! - `extract` -- print the room count found in a message
//! - `simulate` -- replay message files through the engine without side effects
//! - `config show|path|schema|validate` -- inspect configuration
//! - `version` -- print build/version info

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Auto-responder for room-availability requests.
#[derive(Parser, Debug)]
#[command(
    name = "roomrelay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Answers room-availability requests in a group chat and tracks vacancies"
)]
pub struct Cli {
    /// Config file (default: $ROOMRELAY_CONFIG_PATH or the user config dir).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch the chat and answer requests (default when no subcommand is given).
    Run,

    /// Print the number of rooms requested in a message.
    Extract {
        /// Room category to look for.
        #[arg(long, default_value = DEFAULT_ROOM_CATEGORY)]
        category: String,

        /// Message file (reads stdin when omitted).
        file: Option<PathBuf>,
    },

    /// Feed message files through the engine and print each decision.
    Simulate {
        /// Override the configured room category.
        #[arg(long)]
        category: Option<String>,

        /// Message files, processed in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Inspect configuration.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print version, build date, and git commit information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the loaded configuration as JSON.
    Show,

    /// Print the resolved configuration file path.
    Path,

    /// Print the JSON schema for the configuration file.
    Schema,

    /// Load and validate the configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

use crate::autoreply::{AutoReplyEngine, DispatchState};
use crate::channels::{FileChannel, ScriptedChannel};
use crate::config::{self, ConfigStore, MemoryVacancyStore};
use crate::dispatch::Dispatcher;
use crate::logging;
use crate::rooms::{extract_room_count, DEFAULT_ROOM_CATEGORY};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Resolve the config path from the flag or the default location.
pub fn resolve_config_path(flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .unwrap_or_else(config::get_config_path)
}

/// Run the `run` subcommand.
pub async fn handle_run(config_path: &Path) -> CliResult {
    let cfg = config::load_config(config_path)?;
    logging::init_logging(&cfg.logging)?;

    tracing::info!(
        config = %config_path.display(),
        chat = %cfg.autoreply.chat_group_name,
        category = %cfg.autoreply.room_category,
        vacant = cfg.autoreply.number_of_vacant_rooms,
        "Starting roomrelay"
    );

    let channel = Arc::new(FileChannel::new(
        cfg.channel.clone(),
        cfg.autoreply.chat_group_name.clone(),
    ));
    let interval = cfg.autoreply.check_interval();
    let state = DispatchState::new(cfg.autoreply.number_of_vacant_rooms);
    let dispatcher = Dispatcher::new(
        Arc::new(AutoReplyEngine::new(cfg.autoreply)),
        channel,
        Arc::new(ConfigStore::new(config_path)),
        state,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        tracing::info!("Shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    let state = dispatcher.run(interval, shutdown_rx).await;
    tracing::info!(
        vacant = state.vacant_rooms(),
        processed = state.processed_count(),
        "roomrelay stopped"
    );
    Ok(())
}

/// Run the `extract` subcommand.
pub fn handle_extract(category: &str, file: Option<&Path>) -> CliResult {
    let message = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    println!("{}", extract_room_count(&message, category));
    Ok(())
}

/// Run the `simulate` subcommand.
pub async fn handle_simulate(
    config_path: &Path,
    category: Option<&str>,
    files: &[PathBuf],
) -> CliResult {
    let mut cfg = config::load_config(config_path)?;
    if let Some(category) = category {
        cfg.autoreply.room_category = category.to_string();
    }

    let chat = cfg.autoreply.chat_group_name.clone();
    let channel = Arc::new(ScriptedChannel::new(vec![chat.clone()]).with_current_chat(chat));
    let state = DispatchState::new(cfg.autoreply.number_of_vacant_rooms);
    let mut dispatcher = Dispatcher::new(
        Arc::new(AutoReplyEngine::new(cfg.autoreply)),
        channel.clone(),
        Arc::new(MemoryVacancyStore::new()),
        state,
    );

    for file in files {
        channel.push_message(std::fs::read_to_string(file)?);
        match dispatcher.tick(Utc::now()).await? {
            Some(decision) => println!("{}: {}", file.display(), decision),
            None => println!("{}: empty message", file.display()),
        }
    }

    println!(
        "Vacant rooms: {} (replies sent: {})",
        dispatcher.state().vacant_rooms(),
        channel.sent().len()
    );
    Ok(())
}

/// Run the `config show` subcommand.
pub fn handle_config_show(config_path: &Path) -> CliResult {
    let cfg = config::load_config(config_path)?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}

/// Run the `config path` subcommand.
pub fn handle_config_path(config_path: &Path) {
    println!("{}", config_path.display());
}

/// Run the `config schema` subcommand.
pub fn handle_config_schema() -> CliResult {
    let schema = config::schema::generate_config_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Run the `config validate` subcommand.
pub fn handle_config_validate(config_path: &Path) -> CliResult {
    config::load_config(config_path)?;
    println!("Configuration OK: {}", config_path.display());
    Ok(())
}

/// Run the `version` subcommand.
pub fn handle_version() {
    println!("roomrelay {}", env!("CARGO_PKG_VERSION"));
    println!("  Build date: {}", env!("ROOMRELAY_BUILD_DATE"));
    println!("  Git commit: {}", env!("ROOMRELAY_GIT_HASH"));
    println!(
        "  Platform:   {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}
