mod cli;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cli::{Command, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use volctl::config::Config;
use volctl::{ApiClient, VolumeManager};

/// Manage block storage volumes
#[derive(Parser, Debug)]
#[command(name = "volctl", version, about, long_about = None)]
struct Args {
    /// Versioned API endpoint, e.g. http://cinder:8776/v1/<tenant>
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Auth token sent as X-Auth-Token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("volctl started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("volctl").join("volctl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".volctl").join("volctl.log");
    }
    PathBuf::from("volctl.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_guard = setup_logging(args.log_level)?;

    let mut config = Config::load();

    if let Command::Configure { timeout_secs } = &args.command {
        if let Some(endpoint) = &args.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(token) = &args.token {
            config.auth_token = Some(token.clone());
        }
        if timeout_secs.is_some() {
            config.timeout_secs = *timeout_secs;
        }
        config.save().context("Failed to save configuration")?;
        if let Some(path) = Config::config_path() {
            println!("Saved {}", path.display());
        }
        return Ok(());
    }

    let client_config = config
        .with_env()
        .resolve(args.endpoint.as_deref(), args.token.as_deref())?;
    tracing::info!("Using endpoint: {}", client_config.endpoint);

    let client = ApiClient::new(&client_config).context("Failed to create API client")?;
    let manager = VolumeManager::new(client);

    let result = cli::run(&manager, args.command, args.output).await;
    if let Err(err) = &result {
        tracing::error!("Command failed: {:?}", err);
        eprintln!("Error: {}", cli::format_api_error(err));
    }

    // Flush the log file before exiting
    drop(log_guard);
    if result.is_err() {
        std::process::exit(1);
    }

    Ok(())
}
