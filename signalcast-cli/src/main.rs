//! Signalcast CLI — run the signal engine and serve its events.
//!
//! Commands:
//! - `serve` — process a CSV bar feed and serve signals over WebSocket
//! - `run` — process a feed offline and print emitted signals

mod feed;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use signalcast_core::config::StrategyConfig;
use signalcast_core::engine::{NullSink, Pipeline};
use signalcast_server::service::DistributionService;
use signalcast_server::{ws, ChannelSink};

#[derive(Parser)]
#[command(
    name = "signalcast",
    about = "RSI/MACD signal engine with a WebSocket event feed"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a bar feed and serve signals to WebSocket subscribers.
    Serve {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV bar feed (timestamp,open,high,low,close,volume).
        #[arg(long)]
        data: PathBuf,

        /// Listen address for subscribers. Overrides the config file's
        /// `[server] bind` (default 0.0.0.0:8765).
        #[arg(long)]
        bind: Option<String>,
    },
    /// Process a bar feed offline and print emitted signals.
    Run {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV bar feed (timestamp,open,high,low,close,volume).
        #[arg(long)]
        data: PathBuf,
    },
}

/// Top-level TOML file: `[strategy]` and `[server]` tables, everything
/// defaulted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AppConfig {
    strategy: StrategyConfig,
    server: ServerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ServerConfig {
    bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8765".to_string(),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let app = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).context("parsing config")?
        }
        None => AppConfig::default(),
    };
    app.strategy.validate()?;
    info!(hash = %app.strategy.config_hash(), "strategy config loaded");
    Ok(app)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { config, data, bind } => serve(config.as_deref(), &data, bind).await,
        Commands::Run { config, data } => run_offline(config.as_deref(), &data),
    }
}

async fn serve(config: Option<&Path>, data: &Path, bind: Option<String>) -> Result<()> {
    let app = load_config(config)?;
    let config = app.strategy;
    let bind = bind.unwrap_or(app.server.bind);
    let bars = feed::load_bars(data)?;
    info!(bars = bars.len(), "bar feed loaded");

    let (service, signal_tx, handle) = DistributionService::new();
    tokio::spawn(service.run());

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;

    // The pipeline is synchronous and deterministic; it runs off the
    // reactor and hands signals over through the distribution channel.
    tokio::task::spawn_blocking(move || {
        let mut pipeline = Pipeline::new(config, Box::new(ChannelSink::new(signal_tx)));
        let emitted = pipeline.process_bars(&bars);
        info!(signals = emitted.len(), "bar feed drained");
    });

    tokio::select! {
        result = ws::serve(listener, handle) => result.map_err(Into::into),
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            Ok(())
        }
    }
}

fn run_offline(config: Option<&Path>, data: &Path) -> Result<()> {
    let config = load_config(config)?.strategy;
    let bars = feed::load_bars(data)?;
    let mut pipeline = Pipeline::new(config, Box::new(NullSink));
    let emitted = pipeline.process_bars(&bars);
    for signal in &emitted {
        println!(
            "{} {} @ {}",
            signal.timestamp.format("%Y-%m-%d %H:%M:%S"),
            signal.kind,
            signal.price
        );
    }
    info!(
        bars = bars.len(),
        signals = emitted.len(),
        "offline run complete"
    );
    Ok(())
}
