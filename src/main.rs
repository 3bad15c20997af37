//! stpbridge - Bridge spanning-tree state tool
//!
//! Usage:
//!   stpbridge [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>    Configuration file path
//!   -r, --replay <FILE>    Advertisements to apply
//!   -l, --log-level        Log level (error, warn, info, debug, trace)
//!   -h, --help             Print help

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use stpbridge::bridge::BridgeManager;
use stpbridge::config::{Config, ReplayFile};
use stpbridge::stp::SharedStatus;

/// Log level for CLI
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    #[default]
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace messages (very verbose)
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// stpbridge - Spanning-tree state for bridged brokers
#[derive(Parser, Debug)]
#[command(name = "stpbridge")]
#[command(author = "VibeMQ Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Spanning-tree loop prevention for bridged MQTT brokers")]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay file of advertisements (TOML format)
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => Config::load(path),
        None => Config::from_env(),
    };
    let file_config = match file_config {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config file: {}", e);
            std::process::exit(1);
        }
    };

    // CLI overrides config, config overrides default (warn)
    let log_level = args
        .log_level
        .unwrap_or_else(|| match file_config.log.level.to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Warn,
        });

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level.to_tracing_level())
        .with_target(false)
        .with_thread_ids(true)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(path) = &args.config {
        info!("Loaded configuration from {:?}", path);
    }

    let identity = file_config.broker.identity();
    info!(
        "Broker {}:{} pid {}",
        identity.address, identity.port, identity.process_id
    );
    let status = SharedStatus::new(identity);
    let manager = Arc::new(BridgeManager::from_configs(status, &file_config.bridge));

    if let Some(path) = &args.replay {
        let replay = ReplayFile::load(path)?;
        replay_advertisements(&manager, replay).await;
    }

    report(&manager);
    Ok(())
}

/// Apply each bridge's advertisements on its own task, concurrently across
/// bridges and in file order within a bridge.
async fn replay_advertisements(manager: &Arc<BridgeManager>, replay: ReplayFile) {
    let mut handles = Vec::new();

    for (name, adverts) in replay.by_bridge() {
        let manager = manager.clone();
        handles.push(tokio::spawn(async move {
            let mut rejected = 0usize;
            for raw in adverts {
                // Rejections are logged by the manager
                if manager.apply(&name, raw).is_err() {
                    rejected += 1;
                }
                tokio::task::yield_now().await;
            }
            (name, rejected)
        }));
    }

    for handle in handles {
        match handle.await {
            Ok((name, rejected)) if rejected > 0 => {
                info!("Bridge '{}': {} advertisement(s) rejected", name, rejected);
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Replay task failed: {}", e),
        }
    }
}

fn report(manager: &BridgeManager) {
    let status = manager.protocol_status().snapshot();
    let root = &status.believed_root;
    println!(
        "root: pid {} port {} address {} (distance {}{})",
        root.process_id,
        root.port,
        root.address.as_deref().unwrap_or("-"),
        status.distance,
        if status.is_root() { ", this broker" } else { "" }
    );
    for snapshot in manager.status() {
        println!("{}", snapshot);
    }
}
