//! CLI command implementations

pub mod balance;
pub mod config;
pub mod logs;
pub mod send;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use suidrop_core::config::Config;
use suidrop_core::services::{LogEvent, LoggingService};

/// Node selection flags shared by commands that talk to the network
#[derive(Args, Debug, Clone, Default)]
pub struct NodeArgs {
    /// Network to use (mainnet, testnet, devnet, localnet); ignores a saved rpc-url
    /// but not SUIDROP_RPC_URL
    #[arg(long)]
    pub network: Option<String>,
    /// Custom JSON-RPC endpoint (overrides the network's public node)
    #[arg(long)]
    pub rpc_url: Option<String>,
    /// Account index in the derivation path m/44'/784'/N'/0'/0'
    #[arg(long)]
    pub account_index: Option<u32>,
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (never blocks a command)
pub fn get_logger() -> Option<LoggingService> {
    let suidrop_dir = get_suidrop_dir().ok()?;
    LoggingService::new(&suidrop_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the suidrop directory from environment or default
pub fn get_suidrop_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SUIDROP_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".suidrop"))
        .context("Could not find home directory; set SUIDROP_DIR")
}

/// Load settings and apply per-invocation flags
pub fn load_config(args: &NodeArgs) -> Result<Config> {
    let suidrop_dir = get_suidrop_dir()?;
    let mut config = Config::load(&suidrop_dir)
        .with_context(|| format!("Failed to load settings from {}", suidrop_dir.display()))?;

    if let Some(network) = &args.network {
        config.switch_network(network)?;
    }
    if let Some(url) = &args.rpc_url {
        config.set("rpc-url", url)?;
    }
    if let Some(index) = args.account_index {
        config.account_index = index;
    }

    Ok(config)
}
