//! Configuration management
//!
//! Settings live in `settings.json` inside the suidrop directory:
//! ```json
//! {
//!   "network": "testnet",
//!   "rpcUrl": "https://my-node.example.com",
//!   "gasBudget": 10000000,
//!   "addressFile": "address.txt",
//!   "accountIndex": 0
//! }
//! ```
//! `SUIDROP_NETWORK` and `SUIDROP_RPC_URL` override the file for one process
//! and are never written back.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::services::DEFAULT_GAS_BUDGET;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_ADDRESS_FILE: &str = "address.txt";

pub const ENV_NETWORK: &str = "SUIDROP_NETWORK";
pub const ENV_RPC_URL: &str = "SUIDROP_RPC_URL";

/// Keys accepted by `Config::set`
pub const CONFIG_KEYS: &[&str] = &[
    "network",
    "rpc-url",
    "gas-budget",
    "address-file",
    "account-index",
];

/// Sui network with a public full node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }

    /// Public full node JSON-RPC endpoint
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            other => bail!(
                "Unknown network '{}' (expected mainnet, testnet, devnet or localnet)",
                other
            ),
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    network: Option<Network>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rpc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gas_budget: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_index: Option<u32>,
    /// Keys this version does not manage
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Effective configuration (settings file plus environment)
#[derive(Debug, Clone)]
pub struct Config {
    pub network: Network,
    /// Custom endpoint; `None` uses the network's public node
    pub rpc_url: Option<String>,
    pub gas_budget: u64,
    pub address_file: PathBuf,
    pub account_index: u32,
    // Set when rpc_url came from SUIDROP_RPC_URL
    rpc_url_from_env: bool,
    // What is written back on save; environment overrides never land here
    raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(SettingsFile::default())
    }
}

impl Config {
    fn from_settings(raw: SettingsFile) -> Self {
        Self {
            network: raw.network.unwrap_or_default(),
            rpc_url: raw.rpc_url.clone().filter(|u| !u.trim().is_empty()),
            gas_budget: raw.gas_budget.unwrap_or(DEFAULT_GAS_BUDGET),
            address_file: PathBuf::from(
                raw.address_file
                    .as_deref()
                    .unwrap_or(DEFAULT_ADDRESS_FILE),
            ),
            account_index: raw.account_index.unwrap_or(0),
            rpc_url_from_env: false,
            raw_settings: raw,
        }
    }

    /// Load config from the suidrop directory, applying environment overrides
    pub fn load(suidrop_dir: &Path) -> Result<Self> {
        Self::load_with_env(suidrop_dir, |key| std::env::var(key).ok())
    }

    /// Load config with a custom environment lookup
    pub fn load_with_env<F>(suidrop_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings_path = suidrop_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {}", settings_path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings in {}", settings_path.display()))?
        } else {
            SettingsFile::default()
        };

        let mut config = Self::from_settings(raw);

        if let Some(network) = env(ENV_NETWORK).filter(|v| !v.trim().is_empty()) {
            config.network = network
                .parse()
                .with_context(|| format!("Invalid {}", ENV_NETWORK))?;
        }
        if let Some(url) = env(ENV_RPC_URL).filter(|v| !v.trim().is_empty()) {
            config.rpc_url = Some(url);
            config.rpc_url_from_env = true;
        }

        Ok(config)
    }

    /// Save config to the suidrop directory.
    /// Preserves settings this version doesn't manage.
    pub fn save(&self, suidrop_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(suidrop_dir)?;
        let settings_path = suidrop_dir.join(SETTINGS_FILE);

        let content = serde_json::to_string_pretty(&self.raw_settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Endpoint to talk to: the custom URL if set, else the network default
    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.network.default_rpc_url().to_string())
    }

    /// Switch network for this invocation. A saved custom endpoint belongs to
    /// the saved network and is dropped; a SUIDROP_RPC_URL override is kept.
    pub fn switch_network(&mut self, value: &str) -> Result<()> {
        self.set("network", value)?;
        if !self.rpc_url_from_env {
            self.rpc_url = None;
        }
        Ok(())
    }

    /// Update one setting by its CLI key. Takes effect now and on the next save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "network" => {
                let network: Network = value.parse()?;
                self.network = network;
                self.raw_settings.network = Some(network);
            }
            "rpc-url" => {
                if value.is_empty() || value.eq_ignore_ascii_case("default") {
                    self.rpc_url = None;
                    self.rpc_url_from_env = false;
                    self.raw_settings.rpc_url = None;
                } else {
                    let parsed = url::Url::parse(value)
                        .with_context(|| format!("Invalid RPC URL '{}'", value))?;
                    if !matches!(parsed.scheme(), "http" | "https") {
                        bail!("RPC URL must use http or https");
                    }
                    self.rpc_url = Some(value.to_string());
                    self.rpc_url_from_env = false;
                    self.raw_settings.rpc_url = Some(value.to_string());
                }
            }
            "gas-budget" => {
                let budget: u64 = value
                    .parse()
                    .with_context(|| format!("Gas budget must be a whole number of MIST, got '{}'", value))?;
                if budget == 0 {
                    bail!("Gas budget must be greater than zero");
                }
                self.gas_budget = budget;
                self.raw_settings.gas_budget = Some(budget);
            }
            "address-file" => {
                if value.is_empty() {
                    bail!("Address file path cannot be empty");
                }
                self.address_file = PathBuf::from(value);
                self.raw_settings.address_file = Some(value.to_string());
            }
            "account-index" => {
                let index: u32 = value
                    .parse()
                    .with_context(|| format!("Account index must be a non-negative integer, got '{}'", value))?;
                self.account_index = index;
                self.raw_settings.account_index = Some(index);
            }
            other => bail!(
                "Unknown config key '{}' (expected one of: {})",
                other,
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }
}
