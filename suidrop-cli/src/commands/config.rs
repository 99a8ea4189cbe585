//! Config command - show and change persistent settings

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde_json::json;

use suidrop_core::config::{Config, CONFIG_KEYS, SETTINGS_FILE};

use super::get_suidrop_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a setting (network, rpc-url, gas-budget, address-file, account-index)
    Set {
        /// Setting name
        key: String,
        /// New value ("default" resets rpc-url)
        value: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let suidrop_dir = get_suidrop_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&suidrop_dir)?;
            let settings_path = suidrop_dir.join(SETTINGS_FILE);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "network": config.network,
                        "rpcUrl": config.rpc_url(),
                        "gasBudget": config.gas_budget,
                        "addressFile": config.address_file,
                        "accountIndex": config.account_index,
                        "settingsPath": settings_path,
                    }))?
                );
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Setting", "Value"]);
            table.add_row(vec!["network".to_string(), config.network.to_string()]);
            table.add_row(vec!["rpc-url".to_string(), config.rpc_url()]);
            table.add_row(vec![
                "gas-budget".to_string(),
                format!("{} MIST ({})", config.gas_budget, output::format_sui(config.gas_budget)),
            ]);
            table.add_row(vec![
                "address-file".to_string(),
                config.address_file.display().to_string(),
            ]);
            table.add_row(vec![
                "account-index".to_string(),
                config.account_index.to_string(),
            ]);

            println!("{}", table);
            println!("{} {}", "Settings file:".dimmed(), settings_path.display());
        }
        ConfigCommands::Set { key, value } => {
            if !CONFIG_KEYS.contains(&key.as_str()) {
                anyhow::bail!(
                    "Unknown setting '{}'. Available: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                );
            }

            // Without env overrides so they are not mistaken for saved values
            let mut config = Config::load_with_env(&suidrop_dir, |_| None)?;
            config.set(&key, &value)?;
            config.save(&suidrop_dir)?;

            output::success(&format!("Set {} = {}", key, value.trim()));
        }
    }

    Ok(())
}
