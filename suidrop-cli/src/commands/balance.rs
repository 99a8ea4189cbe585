//! Balance command - show the SUI balance of the sending account

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use suidrop_core::domain::SuiAddress;
use suidrop_core::ports::InputProvider;
use suidrop_core::services::LogEvent;
use suidrop_core::{SuiKeypair, SuidropContext};

use super::{get_logger, load_config, log_event, NodeArgs};
use crate::input::TerminalInput;
use crate::output;

pub fn run(address: Option<String>, node: NodeArgs, json: bool) -> Result<()> {
    let config = load_config(&node)?;
    let network = config.network.to_string();

    // Any address can be queried; otherwise derive the sender from the mnemonic
    let owner = match address {
        Some(a) => SuiAddress::parse(&a)?,
        None => {
            let input = TerminalInput::new(None, config.address_file.clone());
            let phrase = input.mnemonic()?;
            SuiKeypair::from_mnemonic(&phrase, config.account_index)?
                .address()
                .clone()
        }
    };

    let ctx = SuidropContext::new(config)?;
    let logger = get_logger();

    let balance = match ctx.balance_service.get_balance(&owner) {
        Ok(b) => b,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("balance_failed")
                    .with_command("balance")
                    .with_network(&network)
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };
    log_event(
        &logger,
        LogEvent::new("command_executed")
            .with_command("balance")
            .with_network(&network),
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "address": owner,
                "network": network,
                "rpcUrl": ctx.node.endpoint(),
                "coinType": ctx.balance_service.coin_type(),
                "balanceMist": balance.to_string(),
                "balance": output::format_sui(balance),
            }))?
        );
        return Ok(());
    }

    println!("{} {}", "Address:".yellow(), owner.to_string().yellow());
    println!("Network: {} ({})", network, ctx.node.endpoint());
    println!(
        "{} {} ({} MIST)",
        "Balance:".yellow(),
        output::format_sui(balance).yellow(),
        balance
    );

    Ok(())
}
