//! Suidrop CLI - send SUI to every address in a file

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod input;
mod output;

use commands::{balance, config, logs, send, NodeArgs};

/// Suidrop - send the same amount of SUI to a list of addresses
#[derive(Parser)]
#[command(name = "suidrop", version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Running without a subcommand is `send`
    #[command(flatten)]
    send: send::SendArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Send SUI to every address in the address file (default)
    Send(send::SendArgs),

    /// Show the balance of the sending account
    Balance {
        /// Query this address instead of deriving one from the mnemonic
        #[arg(long)]
        address: Option<String>,
        #[command(flatten)]
        node: NodeArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            if is_early_termination(&e) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Bad input and a failed preflight stop the run without a failure code
fn is_early_termination(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<suidrop_core::Error>() {
        Some(e) => e.is_input_error() || matches!(e, suidrop_core::Error::InsufficientBalance { .. }),
        None => false,
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => send::run(cli.send),
        Some(Commands::Send(args)) => send::run(args),
        Some(Commands::Balance {
            address,
            node,
            json,
        }) => balance::run(address, node, json),
        Some(Commands::Config { command }) => config::run(command),
        Some(Commands::Logs { command }) => logs::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_send() {
        let cli = Cli::try_parse_from(["suidrop", "--amount", "1.5", "--dry-run"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.send.amount.as_deref(), Some("1.5"));
        assert!(cli.send.dry_run);
    }

    #[test]
    fn test_send_subcommand_flags() {
        let cli = Cli::try_parse_from([
            "suidrop",
            "send",
            "--file",
            "list.txt",
            "--network",
            "testnet",
            "--gas-budget",
            "20000000",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Send(args)) => {
                assert_eq!(args.file.unwrap().to_str(), Some("list.txt"));
                assert_eq!(args.node.network.as_deref(), Some("testnet"));
                assert_eq!(args.gas_budget, Some(20_000_000));
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_early_termination_errors() {
        let bad_amount: anyhow::Error = suidrop_core::Error::InvalidAmount("abc".into()).into();
        assert!(is_early_termination(&bad_amount));

        let short: anyhow::Error = suidrop_core::Error::InsufficientBalance {
            available: 1,
            required: 2,
        }
        .into();
        assert!(is_early_termination(&short));

        let rpc: anyhow::Error = suidrop_core::Error::rpc("connection refused").into();
        assert!(!is_early_termination(&rpc));

        let settings = anyhow::anyhow!("Failed to load settings");
        assert!(!is_early_termination(&settings));
    }

    #[test]
    fn test_logs_export_parses() {
        let cli = Cli::try_parse_from(["suidrop", "logs", "export", "copy.duckdb"]).unwrap();
        match cli.command {
            Some(Commands::Logs {
                command: logs::LogsCommands::Export { path, json },
            }) => {
                assert_eq!(path.to_str(), Some("copy.duckdb"));
                assert!(!json);
            }
            _ => panic!("expected logs export"),
        }
    }

    #[test]
    fn test_config_set_parses() {
        let cli = Cli::try_parse_from(["suidrop", "config", "set", "network", "devnet"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: config::ConfigCommands::Set { .. }
            })
        ));
    }
}
