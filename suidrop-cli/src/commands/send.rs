//! Send command - pay the same amount to every address in the address file

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

use suidrop_core::services::LogEvent;
use suidrop_core::{PreflightReport, RecipientReport, RunEvent, RunSummary, SuidropContext, TransferOutcome};

use super::{get_logger, load_config, log_event, NodeArgs};
use crate::input::TerminalInput;
use crate::output;

#[derive(Args, Debug, Clone, Default)]
pub struct SendArgs {
    /// File with one recipient address per line (default: address.txt)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
    /// Amount of SUI per recipient (prompted if omitted)
    #[arg(short, long)]
    pub amount: Option<String>,
    /// Gas budget per transfer in MIST
    #[arg(long)]
    pub gas_budget: Option<u64>,
    /// Build, sign and dry-run every transfer without submitting
    #[arg(long)]
    pub dry_run: bool,
    #[command(flatten)]
    pub node: NodeArgs,
}

pub fn run(args: SendArgs) -> Result<()> {
    let mut config = load_config(&args.node)?;
    if let Some(budget) = args.gas_budget {
        config.set("gas-budget", &budget.to_string())?;
    }
    let address_file = args.file.unwrap_or_else(|| config.address_file.clone());

    let logger = get_logger();
    let run_id = Uuid::new_v4().to_string();
    let network = config.network.to_string();
    let event = |name: &str| {
        LogEvent::new(name)
            .with_run_id(&run_id)
            .with_network(&network)
            .with_command("send")
    };

    let ctx = SuidropContext::new(config)?;
    let service = ctx.transfer_service(args.dry_run);
    let input = TerminalInput::new(args.amount, address_file);

    log_event(&logger, event("run_started"));
    output::info(&format!("Network: {} ({})", network, ctx.node.endpoint()));
    if args.dry_run {
        output::warning("DRY RUN - transfers are simulated, nothing is submitted");
    }

    let mut progress: Option<ProgressBar> = None;
    let mut total = 0usize;

    let result = service.run(&input, |run_event| match run_event {
        RunEvent::Sender {
            address,
            amount,
            recipient_count,
        } => {
            println!("{} {}", "Sender:".yellow(), address.to_string().yellow());
            println!(
                "Sending {} to each of {} addresses",
                output::format_sui(*amount),
                recipient_count
            );
            total = *recipient_count;
        }
        RunEvent::Preflight(report) => {
            println!("{}", balance_line(report));
            if report.is_sufficient() {
                progress = new_progress(report.recipient_count);
            }
        }
        RunEvent::Started { recipient, .. } => {
            if let Some(pb) = &progress {
                pb.set_message(short_address(recipient));
            }
        }
        RunEvent::Recipient(report) => {
            print_line(&progress, &outcome_line(report, total));

            let mut entry = event(report.outcome.event_name())
                .with_error_details(format!("recipient #{}", report.index + 1));
            if let Some(digest) = report.outcome.digest() {
                entry = entry.with_digest(digest);
            }
            if let Some(message) = report.outcome.error_message() {
                entry = entry.with_error(message);
            }
            log_event(&logger, entry);

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }
    });

    if let Some(pb) = progress.take() {
        pb.finish_and_clear();
    }

    match result {
        Ok(summary) => {
            println!();
            print_summary(&summary, args.dry_run);
            log_event(&logger, event("run_completed"));
            Ok(())
        }
        Err(e) => {
            log_event(&logger, event("run_failed").with_error(e.to_string()));
            Err(e.into())
        }
    }
}

fn new_progress(len: usize) -> Option<ProgressBar> {
    if len < 2 || !atty::is(atty::Stream::Stdout) {
        return None;
    }

    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} | {msg}")
        .ok()?
        .progress_chars("#>-");
    pb.set_style(style);
    Some(pb)
}

/// Print above the progress bar when one is active
fn print_line(progress: &Option<ProgressBar>, line: &str) {
    match progress {
        Some(pb) => pb.println(line),
        None => println!("{}", line),
    }
}

/// Balance only; a shortfall is reported from the returned error
fn balance_line(report: &PreflightReport) -> String {
    format!(
        "{} {}",
        "Balance:".yellow(),
        output::format_sui(report.balance).yellow()
    )
}

fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 14 {
        return address.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

fn outcome_line(report: &RecipientReport, total: usize) -> String {
    let position = format!("[{}/{}]", report.index + 1, total);
    let recipient = &report.recipient;

    match &report.outcome {
        TransferOutcome::Sent { digest } => format!(
            "{} Transfer to {} successful: {}",
            position,
            recipient,
            digest
        )
        .green()
        .to_string(),
        TransferOutcome::Failed { digest, error } => format!(
            "{} Transfer to {} failed on chain ({}): {}",
            position, recipient, digest, error
        )
        .red()
        .to_string(),
        TransferOutcome::Skipped { balance } => format!(
            "{} Skipping {}: balance {} is below the amount",
            position,
            recipient,
            output::format_sui(*balance)
        )
        .red()
        .to_string(),
        TransferOutcome::Simulated => {
            format!("{} Dry run to {} succeeded", position, recipient)
                .cyan()
                .to_string()
        }
        TransferOutcome::Error { message } => {
            format!("{} Error sending to {}: {}", position, recipient, message)
                .red()
                .to_string()
        }
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let mut table = output::create_table();
    table.set_header(vec!["Outcome", "Count"]);

    if dry_run {
        table.add_row(vec!["Simulated".to_string(), summary.simulated.to_string()]);
    } else {
        table.add_row(vec!["Sent".to_string(), summary.sent.to_string()]);
        table.add_row(vec!["Failed on chain".to_string(), summary.failed.to_string()]);
    }
    table.add_row(vec!["Skipped".to_string(), summary.skipped.to_string()]);
    table.add_row(vec!["Errors".to_string(), summary.errors.to_string()]);
    table.add_row(vec!["Total".to_string(), summary.total().to_string()]);

    println!("{}", table);

    let problems = summary.failed + summary.skipped + summary.errors;
    if problems == 0 {
        output::success("All transfers completed.");
    } else {
        output::warning(&format!("{} of {} transfers did not go through.", problems, summary.total()));
    }
}
