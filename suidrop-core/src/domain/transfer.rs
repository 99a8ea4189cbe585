//! Transfer outcomes and run summaries

use serde::Serialize;

use super::address::SuiAddress;

/// Final state of one recipient.
///
/// ```text
/// pending -> balance-checked -> Skipped
///                            -> signed -> dry-run -> Error
///                                                 -> Simulated (dry-run only)
///                                                 -> submitted -> Sent | Failed
/// ```
/// Any step that errors ends in `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferOutcome {
    /// Executed and the effects report success
    Sent { digest: String },
    /// Executed but the effects report a failure
    Failed { digest: String, error: String },
    /// Sender balance did not cover the amount at the time of the check
    Skipped { balance: u64 },
    /// Dry run passed; nothing was submitted
    Simulated,
    /// A step before confirmation failed
    Error { message: String },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Sent { .. } | TransferOutcome::Simulated)
    }

    /// Short name used in the event log
    pub fn event_name(&self) -> &'static str {
        match self {
            TransferOutcome::Sent { .. } => "transfer_sent",
            TransferOutcome::Failed { .. } => "transfer_failed",
            TransferOutcome::Skipped { .. } => "transfer_skipped",
            TransferOutcome::Simulated => "transfer_simulated",
            TransferOutcome::Error { .. } => "transfer_error",
        }
    }

    pub fn digest(&self) -> Option<&str> {
        match self {
            TransferOutcome::Sent { digest } | TransferOutcome::Failed { digest, .. } => {
                Some(digest)
            }
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            TransferOutcome::Failed { error, .. } => Some(error),
            TransferOutcome::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Outcome for one line of the address file
#[derive(Debug, Clone, Serialize)]
pub struct RecipientReport {
    /// Zero-based position in the address file
    pub index: usize,
    /// The entry as it appeared in the file
    pub recipient: String,
    pub outcome: TransferOutcome,
}

/// Result of the one-time balance check before the loop
#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub sender: SuiAddress,
    pub balance: u64,
    pub required: u128,
    pub recipient_count: usize,
}

impl PreflightReport {
    pub fn is_sufficient(&self) -> bool {
        u128::from(self.balance) >= self.required
    }
}

/// Progress notifications emitted while a run is in flight
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// Inputs are valid and the account is known
    Sender { address: SuiAddress, amount: u64, recipient_count: usize },
    /// The preflight balance check completed
    Preflight(PreflightReport),
    /// A recipient is about to be processed
    Started { index: usize, recipient: String },
    /// A recipient reached its final state
    Recipient(RecipientReport),
}

/// Counts per outcome for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    pub simulated: usize,
    pub errors: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &TransferOutcome) {
        match outcome {
            TransferOutcome::Sent { .. } => self.sent += 1,
            TransferOutcome::Failed { .. } => self.failed += 1,
            TransferOutcome::Skipped { .. } => self.skipped += 1,
            TransferOutcome::Simulated => self.simulated += 1,
            TransferOutcome::Error { .. } => self.errors += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.sent + self.failed + self.skipped + self.simulated + self.errors
    }
}
