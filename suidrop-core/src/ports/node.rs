//! Sui full node port
//!
//! Everything the transfer flow needs from a remote node. The node builds
//! transaction bytes and executes them; signing happens locally.

use crate::domain::result::Result;
use crate::domain::SuiAddress;

/// A coin object owned by the sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinRef {
    pub object_id: String,
    pub balance: u64,
}

/// Request to build a pay-SUI transaction.
///
/// `input_coins` are merged into the first coin, which also pays gas;
/// `amount` is split off and sent to `recipient`.
#[derive(Debug, Clone)]
pub struct PayRequest {
    pub signer: SuiAddress,
    pub input_coins: Vec<String>,
    pub recipient: SuiAddress,
    pub amount: u64,
    pub gas_budget: u64,
}

/// Effects status reported by a dry run or an execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failure(String),
}

/// Result of submitting a signed transaction
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub digest: String,
    pub status: ExecutionStatus,
}

/// Remote node trait
///
/// Implementations talk to a Sui full node. The transfer and balance
/// services only depend on this trait, so tests can script node behaviour.
pub trait SuiNode: Send + Sync {
    /// Endpoint description for messages (e.g. the RPC URL)
    fn endpoint(&self) -> &str;

    /// Total balance of `coin_type` owned by `owner`, in base units
    fn get_balance(&self, owner: &SuiAddress, coin_type: &str) -> Result<u64>;

    /// All coin objects of `coin_type` owned by `owner`
    fn get_coins(&self, owner: &SuiAddress, coin_type: &str) -> Result<Vec<CoinRef>>;

    /// Ask the node to build unsigned transaction bytes for a payment
    fn build_pay_sui(&self, request: &PayRequest) -> Result<Vec<u8>>;

    /// Simulate a transaction against current state without committing it
    fn dry_run(&self, tx_bytes: &[u8]) -> Result<ExecutionStatus>;

    /// Submit a signed transaction and wait for local execution
    fn execute(&self, tx_bytes: &[u8], signature: &str) -> Result<ExecutionOutcome>;
}
