//! Core domain entities
//!
//! Pure data structures and conversions with validation logic. Nothing here
//! talks to the network or the terminal.

pub mod address;
pub mod amount;
mod keypair;
pub mod result;
mod transfer;

pub use address::{parse_address_list, SuiAddress};
pub use amount::{SUI_COIN_TYPE, SUI_DECIMALS};
pub use keypair::{
    address_from_public_key, derivation_path, transaction_signing_digest, SuiKeypair,
};
pub use transfer::{PreflightReport, RecipientReport, RunEvent, RunSummary, TransferOutcome};
