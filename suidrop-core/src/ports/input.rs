//! Input provider port
//!
//! Where a run gets its mnemonic, amount and recipients from. The CLI
//! prompts on the terminal and reads the address file; tests use scripted
//! values.

use crate::domain::result::Result;

/// Source of the three user inputs of a run
pub trait InputProvider {
    /// The mnemonic / seed phrase of the sending account
    fn mnemonic(&self) -> Result<String>;

    /// The raw amount to send to each recipient, as typed
    fn amount(&self) -> Result<String>;

    /// Recipient entries in transfer order
    fn recipients(&self) -> Result<Vec<String>>;
}
