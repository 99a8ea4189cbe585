//! Terminal input provider
//!
//! Mnemonic from `SUIDROP_MNEMONIC` or a hidden prompt, amount from
//! `--amount` or a prompt, recipients from the address file.

use std::path::PathBuf;

use dialoguer::{Input, Password};
use suidrop_core::adapters::address_file::read_address_file;
use suidrop_core::domain::result::{Error, Result};
use suidrop_core::ports::InputProvider;

pub const MNEMONIC_ENV: &str = "SUIDROP_MNEMONIC";

pub struct TerminalInput {
    amount: Option<String>,
    address_file: PathBuf,
}

impl TerminalInput {
    pub fn new(amount: Option<String>, address_file: PathBuf) -> Self {
        Self {
            amount,
            address_file,
        }
    }
}

impl InputProvider for TerminalInput {
    fn mnemonic(&self) -> Result<String> {
        if let Ok(phrase) = std::env::var(MNEMONIC_ENV) {
            if !phrase.trim().is_empty() {
                return Ok(phrase);
            }
        }

        Password::new()
            .with_prompt("Enter your mnemonic / seed phrase")
            .interact()
            .map_err(|e| Error::Other(format!("Failed to read mnemonic: {}", e)))
    }

    fn amount(&self) -> Result<String> {
        if let Some(amount) = &self.amount {
            return Ok(amount.clone());
        }

        Input::<String>::new()
            .with_prompt("Amount of SUI to send to each address")
            .interact_text()
            .map_err(|e| Error::Other(format!("Failed to read amount: {}", e)))
    }

    fn recipients(&self) -> Result<Vec<String>> {
        read_address_file(&self.address_file)
    }
}
