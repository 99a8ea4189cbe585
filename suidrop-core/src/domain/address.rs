//! Sui addresses and recipient lists

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Number of hex digits in a canonical address (32 bytes)
const ADDRESS_HEX_LEN: usize = 64;

fn address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(0[xX])?[0-9a-fA-F]{1,64}$").expect("address pattern is valid")
    })
}

/// A 32-byte Sui address in canonical form (`0x` + 64 lowercase hex digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SuiAddress(String);

impl SuiAddress {
    /// Parse an address, accepting short or unprefixed hex.
    ///
    /// `0x2` becomes `0x000...002`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if !address_pattern().is_match(trimmed) {
            return Err(Error::InvalidAddress(format!(
                "'{}' is not a hex address of at most {} digits",
                trimmed, ADDRESS_HEX_LEN
            )));
        }

        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed)
            .to_lowercase();

        Ok(Self(format!("0x{:0>width$}", digits, width = ADDRESS_HEX_LEN)))
    }

    /// Build an address from its raw 32 bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SuiAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SuiAddress> for String {
    fn from(address: SuiAddress) -> Self {
        address.0
    }
}

/// Split the contents of an address file into recipient entries.
///
/// One address per line. Lines are trimmed (which also strips the `\r` of
/// CRLF files), blank lines are dropped and file order is kept. Entries are
/// not validated here; a bad entry is reported when its turn comes.
pub fn parse_address_list(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
