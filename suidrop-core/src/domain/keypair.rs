//! Ed25519 account derived from a BIP-39 mnemonic
//!
//! Derivation follows the Sui wallet convention:
//! BIP-39 seed (empty passphrase) -> SLIP-0010 Ed25519 along
//! `m/44'/784'/{account}'/0'/0'`. The address is
//! `blake2b256(0x00 || public_key)`.
//!
//! The secret key never leaves this module: no accessor returns it and the
//! `Debug` impl only prints the address.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bip39::Mnemonic;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use hmac::{Hmac, Mac};
use sha2::Sha512;

use super::address::SuiAddress;
use super::result::{Error, Result};

type HmacSha512 = Hmac<Sha512>;
type Blake2b256 = Blake2b<U32>;

/// SLIP-0044 coin type registered for Sui
pub const SUI_COIN_TYPE_INDEX: u32 = 784;

/// Signature scheme flag for Ed25519
const ED25519_FLAG: u8 = 0x00;

/// HMAC key for the SLIP-0010 Ed25519 master node
const ED25519_CURVE_KEY: &[u8] = b"ed25519 seed";

const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Intent prefix for transaction data: scope TransactionData, version V0, app Sui
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// Derivation path of the given account index
pub fn derivation_path(account_index: u32) -> String {
    format!("m/44'/{}'/{}'/0'/0'", SUI_COIN_TYPE_INDEX, account_index)
}

/// Signing account for the whole run
pub struct SuiKeypair {
    signing_key: SigningKey,
    address: SuiAddress,
}

impl SuiKeypair {
    /// Derive the keypair of `account_index` from a mnemonic phrase.
    ///
    /// The phrase is lowercased and its whitespace collapsed before the
    /// BIP-39 checksum is verified.
    pub fn from_mnemonic(phrase: &str, account_index: u32) -> Result<Self> {
        let normalized = phrase
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if normalized.is_empty() {
            return Err(Error::InvalidMnemonic("mnemonic is empty".to_string()));
        }

        let mnemonic = Mnemonic::parse(normalized.as_str())
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;
        let seed = mnemonic.to_seed("");

        let path = parse_derivation_path(&derivation_path(account_index))?;
        let secret = slip10_derive(&seed, &path)?;

        Ok(Self::from_secret_bytes(&secret))
    }

    /// Build a keypair from a raw 32-byte Ed25519 secret
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(secret);
        let address = address_from_public_key(&signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    pub fn address(&self) -> &SuiAddress {
        &self.address
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign BCS transaction bytes with the transaction intent.
    ///
    /// Returns the serialized signature expected by
    /// `sui_executeTransactionBlock`: base64(flag || signature || public key).
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> String {
        let digest = transaction_signing_digest(tx_bytes);
        let signature = self.signing_key.sign(&digest);

        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(self.signing_key.verifying_key().as_bytes());

        STANDARD.encode(serialized)
    }
}

impl fmt::Debug for SuiKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiKeypair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Address owned by an Ed25519 public key
pub fn address_from_public_key(public_key: &VerifyingKey) -> SuiAddress {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key.as_bytes());
    SuiAddress::from_bytes(hasher.finalize().into())
}

/// Digest that is actually signed for a transaction
pub fn transaction_signing_digest(tx_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(TRANSACTION_INTENT);
    hasher.update(tx_bytes);
    hasher.finalize().into()
}

/// Parse `m/a'/b'/...` into hardened indices. Ed25519 has no public
/// derivation, so every segment must be hardened.
fn parse_derivation_path(path: &str) -> Result<Vec<u32>> {
    let mut segments = path.split('/');
    if segments.next() != Some("m") {
        return Err(Error::validation(format!(
            "derivation path '{}' must start with m/",
            path
        )));
    }

    segments
        .map(|segment| {
            let index = segment
                .strip_suffix('\'')
                .ok_or_else(|| {
                    Error::validation(format!(
                        "segment '{}' of '{}' is not hardened",
                        segment, path
                    ))
                })?
                .parse::<u32>()
                .map_err(|_| {
                    Error::validation(format!("segment '{}' of '{}' is not a number", segment, path))
                })?;

            if index >= HARDENED_OFFSET {
                return Err(Error::validation(format!(
                    "segment '{}' of '{}' is out of range",
                    segment, path
                )));
            }
            Ok(index | HARDENED_OFFSET)
        })
        .collect()
}

/// SLIP-0010 private key derivation for Ed25519
fn slip10_derive(seed: &[u8], path: &[u32]) -> Result<[u8; 32]> {
    let (mut key, mut chain_code) = hmac_split(ED25519_CURVE_KEY, seed)?;

    for index in path {
        let mut data = Vec::with_capacity(1 + 32 + 4);
        data.push(0u8);
        data.extend_from_slice(&key);
        data.extend_from_slice(&index.to_be_bytes());
        (key, chain_code) = hmac_split(&chain_code, &data)?;
    }

    Ok(key)
}

fn hmac_split(key: &[u8], data: &[u8]) -> Result<([u8; 32], [u8; 32])> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| Error::Other(format!("HMAC key rejected: {}", e)))?;
    mac.update(data);
    let output = mac.finalize().into_bytes();

    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&output[..32]);
    right.copy_from_slice(&output[32..]);
    Ok((left, right))
}
