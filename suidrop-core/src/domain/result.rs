//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Insufficient balance: have {available} MIST, need {required} MIST")]
    InsufficientBalance { available: u64, required: u128 },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Dry run failed: {0}")]
    DryRun(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an RPC error
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether this error is raised before any network activity
    /// (bad mnemonic, amount, address file, etc.)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::InvalidMnemonic(_)
                | Error::InvalidAmount(_)
                | Error::NotFound(_)
        )
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InsufficientBalance {
            available: 5,
            required: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: have 5 MIST, need 10 MIST"
        );

        let err = Error::rpc("connection refused");
        assert_eq!(err.to_string(), "RPC error: connection refused");
    }

    #[test]
    fn test_input_errors() {
        assert!(Error::InvalidAmount("abc".into()).is_input_error());
        assert!(Error::InvalidMnemonic("empty".into()).is_input_error());
        assert!(!Error::rpc("timeout").is_input_error());
        assert!(!Error::InsufficientBalance {
            available: 0,
            required: 1
        }
        .is_input_error());
    }
}
