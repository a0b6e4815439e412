//! Error types for the ledger

use crate::types::{Address, Balance};
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Sender cannot cover the requested amount
    #[error("Insufficient balance: account {account} holds {balance}, requested {requested}")]
    InsufficientBalance {
        /// Debited account
        account: Address,
        /// Balance at the time of the call
        balance: Balance,
        /// Amount the caller tried to move
        requested: Balance,
    },

    /// Amount is negative or not a base-10 integer
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Address is not 20 hex-encoded bytes
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the same call can succeed later without changing its inputs.
    ///
    /// Every ledger rejection is final for the given inputs; only a lost
    /// actor round-trip says nothing about the ledger itself.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Concurrency(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn test_insufficient_balance_message() {
        let err = Error::InsufficientBalance {
            account: Address::ZERO,
            balance: BigUint::from(5u32),
            requested: BigUint::from(6u32),
        };
        let msg = err.to_string();
        assert!(msg.contains("0x0000000000000000000000000000000000000000"));
        assert!(msg.contains("holds 5"));
        assert!(msg.contains("requested 6"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_concurrency_is_retryable() {
        assert!(Error::Concurrency("Actor mailbox closed".to_string()).is_retryable());
    }
}
