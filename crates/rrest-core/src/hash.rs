use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;

/// Length of a transaction hash in hex characters.
pub const TX_HASH_LEN: usize = 64;

/// A well-formed transaction hash, upper-case hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TxHash(String);

impl TxHash {
    /// Validate a payment identifier. Anything but 64 hex characters is
    /// rejected without a ledger round-trip.
    pub fn parse(identifier: &str) -> Result<Self, ValidationError> {
        if identifier.len() == TX_HASH_LEN && identifier.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(identifier.to_ascii_uppercase()))
        } else {
            Err(ValidationError::InvalidTransactionHash)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
