//! Ledger account addresses and signing secrets.
//!
//! Both are base58check strings in the ledger's own alphabet: a version byte,
//! a payload, and a four-byte double-SHA-256 checksum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

use crate::error::ValidationError;

/// Version byte of an encoded account id.
pub const ACCOUNT_ID_VERSION: u8 = 0x00;
/// Version byte of an encoded family seed.
pub const FAMILY_SEED_VERSION: u8 = 0x21;

const ACCOUNT_ID_LEN: usize = 20;
const SEED_LEN: usize = 16;

/// Decode a base58check string and return its payload (without the version
/// byte) if the version and payload length match.
fn decode_versioned(s: &str, version: u8, payload_len: usize) -> Option<Vec<u8>> {
    let decoded = bs58::decode(s)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check(Some(version))
        .into_vec()
        .ok()?;
    match decoded.split_first() {
        Some((&v, payload)) if v == version && payload.len() == payload_len => {
            Some(payload.to_vec())
        }
        _ => None,
    }
}

/// Returns `true` if `s` is a well-formed account address.
pub fn is_valid_address(s: &str) -> bool {
    s.starts_with('r')
        && (25..=35).contains(&s.len())
        && decode_versioned(s, ACCOUNT_ID_VERSION, ACCOUNT_ID_LEN).is_some()
}

/// The string is not a valid account address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid account address")]
pub struct InvalidAddress;

/// A validated ledger account address (e.g. `rGUpotx8YYDiocqS577N4T1p1kHBNdEJ9s`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Validate `value` as the request parameter named `param`.
    pub fn parse_param(value: &str, param: &str) -> Result<Self, ValidationError> {
        value.parse().map_err(|_| ValidationError::InvalidAddress {
            param: param.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_address(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidAddress)
        }
    }
}

impl TryFrom<String> for Address {
    type Error = InvalidAddress;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_address(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidAddress)
        }
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The secret is not a well-formed family seed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("secret is not a valid family seed")]
pub struct InvalidSecret;

/// A signing secret (family seed), handed to the ledger peer for signing.
///
/// The buffer is wiped on drop and never printed.
#[derive(Clone)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    /// Check that `s` decodes as a family seed.
    pub fn parse(s: &str) -> Result<Self, InvalidSecret> {
        if s.starts_with('s') && decode_versioned(s, FAMILY_SEED_VERSION, SEED_LEN).is_some() {
            Ok(Self(Zeroizing::new(s.to_string())))
        } else {
            Err(InvalidSecret)
        }
    }

    /// The encoded seed, for the sign-and-submit request only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}
