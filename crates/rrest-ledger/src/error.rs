use std::time::Duration;

/// Ledger-peer errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeerError {
    /// The peer answered with `status: "error"`.
    #[error("peer returned {code}: {message}")]
    Remote { code: String, message: String },

    #[error("cannot connect to ledger peer: {0}")]
    Connection(String),

    #[error("no reply from ledger peer within {0:?}")]
    Timeout(Duration),

    /// The reply could not be understood.
    #[error("invalid response from ledger peer: {0}")]
    Protocol(String),
}

impl PeerError {
    /// The peer's error code, for remote errors.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => Some(code),
            _ => None,
        }
    }
}
