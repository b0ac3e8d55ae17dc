//! Shared gateway state for HTTP handlers.

use std::sync::Arc;

use rrest_ledger::LedgerPeer;

use crate::payments::{PaymentService, PaymentSettings};

/// Shared state for the running gateway, accessible from HTTP handlers.
pub struct AppState {
    /// Payment lookup and submission.
    pub payments: PaymentService,
}

impl AppState {
    pub fn new(peer: Arc<dyn LedgerPeer>, settings: PaymentSettings) -> Self {
        Self {
            payments: PaymentService::new(peer, settings),
        }
    }

    /// Where the ledger peer lives, as reported by `/v1/server`.
    pub fn peer_url(&self) -> &str {
        self.payments.peer_id()
    }
}
