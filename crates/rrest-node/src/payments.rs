//! Payment lookup and submission against the ledger peer.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rrest_core::{
    parse_payment_from_tx, Address, ParseContext, Payment, RestPayment, Secret, SubmitRequest,
    TxHash, ValidationError,
};
use rrest_ledger::{LedgerPeer, PeerError, ServerInfo};

use crate::config::GatewayConfig;
use crate::error::ApiError;

/// Parameters used when building transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSettings {
    pub fee_drops: u64,
    pub last_ledger_offset: u32,
    /// Upper bound on each peer round-trip.
    pub timeout: Duration,
}

impl PaymentSettings {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            fee_drops: config.payments.fee_drops,
            last_ledger_offset: config.payments.last_ledger_offset,
            timeout: config.ledger_timeout(),
        }
    }
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self::from_config(&GatewayConfig::default())
    }
}

/// Validates payment requests and carries them to the ledger peer.
///
/// Every request is checked locally before the peer is contacted; a
/// rejected request never causes a round-trip.
pub struct PaymentService {
    peer: Arc<dyn LedgerPeer>,
    settings: PaymentSettings,
}

impl PaymentService {
    pub fn new(peer: Arc<dyn LedgerPeer>, settings: PaymentSettings) -> Self {
        Self { peer, settings }
    }

    pub fn peer_id(&self) -> &str {
        self.peer.peer_id()
    }

    /// Run one peer call under the configured timeout.
    async fn bounded<T, F>(&self, call: F) -> Result<T, PeerError>
    where
        F: Future<Output = Result<T, PeerError>>,
    {
        tokio::time::timeout(self.settings.timeout, call)
            .await
            .map_err(|_| PeerError::Timeout(self.settings.timeout))?
    }

    /// Look up one payment of `account` by transaction hash.
    pub async fn get_payment(
        &self,
        account: &str,
        identifier: &str,
    ) -> Result<RestPayment, ApiError> {
        let account = Address::parse_param(account, "account")?;
        let hash = TxHash::parse(identifier)?;

        let tx = self.bounded(self.peer.tx(&hash)).await?;
        if !tx.is_payment() {
            return Err(ApiError::NotAPayment);
        }

        // The close time lives on the ledger when the transaction lacks a date.
        let close_time = match (tx.date, tx.ledger()) {
            (None, Some(index)) => Some(self.bounded(self.peer.ledger(index)).await?.close_time),
            _ => None,
        };

        let ctx = ParseContext {
            account: Some(account),
            close_time,
        };
        let payment = parse_payment_from_tx(&tx, &ctx)?;
        tracing::info!(hash = %hash, state = %payment.state, "payment retrieved");
        Ok(payment)
    }

    /// Validate, sign-and-submit, and return the submitted payment.
    pub async fn submit_payment(
        &self,
        account: &str,
        request: SubmitRequest,
    ) -> Result<RestPayment, ApiError> {
        let account = Address::parse_param(account, "account")?;
        let payment_request = request
            .payment
            .ok_or_else(|| ValidationError::MissingParameter("payment".into()))?;
        let payment = Payment::from_request(&account, &payment_request)?;
        let secret = request
            .secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::MissingParameter("secret".into()))?;
        let secret = Secret::parse(&secret).map_err(|_| ApiError::InvalidSecret)?;

        let info = self.bounded(self.peer.account_info(&account)).await?;
        let last_ledger_sequence = info
            .ledger_current_index
            .map(|index| index.saturating_add(self.settings.last_ledger_offset));
        let tx_json = payment.to_tx_json(
            info.account_data.sequence,
            self.settings.fee_drops,
            last_ledger_sequence,
        )?;

        tracing::info!(
            account = %account,
            destination = %payment.destination_account,
            sequence = info.account_data.sequence,
            "submitting payment"
        );
        let result = self.bounded(self.peer.submit(tx_json, &secret)).await?;
        if !result.is_accepted() {
            tracing::warn!(
                account = %account,
                engine_result = %result.engine_result,
                "payment rejected"
            );
            return Err(ApiError::Rejected {
                engine_result: result.engine_result,
                message: result.engine_result_message,
            });
        }

        let mut submitted =
            parse_payment_from_tx(&result.tx_json, &ParseContext::for_account(account))?;
        submitted.result = result.engine_result;
        tracing::info!(
            hash = %submitted.hash,
            result = %submitted.result,
            "payment submitted"
        );
        Ok(submitted)
    }

    /// The peer's `server_info`.
    pub async fn server_status(&self) -> Result<ServerInfo, ApiError> {
        Ok(self.bounded(self.peer.server_info()).await?)
    }

    /// Whether the peer is reachable and has ledgers.
    pub async fn is_connected(&self) -> bool {
        match self.bounded(self.peer.server_info()).await {
            Ok(info) => info.is_connected(),
            Err(e) => {
                tracing::debug!(error = %e, "ledger peer not reachable");
                false
            }
        }
    }
}
