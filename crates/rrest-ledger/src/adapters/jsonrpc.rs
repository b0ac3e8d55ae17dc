use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::PeerError;
use crate::protocol;
use crate::traits::LedgerPeer;
use crate::types::RequestKind;

/// Ledger peer reached over JSON-RPC on HTTP.
///
/// One pooled `reqwest::Client` is shared by every request; the client
/// timeout bounds each round-trip.
pub struct JsonRpcPeer {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
    next_id: AtomicU64,
}

impl JsonRpcPeer {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PeerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PeerError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_send_error(&self, err: reqwest::Error) -> PeerError {
        if err.is_timeout() {
            PeerError::Timeout(self.timeout)
        } else {
            PeerError::Connection(err.to_string())
        }
    }
}

#[async_trait]
impl LedgerPeer for JsonRpcPeer {
    async fn request(&self, kind: RequestKind, params: Value) -> Result<Value, PeerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = protocol::request_body(kind, params, id);
        tracing::debug!(%kind, id, url = %self.url, "ledger request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PeerError::Protocol(format!("{kind}: HTTP {status}")));
        }

        let reply: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                PeerError::Timeout(self.timeout)
            } else {
                PeerError::Protocol(format!("{kind}: {e}"))
            }
        })?;
        protocol::decode_response(kind, reply)
    }

    fn peer_id(&self) -> &str {
        &self.url
    }
}
