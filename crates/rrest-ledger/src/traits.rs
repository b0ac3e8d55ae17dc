use async_trait::async_trait;
use rrest_core::{Address, LedgerTransaction, Secret, TxHash};
use serde_json::Value;

use crate::error::PeerError;
use crate::protocol;
use crate::types::{AccountInfo, LedgerHeader, LedgerResult, RequestKind, ServerInfo, SubmitResult};

/// Ledger peer interface.
///
/// Each implementation carries requests to a ledger peer over some
/// transport. Adapters only implement [`LedgerPeer::request`]; the typed
/// per-kind methods build the parameters and decode the result the same way
/// for every adapter.
#[async_trait]
pub trait LedgerPeer: Send + Sync {
    /// Send one request and return the peer's result object. Error results
    /// are already turned into [`PeerError::Remote`].
    async fn request(&self, kind: RequestKind, params: Value) -> Result<Value, PeerError>;

    /// Where this peer lives (a URL, or a fixed name for in-memory peers).
    fn peer_id(&self) -> &str;

    /// Look up a transaction by hash.
    async fn tx(&self, hash: &TxHash) -> Result<LedgerTransaction, PeerError> {
        let result = self.request(RequestKind::Tx, protocol::tx_params(hash)).await?;
        protocol::decode(RequestKind::Tx, result)
    }

    /// Account root and open-ledger index for `account`.
    async fn account_info(&self, account: &Address) -> Result<AccountInfo, PeerError> {
        let params = protocol::account_info_params(account);
        let result = self.request(RequestKind::AccountInfo, params).await?;
        protocol::decode(RequestKind::AccountInfo, result)
    }

    /// Sign `tx_json` with `secret` and submit it.
    async fn submit(&self, tx_json: Value, secret: &Secret) -> Result<SubmitResult, PeerError> {
        let params = protocol::submit_params(tx_json, secret);
        let result = self.request(RequestKind::Submit, params).await?;
        protocol::decode(RequestKind::Submit, result)
    }

    /// Header of the ledger with the given index.
    async fn ledger(&self, ledger_index: u32) -> Result<LedgerHeader, PeerError> {
        let params = protocol::ledger_params(ledger_index);
        let result = self.request(RequestKind::Ledger, params).await?;
        protocol::decode::<LedgerResult>(RequestKind::Ledger, result).map(|r| r.ledger)
    }

    async fn server_info(&self) -> Result<ServerInfo, PeerError> {
        let params = protocol::server_info_params();
        let result = self.request(RequestKind::ServerInfo, params).await?;
        protocol::decode(RequestKind::ServerInfo, result)
    }
}
