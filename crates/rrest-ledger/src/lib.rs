//! rrest ledger layer
//!
//! The [`LedgerPeer`] interface the gateway talks to, the request/response
//! shapes of the ledger's RPC protocol, and two adapters: a JSON-RPC client
//! for a real peer and a scripted in-memory peer for tests.

pub mod error;
pub mod types;
pub mod protocol;
pub mod traits;
pub mod adapters;

pub use adapters::{JsonRpcPeer, RecordedRequest, ScriptedPeer};
pub use error::PeerError;
pub use traits::LedgerPeer;
pub use types::{AccountInfo, LedgerHeader, RequestKind, ServerInfo, SubmitResult};
