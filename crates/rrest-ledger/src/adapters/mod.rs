pub mod jsonrpc;
pub mod scripted;

pub use jsonrpc::JsonRpcPeer;
pub use scripted::{RecordedRequest, ScriptedPeer};
