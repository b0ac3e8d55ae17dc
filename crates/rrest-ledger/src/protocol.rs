//! Request parameters and result decoding shared by every adapter.
//!
//! A peer reply is `{"result": {...}}`; a result with `status: "error"`
//! carries `error` (the code) and usually `error_message`.

use rrest_core::{Address, Secret, TxHash};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::PeerError;
use crate::types::RequestKind;

/// JSON-RPC request body.
pub fn request_body(kind: RequestKind, params: Value, id: u64) -> Value {
    json!({
        "method": kind.command(),
        "params": [params],
        "id": id,
    })
}

pub fn tx_params(hash: &TxHash) -> Value {
    json!({"transaction": hash.as_str(), "binary": false})
}

pub fn account_info_params(account: &Address) -> Value {
    json!({"account": account.as_str(), "ledger_index": "current", "strict": true})
}

/// Sign-and-submit: the peer signs `tx_json` with `secret`.
pub fn submit_params(tx_json: Value, secret: &Secret) -> Value {
    json!({"tx_json": tx_json, "secret": secret.expose()})
}

pub fn ledger_params(ledger_index: u32) -> Value {
    json!({"ledger_index": ledger_index, "transactions": false, "expand": false})
}

pub fn server_info_params() -> Value {
    json!({})
}

/// Unwrap a full JSON-RPC reply into its result object.
pub fn decode_response(kind: RequestKind, response: Value) -> Result<Value, PeerError> {
    match response {
        Value::Object(mut fields) => match fields.remove("result") {
            Some(result) => check_result(kind, result),
            None => Err(PeerError::Protocol(format!("{kind}: reply has no result"))),
        },
        _ => Err(PeerError::Protocol(format!("{kind}: reply is not an object"))),
    }
}

/// Turn an error result into [`PeerError::Remote`].
pub fn check_result(kind: RequestKind, result: Value) -> Result<Value, PeerError> {
    if !result.is_object() {
        return Err(PeerError::Protocol(format!("{kind}: result is not an object")));
    }
    if result.get("status").and_then(Value::as_str) != Some("error") {
        return Ok(result);
    }

    let code = result
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let message = ["error_message", "error_exception"]
        .iter()
        .find_map(|k| result.get(*k).and_then(Value::as_str))
        .unwrap_or(&code)
        .to_string();
    Err(PeerError::Remote { code, message })
}

/// Deserialize a result object into its typed form.
pub fn decode<T: DeserializeOwned>(kind: RequestKind, result: Value) -> Result<T, PeerError> {
    serde_json::from_value(result).map_err(|e| PeerError::Protocol(format!("{kind}: {e}")))
}
