pub mod payment;
pub mod status;

use rrest_core::ErrorEnvelope;
use serde::de::DeserializeOwned;

/// Default API endpoint of the gateway.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5990";

/// Decode a gateway reply, turning an error envelope into an error.
pub async fn read_reply<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
    let status = resp.status();
    let body = resp.bytes().await?;
    if status.is_success() {
        return Ok(serde_json::from_slice(&body)?);
    }
    match serde_json::from_slice::<ErrorEnvelope>(&body) {
        Ok(err) => anyhow::bail!("{}", describe_error(status.as_u16(), &err)),
        Err(_) => anyhow::bail!("request failed (HTTP {})", status),
    }
}

fn describe_error(status: u16, err: &ErrorEnvelope) -> String {
    match &err.message {
        Some(message) => format!("HTTP {status}: {}: {message}", err.error),
        None => format!("HTTP {status}: {}", err.error),
    }
}
