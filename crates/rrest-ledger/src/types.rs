use rrest_core::LedgerTransaction;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The request kinds the gateway sends to a ledger peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Tx,
    AccountInfo,
    Submit,
    Ledger,
    ServerInfo,
}

impl RequestKind {
    /// RPC method name.
    pub fn command(&self) -> &'static str {
        match self {
            Self::Tx => "tx",
            Self::AccountInfo => "account_info",
            Self::Submit => "submit",
            Self::Ledger => "ledger",
            Self::ServerInfo => "server_info",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command())
    }
}

/// Account root fields read from an `account_info` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountData {
    pub account: String,
    pub balance: String,
    pub sequence: u32,
}

/// `account_info` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_data: AccountData,
    /// Index of the open ledger, present when queried against it.
    #[serde(default)]
    pub ledger_current_index: Option<u32>,
    #[serde(default)]
    pub validated: bool,
}

/// `submit` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub engine_result: String,
    #[serde(default)]
    pub engine_result_code: i32,
    #[serde(default)]
    pub engine_result_message: String,
    #[serde(default)]
    pub tx_blob: Option<String>,
    /// The transaction as signed by the peer.
    pub tx_json: LedgerTransaction,
}

impl SubmitResult {
    /// Applied, or queued for a later ledger.
    pub fn is_accepted(&self) -> bool {
        matches!(self.engine_result.as_str(), "tesSUCCESS" | "terQUEUED")
    }
}

/// Header fields of a `ledger` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerHeader {
    /// Peers send the index as a number or as a decimal string.
    #[serde(deserialize_with = "u32_or_string")]
    pub ledger_index: u32,
    /// Seconds since the ledger epoch.
    pub close_time: u32,
    #[serde(default)]
    pub ledger_hash: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

/// `ledger` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerResult {
    pub ledger: LedgerHeader,
}

/// `server_info` result; `info` is passed through to clients untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub info: Value,
}

impl ServerInfo {
    pub fn server_state(&self) -> Option<&str> {
        self.info.get("server_state").and_then(Value::as_str)
    }

    /// Whether the peer reports itself usable for submitting transactions.
    pub fn is_connected(&self) -> bool {
        match self.server_state() {
            Some("full" | "validating" | "proposing") => true,
            Some("connected" | "syncing" | "tracking") => self.has_ledgers(),
            _ => false,
        }
    }

    fn has_ledgers(&self) -> bool {
        self.info
            .get("complete_ledgers")
            .and_then(Value::as_str)
            .is_some_and(|l| !l.is_empty() && l != "empty")
    }
}

fn u32_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Index {
        Number(u32),
        Text(String),
    }

    match Index::deserialize(deserializer)? {
        Index::Number(n) => Ok(n),
        Index::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
