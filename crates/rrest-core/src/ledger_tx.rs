//! Ledger transactions as the ledger peer returns them (`tx` results and the
//! `tx_json` of `submit` results).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::amount::WireAmount;
use crate::memo::WireMemo;

/// Payment flag: do not use the default path.
pub const TF_NO_DIRECT_RIPPLE: u32 = 0x0001_0000;
/// Payment flag: the delivered amount may be less than `Amount`.
pub const TF_PARTIAL_PAYMENT: u32 = 0x0002_0000;
/// Require a fully-canonical signature.
pub const TF_FULLY_CANONICAL_SIG: u32 = 0x8000_0000;

/// Seconds between the Unix epoch and the ledger epoch (2000-01-01T00:00:00Z).
pub const LEDGER_EPOCH_OFFSET: i64 = 946_684_800;

/// Result code of a transaction that applied successfully.
pub const TES_SUCCESS: &str = "tesSUCCESS";

/// A ledger transaction. Only the fields the gateway reads are typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LedgerTransaction {
    pub transaction_type: String,
    pub account: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub amount: Option<WireAmount>,
    #[serde(default)]
    pub send_max: Option<WireAmount>,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub sequence: Option<u32>,
    #[serde(default)]
    pub source_tag: Option<u32>,
    #[serde(default)]
    pub destination_tag: Option<u32>,
    #[serde(rename = "InvoiceID", default)]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub paths: Option<Value>,
    #[serde(default)]
    pub memos: Option<Vec<WireMemo>>,
    #[serde(default)]
    pub last_ledger_sequence: Option<u32>,

    #[serde(rename = "hash", default)]
    pub hash: Option<String>,
    #[serde(rename = "ledger_index", default)]
    pub ledger_index: Option<u32>,
    /// Older peers report the containing ledger as `inLedger`.
    #[serde(rename = "inLedger", default)]
    pub in_ledger: Option<u32>,
    /// Close time of the containing ledger, in seconds since the ledger epoch.
    #[serde(rename = "date", default)]
    pub date: Option<u32>,
    #[serde(rename = "validated", default)]
    pub validated: Option<bool>,
    #[serde(rename = "meta", default)]
    pub meta: Option<TransactionMeta>,
}

impl LedgerTransaction {
    pub fn is_payment(&self) -> bool {
        self.transaction_type == "Payment"
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    /// Index of the ledger that contains the transaction, if any.
    pub fn ledger(&self) -> Option<u32> {
        self.ledger_index.or(self.in_ledger)
    }
}

/// Metadata attached to an applied transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionMeta {
    pub transaction_result: String,
    #[serde(default)]
    pub transaction_index: Option<u32>,
    #[serde(default)]
    pub affected_nodes: Vec<AffectedNode>,
    #[serde(default)]
    pub delivered_amount: Option<WireAmount>,
    /// Synthetic field some peers add alongside `DeliveredAmount`.
    #[serde(rename = "delivered_amount", default)]
    pub delivered_amount_synthetic: Option<WireAmount>,
}

impl TransactionMeta {
    pub fn delivered(&self) -> Option<&WireAmount> {
        self.delivered_amount
            .as_ref()
            .or(self.delivered_amount_synthetic.as_ref())
    }
}

/// One ledger entry touched by a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AffectedNode {
    CreatedNode(LedgerNode),
    ModifiedNode(LedgerNode),
    DeletedNode(LedgerNode),
}

impl AffectedNode {
    pub fn node(&self) -> &LedgerNode {
        match self {
            Self::CreatedNode(n) | Self::ModifiedNode(n) | Self::DeletedNode(n) => n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LedgerNode {
    pub ledger_entry_type: String,
    #[serde(default)]
    pub ledger_index: Option<String>,
    #[serde(default)]
    pub final_fields: Option<Map<String, Value>>,
    #[serde(default)]
    pub previous_fields: Option<Map<String, Value>>,
    #[serde(default)]
    pub new_fields: Option<Map<String, Value>>,
}

impl LedgerNode {
    /// Current state of the entry: final fields, or new fields for a created entry.
    pub fn current(&self) -> Option<&Map<String, Value>> {
        self.final_fields.as_ref().or(self.new_fields.as_ref())
    }
}
