//! Ledger transaction -> REST payment.
//!
//! [`parse_payment_from_tx`] is a pure function: the caller fetches whatever
//! extra ledger context it needs (the perspective account, a ledger close
//! time) and passes it in through [`ParseContext`].

use chrono::{DateTime, SecondsFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::address::Address;
use crate::amount::{
    drops_to_xrp, format_decimal, parse_decimal, RestAmount, WireAmount, DROPS_PER_XRP,
};
use crate::error::CoreError;
use crate::ledger_tx::{
    AffectedNode, LedgerTransaction, TransactionMeta, LEDGER_EPOCH_OFFSET, TES_SUCCESS,
    TF_NO_DIRECT_RIPPLE, TF_PARTIAL_PAYMENT,
};
use crate::memo::Memo;

/// Caller-supplied context for parsing a transaction.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    /// Account the payment is viewed from; decides `direction`.
    pub account: Option<Address>,
    /// Close time of the containing ledger, used when the transaction has no `date`.
    pub close_time: Option<u32>,
}

impl ParseContext {
    pub fn for_account(account: Address) -> Self {
        Self {
            account: Some(account),
            close_time: None,
        }
    }
}

/// The normalized REST representation of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestPayment {
    pub source_account: String,
    pub source_tag: String,
    pub source_amount: RestAmount,
    pub source_slippage: String,
    pub destination_account: String,
    pub destination_tag: String,
    pub destination_amount: RestAmount,
    pub invoice_id: String,
    pub paths: String,
    pub no_direct_ripple: bool,
    pub partial_payment: bool,
    pub direction: String,
    pub state: String,
    pub result: String,
    pub ledger: String,
    pub hash: String,
    pub timestamp: String,
    pub fee: String,
    pub source_balance_changes: Vec<RestAmount>,
    pub destination_balance_changes: Vec<RestAmount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memos: Option<Vec<Memo>>,
}

/// Convert a `Payment` transaction into its REST shape.
pub fn parse_payment_from_tx(
    tx: &LedgerTransaction,
    ctx: &ParseContext,
) -> Result<RestPayment, CoreError> {
    if !tx.is_payment() {
        return Err(CoreError::NotAPayment(tx.transaction_type.clone()));
    }
    let destination = tx
        .destination
        .clone()
        .ok_or_else(|| CoreError::MalformedTransaction("payment without Destination".into()))?;
    let amount = tx
        .amount
        .as_ref()
        .ok_or_else(|| CoreError::MalformedTransaction("payment without Amount".into()))?;

    let partial_payment = tx.has_flag(TF_PARTIAL_PAYMENT);
    let destination_amount = match tx.meta.as_ref().and_then(TransactionMeta::delivered) {
        Some(delivered) if partial_payment => delivered.to_rest()?,
        _ => amount.to_rest()?,
    };
    let source_amount = tx.send_max.as_ref().unwrap_or(amount).to_rest()?;

    let direction = match &ctx.account {
        None => "",
        Some(a) if a.as_str() == tx.account => "outgoing",
        Some(a) if a.as_str() == destination => "incoming",
        Some(_) => "passthrough",
    };

    // Only a validated ledger makes the result final.
    let validated = tx.validated == Some(true);
    let (state, result) = match &tx.meta {
        Some(meta) if !validated => ("pending", meta.transaction_result.clone()),
        Some(meta) if meta.transaction_result == TES_SUCCESS => {
            ("validated", meta.transaction_result.clone())
        }
        Some(meta) => ("failed", meta.transaction_result.clone()),
        None => ("pending", String::new()),
    };

    let timestamp = match tx.date.or(ctx.close_time) {
        Some(date) => ledger_time_to_iso(date)?,
        None => String::new(),
    };

    let fee = match &tx.fee {
        Some(drops) => drops_to_xrp(drops)?,
        None => String::new(),
    };

    let paths = match &tx.paths {
        Some(paths) => paths.to_string(),
        None => "[]".to_string(),
    };

    let (source_balance_changes, destination_balance_changes) = match &tx.meta {
        Some(meta) => (
            balance_changes(meta, &tx.account),
            balance_changes(meta, &destination),
        ),
        None => (Vec::new(), Vec::new()),
    };

    let memos = tx
        .memos
        .as_ref()
        .map(|memos| memos.iter().map(Memo::from_wire).collect());

    tracing::debug!(
        hash = tx.hash.as_deref().unwrap_or_default(),
        direction,
        state,
        "parsed payment"
    );

    Ok(RestPayment {
        source_account: tx.account.clone(),
        source_tag: tx.source_tag.map(|t| t.to_string()).unwrap_or_default(),
        source_amount,
        source_slippage: "0".to_string(),
        destination_account: destination,
        destination_tag: tx.destination_tag.map(|t| t.to_string()).unwrap_or_default(),
        destination_amount,
        invoice_id: tx.invoice_id.clone().unwrap_or_default(),
        paths,
        no_direct_ripple: tx.has_flag(TF_NO_DIRECT_RIPPLE),
        partial_payment,
        direction: direction.to_string(),
        state: state.to_string(),
        result,
        ledger: tx.ledger().map(|l| l.to_string()).unwrap_or_default(),
        hash: tx.hash.clone().unwrap_or_default(),
        timestamp,
        fee,
        source_balance_changes,
        destination_balance_changes,
        memos,
    })
}

/// Ledger-epoch seconds to `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn ledger_time_to_iso(ledger_seconds: u32) -> Result<String, CoreError> {
    let unix = i64::from(ledger_seconds) + LEDGER_EPOCH_OFFSET;
    DateTime::from_timestamp(unix, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| {
            CoreError::MalformedTransaction(format!("date out of range: {ledger_seconds}"))
        })
}

/// Balance deltas of `account` recorded in the transaction metadata, in
/// `AffectedNodes` order. Zero deltas are skipped, as are balances that do
/// not fit a 96-bit decimal.
pub fn balance_changes(meta: &TransactionMeta, account: &str) -> Vec<RestAmount> {
    let mut changes = Vec::new();
    for affected in &meta.affected_nodes {
        let node = affected.node();
        let Some(current) = node.current() else {
            continue;
        };
        // Created entries start from zero; others without previous fields did not move.
        let previous = match affected {
            AffectedNode::CreatedNode(_) => None,
            _ => match node.previous_fields.as_ref() {
                Some(fields) => Some(fields),
                None => continue,
            },
        };
        let change = match node.ledger_entry_type.as_str() {
            "AccountRoot" => account_root_change(current, previous, account),
            "RippleState" => trust_line_change(current, previous, account),
            _ => None,
        };
        if let Some(change) = change {
            changes.push(change);
        }
    }
    changes
}

fn account_root_change(
    current: &Map<String, Value>,
    previous: Option<&Map<String, Value>>,
    account: &str,
) -> Option<RestAmount> {
    if current.get("Account").and_then(Value::as_str) != Some(account) {
        return None;
    }
    let final_drops = current.get("Balance").and_then(Value::as_str)?;
    let previous_drops = match previous {
        Some(prev) => prev.get("Balance").and_then(Value::as_str)?,
        None => "0",
    };
    let delta = balance_delta(final_drops, previous_drops)?;
    if delta.is_zero() {
        return None;
    }
    Some(RestAmount::native(format_decimal(
        delta / Decimal::from(DROPS_PER_XRP),
    )))
}

fn trust_line_change(
    current: &Map<String, Value>,
    previous: Option<&Map<String, Value>>,
    account: &str,
) -> Option<RestAmount> {
    let limit_issuer = |field: &str| {
        current
            .get(field)
            .and_then(|l| l.get("issuer"))
            .and_then(Value::as_str)
    };
    let (low, high) = (limit_issuer("LowLimit")?, limit_issuer("HighLimit")?);
    let (counterparty, sign) = if low == account {
        (high, Decimal::ONE)
    } else if high == account {
        (low, Decimal::NEGATIVE_ONE)
    } else {
        return None;
    };

    let balance = current
        .get("Balance")
        .and_then(|b| serde_json::from_value::<WireAmount>(b.clone()).ok())?;
    let WireAmount::Issued {
        currency,
        value: final_value,
        ..
    } = balance
    else {
        return None;
    };

    let previous_value = match previous {
        Some(prev) => prev
            .get("Balance")
            .and_then(|b| b.get("value"))
            .and_then(Value::as_str)?,
        None => "0",
    };

    let delta = balance_delta(&final_value, previous_value)?.checked_mul(sign)?;
    if delta.is_zero() {
        return None;
    }
    Some(RestAmount {
        value: format_decimal(delta),
        currency,
        issuer: counterparty.to_string(),
    })
}

/// `final - previous`, or `None` when either side or the difference is out
/// of decimal range.
fn balance_delta(final_text: &str, previous_text: &str) -> Option<Decimal> {
    let delta = parse_decimal(final_text)
        .zip(parse_decimal(previous_text))
        .and_then(|(final_value, previous_value)| final_value.checked_sub(previous_value));
    if delta.is_none() {
        tracing::debug!(
            final_balance = final_text,
            previous_balance = previous_text,
            "skipping unrepresentable balance change"
        );
    }
    delta
}
