//! Inbound payment requests and the transaction they turn into.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};

use crate::address::Address;
use crate::amount::{parse_decimal, Amount};
use crate::error::{CoreError, ValidationError};
use crate::hash::TX_HASH_LEN;
use crate::ledger_tx::{TF_FULLY_CANONICAL_SIG, TF_NO_DIRECT_RIPPLE, TF_PARTIAL_PAYMENT};
use crate::memo::{normalize_memos, Memo, WireMemo};

/// Body of `POST /v1/accounts/{account}/payments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub payment: Option<PaymentRequest>,
    #[serde(default)]
    pub secret: Option<String>,
}

/// The `payment` object of a submit request, before validation.
///
/// Every field is kept as raw JSON so that a value of the wrong type is
/// reported against its own parameter by [`Payment::from_request`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub source_account: Option<Value>,
    #[serde(default)]
    pub source_tag: Option<Value>,
    #[serde(default)]
    pub source_amount: Option<Value>,
    #[serde(default)]
    pub source_slippage: Option<Value>,
    #[serde(default)]
    pub destination_account: Option<Value>,
    #[serde(default)]
    pub destination_tag: Option<Value>,
    #[serde(default)]
    pub destination_amount: Option<Value>,
    #[serde(default)]
    pub invoice_id: Option<Value>,
    #[serde(default)]
    pub paths: Option<Value>,
    #[serde(default)]
    pub partial_payment: Option<Value>,
    #[serde(default)]
    pub no_direct_ripple: Option<Value>,
    /// `None` only when the property is absent; an explicit `null` is kept.
    #[serde(default, deserialize_with = "present")]
    pub memos: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A fully validated payment, ready to be turned into a ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub source_account: Address,
    pub source_tag: Option<u32>,
    pub source_amount: Option<Amount>,
    pub source_slippage: Decimal,
    /// `source_amount` raised by `source_slippage`; absent for native-to-native.
    pub send_max: Option<Amount>,
    pub destination_account: Address,
    pub destination_tag: Option<u32>,
    pub destination_amount: Amount,
    pub invoice_id: Option<String>,
    pub paths: Option<Value>,
    pub partial_payment: bool,
    pub no_direct_ripple: bool,
    pub memos: Vec<Memo>,
}

impl Payment {
    /// Validate `request` as a payment sent from `account`.
    pub fn from_request(
        account: &Address,
        request: &PaymentRequest,
    ) -> Result<Self, ValidationError> {
        if let Some(source) = parse_address(request.source_account.as_ref(), "source_account")? {
            if &source != account {
                return Err(ValidationError::InvalidParameter {
                    param: "source_account".into(),
                    message: "Must match the account in the request path".into(),
                });
            }
        }

        let destination_account =
            parse_address(request.destination_account.as_ref(), "destination_account")?
                .ok_or_else(|| ValidationError::MissingParameter("destination_account".into()))?;

        let destination_amount = request
            .destination_amount
            .as_ref()
            .ok_or_else(|| ValidationError::MissingParameter("destination_amount".into()))?;
        let destination_amount = Amount::from_json(destination_amount, "destination_amount")?;

        let source_amount = match &request.source_amount {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(Amount::from_json(value, "source_amount")?),
        };
        let source_slippage = parse_slippage(request.source_slippage.as_ref())?;
        let send_max = match &source_amount {
            Some(source) if !(source.is_native() && destination_amount.is_native()) => Some(
                source.checked_plus(source_slippage).ok_or_else(|| {
                    invalid(
                        "source_slippage",
                        "Source amount plus slippage must be a representable amount",
                    )
                })?,
            ),
            _ => None,
        };

        Ok(Self {
            source_account: account.clone(),
            source_tag: parse_tag(request.source_tag.as_ref(), "source_tag")?,
            source_amount,
            source_slippage,
            send_max,
            destination_account,
            destination_tag: parse_tag(request.destination_tag.as_ref(), "destination_tag")?,
            destination_amount,
            invoice_id: parse_invoice_id(request.invoice_id.as_ref())?,
            paths: parse_paths(request.paths.as_ref())?,
            partial_payment: parse_flag(request.partial_payment.as_ref(), "partial_payment")?,
            no_direct_ripple: parse_flag(request.no_direct_ripple.as_ref(), "no_direct_ripple")?,
            memos: normalize_memos(request.memos.as_ref())?,
        })
    }

    pub fn flags(&self) -> u32 {
        let mut flags = TF_FULLY_CANONICAL_SIG;
        if self.partial_payment {
            flags |= TF_PARTIAL_PAYMENT;
        }
        if self.no_direct_ripple {
            flags |= TF_NO_DIRECT_RIPPLE;
        }
        flags
    }

    /// Upper bound on what the source spends, if the payment sets one.
    ///
    /// Native-to-native payments never carry `SendMax`.
    pub fn send_max(&self) -> Option<&Amount> {
        self.send_max.as_ref()
    }

    /// The unsigned `Payment` transaction.
    pub fn to_tx_json(
        &self,
        sequence: u32,
        fee_drops: u64,
        last_ledger_sequence: Option<u32>,
    ) -> Result<Value, CoreError> {
        let mut tx = Map::new();
        tx.insert("TransactionType".into(), json!("Payment"));
        tx.insert("Account".into(), json!(self.source_account.as_str()));
        tx.insert("Destination".into(), json!(self.destination_account.as_str()));
        tx.insert("Amount".into(), self.destination_amount.to_wire()?);
        tx.insert("Fee".into(), json!(fee_drops.to_string()));
        tx.insert("Flags".into(), json!(self.flags()));
        tx.insert("Sequence".into(), json!(sequence));

        if let Some(send_max) = self.send_max() {
            tx.insert("SendMax".into(), send_max.to_wire()?);
        }
        if let Some(tag) = self.source_tag {
            tx.insert("SourceTag".into(), json!(tag));
        }
        if let Some(tag) = self.destination_tag {
            tx.insert("DestinationTag".into(), json!(tag));
        }
        if let Some(invoice_id) = &self.invoice_id {
            tx.insert("InvoiceID".into(), json!(invoice_id));
        }
        if let Some(paths) = &self.paths {
            tx.insert("Paths".into(), paths.clone());
        }
        if !self.memos.is_empty() {
            let memos: Vec<WireMemo> = self.memos.iter().map(Memo::to_wire).collect();
            tx.insert("Memos".into(), json!(memos));
        }
        if let Some(last) = last_ledger_sequence {
            tx.insert("LastLedgerSequence".into(), json!(last));
        }
        Ok(Value::Object(tx))
    }
}

fn invalid(param: &str, message: &str) -> ValidationError {
    ValidationError::InvalidParameter {
        param: param.to_string(),
        message: message.to_string(),
    }
}

/// Addresses must be strings; absent, `null` and `""` mean not given.
fn parse_address(input: Option<&Value>, param: &str) -> Result<Option<Address>, ValidationError> {
    match input {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Address::parse_param(s, param).map(Some),
        Some(_) => Err(ValidationError::InvalidAddress {
            param: param.to_string(),
        }),
    }
}

fn parse_flag(input: Option<&Value>, param: &str) -> Result<bool, ValidationError> {
    match input {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(invalid(param, "Must be a boolean")),
    }
}

/// Tags arrive as numbers or numeric strings; `""` means no tag.
fn parse_tag(input: Option<&Value>, param: &str) -> Result<Option<u32>, ValidationError> {
    let tag = match input {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::String(s)) => s.parse::<u32>().ok(),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(_) => None,
    };
    tag.map(Some)
        .ok_or_else(|| invalid(param, "Must be an integer between 0 and 4294967295"))
}

fn parse_slippage(input: Option<&Value>) -> Result<Decimal, ValidationError> {
    let slippage = match input {
        None | Some(Value::Null) => return Ok(Decimal::ZERO),
        Some(Value::String(s)) if s.is_empty() => return Ok(Decimal::ZERO),
        Some(Value::String(s)) => parse_decimal(s),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(_) => None,
    };
    slippage
        .filter(|d| !d.is_sign_negative() || d.is_zero())
        .ok_or_else(|| invalid("source_slippage", "Must be a non-negative decimal number"))
}

fn parse_invoice_id(input: Option<&Value>) -> Result<Option<String>, ValidationError> {
    let id = match input {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(id)) if id.is_empty() => return Ok(None),
        Some(Value::String(id)) => id,
        Some(_) => return Err(invalid("invoice_id", "Must be a 256-bit hash in hex")),
    };
    if id.len() == TX_HASH_LEN && id.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(Some(id.to_ascii_uppercase()))
    } else {
        Err(invalid("invoice_id", "Must be a 256-bit hash in hex"))
    }
}

/// Paths come as a JSON array or as its serialized text; `"[]"` means none.
fn parse_paths(input: Option<&Value>) -> Result<Option<Value>, ValidationError> {
    let paths = match input {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::String(s)) => serde_json::from_str::<Value>(s).ok(),
        Some(other) => Some(other.clone()),
    };
    match paths {
        Some(Value::Array(items)) if items.is_empty() => Ok(None),
        Some(Value::Array(items)) if items.iter().all(Value::is_array) => {
            Ok(Some(Value::Array(items)))
        }
        _ => Err(invalid("paths", "Must be a JSON array of paths")),
    }
}
