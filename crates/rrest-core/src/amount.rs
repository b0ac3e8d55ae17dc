//! Currencies, amounts, and the native-unit (drops) conversions.
//!
//! Three shapes of amount appear at the gateway:
//! - the REST request form, a `value+currency+issuer` string or a
//!   `{value, currency, issuer}` object ([`Amount::parse_str`],
//!   [`Amount::from_json`]);
//! - the ledger wire form, a drops string for the native currency or an
//!   issued-currency object ([`WireAmount`]);
//! - the REST response form, always an object with `issuer: ""` for the
//!   native currency ([`RestAmount`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::address::Address;
use crate::error::{AmountDefect, CoreError, ValidationError};

/// Code of the ledger's native currency.
pub const NATIVE_CURRENCY: &str = "XRP";
/// Drops in one unit of the native currency.
pub const DROPS_PER_XRP: u64 = 1_000_000;
/// Native amounts cannot be finer than one drop.
pub const MAX_NATIVE_DECIMALS: u32 = 6;
/// Total supply of the native currency, in whole units.
pub const MAX_NATIVE_VALUE: u64 = 100_000_000_000;

const CURRENCY_SYMBOLS: &str = "?!@#$%^&*<>(){}[]|";

/// A ledger currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    pub fn native() -> Self {
        Self(NATIVE_CURRENCY.to_string())
    }

    /// Accepts `XRP`, a three-character code, or a 40-character hex code.
    pub fn parse(code: &str) -> Option<Self> {
        let standard = code.len() == 3
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || CURRENCY_SYMBOLS.contains(c));
        let hex_code = code.len() == 40
            && code.chars().all(|c| c.is_ascii_hexdigit())
            && code.chars().any(|c| c != '0');
        if standard || hex_code {
            Some(Self(code.to_string()))
        } else {
            None
        }
    }

    pub fn is_native(&self) -> bool {
        self.0 == NATIVE_CURRENCY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a decimal string as the ledger writes it: plain or scientific
/// notation, no separators or whitespace.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty()
        || !s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Canonical text of a decimal: no trailing zeros, no exponent.
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Convert a drops string (`"1000012"`) to native units (`"1.000012"`).
pub fn drops_to_xrp(drops: &str) -> Result<String, CoreError> {
    let value = parse_decimal(drops)
        .filter(|d| d.fract().is_zero())
        .ok_or_else(|| CoreError::InvalidLedgerAmount(format!("bad drops value {drops:?}")))?;
    Ok(format_decimal(value / Decimal::from(DROPS_PER_XRP)))
}

/// Convert native units to a drops string; `None` if the value is finer than
/// one drop or out of range.
pub fn xrp_to_drops(value: Decimal) -> Option<String> {
    let drops = value.checked_mul(Decimal::from(DROPS_PER_XRP))?;
    if !drops.fract().is_zero() {
        return None;
    }
    Some(format_decimal(drops.trunc()))
}

/// A validated amount from a payment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    pub value: Decimal,
    pub currency: Currency,
    /// Present iff the currency is not native.
    pub issuer: Option<Address>,
}

impl Amount {
    /// Amount in the native currency.
    pub fn native(value: Decimal) -> Self {
        Self {
            value,
            currency: Currency::native(),
            issuer: None,
        }
    }

    pub fn is_native(&self) -> bool {
        self.currency.is_native()
    }

    /// Parse the `value+currency+issuer` form. A bare value is native.
    pub fn parse_str(s: &str, param: &str) -> Result<Self, ValidationError> {
        let parts: Vec<&str> = s.split('+').collect();
        if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(ValidationError::amount(param, AmountDefect::Malformed));
        }
        // In the string form a bad value is a shape error.
        let value = parse_decimal(parts[0])
            .ok_or_else(|| ValidationError::amount(param, AmountDefect::Malformed))?;
        let currency = parts.get(1).copied().unwrap_or(NATIVE_CURRENCY);
        Self::checked(value, currency, parts.get(2).copied(), param)
    }

    /// Parse either the string form or a `{value, currency, issuer}` object.
    pub fn from_json(input: &Value, param: &str) -> Result<Self, ValidationError> {
        match input {
            Value::String(s) => Self::parse_str(s, param),
            Value::Object(fields) => {
                let value = match fields.get("value") {
                    Some(Value::String(v)) => parse_decimal(v),
                    Some(Value::Number(n)) => parse_decimal(&n.to_string()),
                    _ => None,
                }
                .ok_or_else(|| ValidationError::amount(param, AmountDefect::InvalidValue))?;
                let currency = fields
                    .get("currency")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ValidationError::amount(param, AmountDefect::InvalidCurrency))?;
                let issuer = match fields.get("issuer") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) if s.is_empty() => None,
                    Some(Value::String(s)) => Some(s.as_str()),
                    Some(_) => {
                        return Err(ValidationError::amount(param, AmountDefect::InvalidIssuer))
                    }
                };
                Self::checked(value, currency, issuer, param)
            }
            _ => Err(ValidationError::amount(param, AmountDefect::Malformed)),
        }
    }

    fn checked(
        value: Decimal,
        currency: &str,
        issuer: Option<&str>,
        param: &str,
    ) -> Result<Self, ValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::amount(param, AmountDefect::InvalidValue));
        }
        let currency = Currency::parse(currency)
            .ok_or_else(|| ValidationError::amount(param, AmountDefect::InvalidCurrency))?;

        if currency.is_native() {
            if issuer.is_some() {
                return Err(ValidationError::amount(param, AmountDefect::UnexpectedIssuer));
            }
            if value.normalize().scale() > MAX_NATIVE_DECIMALS {
                return Err(ValidationError::amount(param, AmountDefect::TooPrecise));
            }
            if value > Decimal::from(MAX_NATIVE_VALUE) {
                return Err(ValidationError::amount(param, AmountDefect::TooLarge));
            }
            return Ok(Self::native(value));
        }

        let issuer = issuer
            .ok_or_else(|| ValidationError::amount(param, AmountDefect::MissingIssuer))?
            .parse::<Address>()
            .map_err(|_| ValidationError::amount(param, AmountDefect::InvalidIssuer))?;
        Ok(Self {
            value,
            currency,
            issuer: Some(issuer),
        })
    }

    /// The same amount raised by `slippage` units of its own currency.
    ///
    /// `None` when the sum overflows, or when a native sum leaves the range
    /// a drops value can express.
    pub fn checked_plus(&self, slippage: Decimal) -> Option<Self> {
        let value = self.value.checked_add(slippage)?;
        if self.is_native()
            && (value > Decimal::from(MAX_NATIVE_VALUE)
                || value.normalize().scale() > MAX_NATIVE_DECIMALS)
        {
            return None;
        }
        Some(Self {
            value,
            ..self.clone()
        })
    }

    /// Ledger wire form: drops string for native, object otherwise.
    pub fn to_wire(&self) -> Result<Value, CoreError> {
        Ok(match &self.issuer {
            None => Value::String(xrp_to_drops(self.value).ok_or_else(|| {
                CoreError::InvalidLedgerAmount(format!("{} XRP has no drops value", self.value))
            })?),
            Some(issuer) => json!({
                "currency": self.currency.as_str(),
                "issuer": issuer.as_str(),
                "value": format_decimal(self.value),
            }),
        })
    }
}

/// Amount as the ledger writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireAmount {
    /// Native currency in drops.
    Drops(String),
    /// Issued currency.
    Issued {
        currency: String,
        issuer: String,
        value: String,
    },
}

impl WireAmount {
    /// Convert to the REST response shape. Issued values keep the ledger's text.
    pub fn to_rest(&self) -> Result<RestAmount, CoreError> {
        match self {
            Self::Drops(drops) => Ok(RestAmount::native(drops_to_xrp(drops)?)),
            Self::Issued {
                currency,
                issuer,
                value,
            } => Ok(RestAmount {
                value: value.clone(),
                currency: currency.clone(),
                issuer: issuer.clone(),
            }),
        }
    }
}

/// Amount in REST responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestAmount {
    pub value: String,
    pub currency: String,
    pub issuer: String,
}

impl RestAmount {
    pub fn native(value: String) -> Self {
        Self {
            value,
            currency: NATIVE_CURRENCY.to_string(),
            issuer: String::new(),
        }
    }
}
