//! Memo validation and the text <-> hex mapping used on the ledger.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

const MEMO_FIELDS: [&str; 3] = ["MemoType", "MemoData", "MemoFormat"];

/// A memo as exposed over REST: plain text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    #[serde(rename = "MemoType", default, skip_serializing_if = "Option::is_none")]
    pub memo_type: Option<String>,
    #[serde(rename = "MemoData", default, skip_serializing_if = "Option::is_none")]
    pub memo_data: Option<String>,
    #[serde(rename = "MemoFormat", default, skip_serializing_if = "Option::is_none")]
    pub memo_format: Option<String>,
}

/// A memo as stored on the ledger: `{"Memo": {...}}` with hex fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMemo {
    #[serde(rename = "Memo")]
    pub memo: Memo,
}

/// Validate the optional `memos` property of a payment request.
///
/// `None` means the property was absent. A present property must be a
/// non-empty array of objects whose memo fields are strings.
pub fn normalize_memos(input: Option<&Value>) -> Result<Vec<Memo>, ValidationError> {
    let items = match input {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ValidationError::NonArrayMemos),
    };
    if items.is_empty() {
        return Err(ValidationError::EmptyMemos);
    }

    items.iter().map(normalize_memo).collect()
}

fn normalize_memo(item: &Value) -> Result<Memo, ValidationError> {
    let fields = item.as_object().ok_or(ValidationError::NonArrayMemos)?;

    let mut values: [Option<String>; 3] = Default::default();
    for (slot, name) in values.iter_mut().zip(MEMO_FIELDS) {
        match fields.get(name) {
            None => {}
            Some(Value::String(s)) => *slot = Some(s.clone()),
            Some(_) => {
                return Err(ValidationError::MemoFieldType {
                    field: name.to_string(),
                })
            }
        }
    }

    let [memo_type, memo_data, memo_format] = values;
    if memo_type.is_none() && memo_data.is_none() && memo_format.is_none() {
        return Err(ValidationError::EmptyMemo);
    }
    Ok(Memo {
        memo_type,
        memo_data,
        memo_format,
    })
}

fn encode_field(text: &Option<String>) -> Option<String> {
    text.as_ref().map(|t| hex::encode_upper(t.as_bytes()))
}

/// Hex back to text; fields that are not hex-encoded UTF-8 are kept as is.
fn decode_field(hex_text: &Option<String>) -> Option<String> {
    hex_text.as_ref().map(|h| {
        hex::decode(h)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_else(|| h.clone())
    })
}

impl Memo {
    pub fn to_wire(&self) -> WireMemo {
        WireMemo {
            memo: Memo {
                memo_type: encode_field(&self.memo_type),
                memo_data: encode_field(&self.memo_data),
                memo_format: encode_field(&self.memo_format),
            },
        }
    }

    pub fn from_wire(wire: &WireMemo) -> Self {
        Self {
            memo_type: decode_field(&wire.memo.memo_type),
            memo_data: decode_field(&wire.memo.memo_data),
            memo_format: decode_field(&wire.memo.memo_format),
        }
    }
}
