use std::fmt;

/// What is wrong with an amount parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountDefect {
    /// The string form does not split into `value+currency+issuer`.
    Malformed,
    /// The value is not a non-negative decimal.
    InvalidValue,
    /// A native value has more precision than one drop.
    TooPrecise,
    /// A native value above the total supply of the native currency.
    TooLarge,
    /// The currency code is not a valid ledger currency.
    InvalidCurrency,
    /// The issuer is not a valid address.
    InvalidIssuer,
    /// A non-native amount without an issuer.
    MissingIssuer,
    /// A native amount that names an issuer.
    UnexpectedIssuer,
}

impl AmountDefect {
    /// Human-readable explanation carried in the envelope `message`.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Malformed => "Must be an amount string in the form value+currency+issuer",
            Self::InvalidValue => "Value must be a non-negative decimal number",
            Self::TooPrecise => "XRP amounts must not have more than 6 decimal places",
            Self::TooLarge => "XRP amounts must not exceed 100000000000 XRP",
            Self::InvalidCurrency => {
                "Currency must be a three-character code or a 40-character hex code"
            }
            Self::InvalidIssuer => "Issuer must be a valid Ripple address",
            Self::MissingIssuer => "Non-XRP payment must have an issuer",
            Self::UnexpectedIssuer => "XRP amounts must not have an issuer",
        }
    }
}

impl fmt::Display for AmountDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Request validation failures, all caught before the ledger peer is contacted.
///
/// The `Display` text is the stable `error` code of the REST envelope;
/// [`ValidationError::message`] is the optional human-readable `message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Parameter is not a valid Ripple address: {param}")]
    InvalidAddress { param: String },

    #[error("Invalid parameter: {param}")]
    InvalidAmount { param: String, defect: AmountDefect },

    #[error("Parameter is not a valid currency: {param}")]
    InvalidCurrency { param: String },

    #[error("Invalid parameter: memos")]
    NonArrayMemos,

    #[error("Invalid parameter: memos")]
    EmptyMemos,

    #[error("Invalid parameter: memos")]
    EmptyMemo,

    #[error("Invalid parameter: {field}")]
    MemoFieldType { field: String },

    #[error("Transaction not found")]
    InvalidTransactionHash,

    #[error("Parameter missing: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter: {param}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid request body")]
    MalformedBody(String),
}

impl ValidationError {
    /// The optional `message` field of the error envelope.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::InvalidAmount { defect, .. } => Some(defect.describe().to_string()),
            Self::NonArrayMemos => Some("Must be an array with memo objects".into()),
            Self::EmptyMemos => Some(
                "Must contain at least one Memo object, otherwise omit the memos property".into(),
            ),
            Self::EmptyMemo => Some(
                "Memo objects must contain at least one of MemoType, MemoData or MemoFormat"
                    .into(),
            ),
            Self::MemoFieldType { field } => Some(format!("{field} must be a string")),
            Self::InvalidTransactionHash => Some("Missing hash".into()),
            Self::InvalidParameter { message, .. } => Some(message.clone()),
            Self::MalformedBody(detail) => Some(detail.clone()),
            Self::InvalidAddress { .. }
            | Self::InvalidCurrency { .. }
            | Self::MissingParameter(_) => None,
        }
    }

    pub(crate) fn amount(param: &str, defect: AmountDefect) -> Self {
        Self::InvalidAmount {
            param: param.to_string(),
            defect,
        }
    }
}

/// Errors raised while interpreting data received from the ledger.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("malformed ledger transaction: {0}")]
    MalformedTransaction(String),

    #[error("invalid ledger amount: {0}")]
    InvalidLedgerAmount(String),

    #[error("not a payment: {0}")]
    NotAPayment(String),
}
