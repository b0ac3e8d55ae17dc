//! The JSON envelope every REST response is wrapped in.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::parser::RestPayment;

/// Failure category of an error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Rejected locally, the ledger peer was not contacted.
    InvalidRequest,
    /// The peer reported a missing transaction or account, or rejected a submission.
    Transaction,
    /// The peer could not be reached or answered with garbage.
    Connection,
}

/// `{success: false, error_type, error, message?}`.
///
/// Only `error_type` and `error` are stable; `message` is for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error_type: ErrorType,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error_type: ErrorType, error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            error: error.into(),
            message,
        }
    }
}

impl From<&ValidationError> for ErrorEnvelope {
    fn from(err: &ValidationError) -> Self {
        Self::new(ErrorType::InvalidRequest, err.to_string(), err.message())
    }
}

/// `{success: true, payment}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub payment: RestPayment,
}

impl PaymentResponse {
    pub fn new(payment: RestPayment) -> Self {
        Self {
            success: true,
            payment,
        }
    }
}
