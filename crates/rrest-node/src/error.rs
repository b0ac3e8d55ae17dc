use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rrest_core::{CoreError, ErrorEnvelope, ErrorType, ValidationError};
use rrest_ledger::PeerError;

const CANNOT_CONNECT: &str = "Cannot connect to rippled";
const INVALID_RESPONSE: &str = "Invalid response from rippled";

/// Everything a gateway request can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("transaction is not a payment")]
    NotAPayment,

    #[error("secret is not a valid family seed")]
    InvalidSecret,

    /// The peer refused the signed transaction.
    #[error("submission rejected: {engine_result}")]
    Rejected {
        engine_result: String,
        message: String,
    },

    #[error(transparent)]
    Peer(#[from] PeerError),

    /// Ledger data that could not be turned into a payment.
    #[error(transparent)]
    Ledger(#[from] CoreError),

    #[error("route not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NotAPayment => StatusCode::BAD_REQUEST,
            Self::Ledger(CoreError::NotAPayment(_)) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Peer(PeerError::Remote { code, .. })
                if code == "txnNotFound" || code == "actNotFound" =>
            {
                StatusCode::NOT_FOUND
            }
            Self::InvalidSecret | Self::Rejected { .. } | Self::Peer(_) | Self::Ledger(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The JSON body sent to the client.
    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::Validation(err) => ErrorEnvelope::from(err),
            Self::NotAPayment | Self::Ledger(CoreError::NotAPayment(_)) => ErrorEnvelope::new(
                ErrorType::InvalidRequest,
                "Not a payment",
                Some(
                    "The transaction corresponding to the given identifier is not a payment."
                        .into(),
                ),
            ),
            Self::InvalidSecret => ErrorEnvelope::new(
                ErrorType::Transaction,
                "tejSecretInvalid",
                Some("Invalid secret".into()),
            ),
            Self::Rejected {
                engine_result,
                message,
            } => ErrorEnvelope::new(
                ErrorType::Transaction,
                engine_result.clone(),
                Some(message.clone()),
            ),
            Self::Peer(err) => peer_envelope(err),
            Self::Ledger(err) => ErrorEnvelope::new(
                ErrorType::Connection,
                INVALID_RESPONSE,
                Some(err.to_string()),
            ),
            Self::NotFound => ErrorEnvelope::new(ErrorType::InvalidRequest, "Not found", None),
        }
    }
}

fn peer_envelope(err: &PeerError) -> ErrorEnvelope {
    match err {
        PeerError::Remote { code, message } => {
            let message = match code.as_str() {
                "txnNotFound" => "Transaction not found.".to_string(),
                "actNotFound" => "Account not found.".to_string(),
                _ => message.clone(),
            };
            ErrorEnvelope::new(ErrorType::Transaction, code.clone(), Some(message))
        }
        PeerError::Connection(_) => ErrorEnvelope::new(ErrorType::Connection, CANNOT_CONNECT, None),
        PeerError::Timeout(_) => ErrorEnvelope::new(
            ErrorType::Connection,
            CANNOT_CONNECT,
            Some("Timed out waiting for a reply".into()),
        ),
        PeerError::Protocol(detail) => ErrorEnvelope::new(
            ErrorType::Connection,
            INVALID_RESPONSE,
            Some(detail.clone()),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(self.envelope())).into_response()
    }
}
