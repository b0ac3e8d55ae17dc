//! Core types of the rrest gateway: request validation, memo handling,
//! ledger transaction parsing and the REST envelope.

pub mod address;
pub mod amount;
pub mod envelope;
pub mod error;
pub mod hash;
pub mod ledger_tx;
pub mod memo;
pub mod parser;
pub mod payment;

pub use address::{is_valid_address, Address, Secret};
pub use amount::{Amount, Currency, RestAmount, WireAmount};
pub use envelope::{ErrorEnvelope, ErrorType, PaymentResponse};
pub use error::{AmountDefect, CoreError, ValidationError};
pub use hash::TxHash;
pub use ledger_tx::LedgerTransaction;
pub use memo::{normalize_memos, Memo};
pub use parser::{parse_payment_from_tx, ParseContext, RestPayment};
pub use payment::{Payment, PaymentRequest, SubmitRequest};
