//! rrest gateway node
//!
//! HTTP front end that validates payment requests, talks to a ledger peer
//! and returns payments in their REST shape.

pub mod api;
pub mod config;
pub mod error;
pub mod payments;
pub mod state;

pub use api::{build_router, start_api_server};
pub use config::GatewayConfig;
pub use error::ApiError;
pub use payments::{PaymentService, PaymentSettings};
pub use state::AppState;
