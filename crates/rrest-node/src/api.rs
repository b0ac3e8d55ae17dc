//! HTTP API server for the gateway.
//!
//! Provides REST endpoints for payment lookup, payment submission, and the
//! state of the ledger peer.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use rrest_core::{PaymentResponse, SubmitRequest, ValidationError};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

// --- Response types ---

#[derive(Serialize)]
pub struct ConnectedResponse {
    pub success: bool,
    pub connected: bool,
}

#[derive(Serialize)]
pub struct ServerStatusResponse {
    pub success: bool,
    pub rippled_server_url: String,
    pub rippled_server_status: Value,
}

// --- Handlers ---

async fn handle_get_payment(
    State(state): State<Arc<AppState>>,
    Path((account, identifier)): Path<(String, String)>,
) -> Result<Json<PaymentResponse>, ApiError> {
    tracing::debug!(%account, %identifier, "get payment");
    let payment = state.payments.get_payment(&account, &identifier).await?;
    Ok(Json(PaymentResponse::new(payment)))
}

async fn handle_submit_payment(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let Json(request) =
        body.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;
    let payment = state.payments.submit_payment(&account, request).await?;
    Ok(Json(PaymentResponse::new(payment)))
}

async fn handle_connected(State(state): State<Arc<AppState>>) -> Json<ConnectedResponse> {
    Json(ConnectedResponse {
        success: true,
        connected: state.payments.is_connected().await,
    })
}

async fn handle_server_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServerStatusResponse>, ApiError> {
    let info = state.payments.server_status().await?;
    Ok(Json(ServerStatusResponse {
        success: true,
        rippled_server_url: state.peer_url().to_string(),
        rippled_server_status: info.info,
    }))
}

async fn handle_not_found() -> ApiError {
    ApiError::NotFound
}

// --- Server ---

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/v1/accounts/{account}/payments/{identifier}",
            get(handle_get_payment),
        )
        .route(
            "/v1/accounts/{account}/payments",
            post(handle_submit_payment),
        )
        .route("/v1/server/connected", get(handle_connected))
        .route("/v1/server", get(handle_server_status))
        .fallback(handle_not_found)
        .with_state(state)
}

pub async fn start_api_server<F>(
    listen_addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
