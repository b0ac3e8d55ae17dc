//! Integration test: payment lookup through the HTTP API.
//!
//! Drives `GET /v1/accounts/{account}/payments/{hash}` against a scripted
//! ledger peer and checks both the response and the peer traffic.

use std::time::Duration;

use axum::http::StatusCode;
use rrest_integration_tests::{
    fixture, payment_uri, TestGateway, ALICE, BITSTAMP, BOB, MEMO_PAYMENT_HASH, PAYMENT_HASH,
};
use rrest_ledger::{RequestKind, ScriptedPeer};
use serde_json::json;

#[tokio::test]
async fn test_get_payment_by_hash() {
    let gateway = TestGateway::new();
    gateway.peer.respond(RequestKind::Tx, fixture("tx_payment"));

    let (status, body) = gateway.get(&payment_uri(ALICE, PAYMENT_HASH)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "payment": fixture("rest_payment")})
    );

    let requests = gateway.peer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, RequestKind::Tx);
    assert_eq!(requests[0].params["transaction"], json!(PAYMENT_HASH));
}

#[tokio::test]
async fn test_get_payment_lowercase_hash() {
    let gateway = TestGateway::new();
    gateway.peer.respond(RequestKind::Tx, fixture("tx_payment"));

    let (status, _) = gateway
        .get(&payment_uri(ALICE, &PAYMENT_HASH.to_lowercase()))
        .await;

    assert_eq!(status, StatusCode::OK);
    let tx = &gateway.peer.requests_of(RequestKind::Tx)[0];
    assert_eq!(tx.params["transaction"], json!(PAYMENT_HASH));
}

#[tokio::test]
async fn test_get_payment_with_memos_fetches_close_time() {
    let gateway = TestGateway::new();
    gateway
        .peer
        .respond(RequestKind::Tx, fixture("tx_memo_payment"))
        .respond(RequestKind::Ledger, fixture("ledger_memo"));

    let (status, body) = gateway.get(&payment_uri(ALICE, MEMO_PAYMENT_HASH)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "payment": fixture("rest_memo_payment")})
    );

    let kinds: Vec<RequestKind> = gateway.peer.requests().iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![RequestKind::Tx, RequestKind::Ledger]);
    let ledger = &gateway.peer.requests_of(RequestKind::Ledger)[0];
    assert_eq!(ledger.params["ledger_index"], json!(8_819_951));
}

#[tokio::test]
async fn test_get_payment_direction_per_account() {
    let gateway = TestGateway::new();
    gateway
        .peer
        .respond(RequestKind::Tx, fixture("tx_payment"))
        .respond(RequestKind::Tx, fixture("tx_payment"));

    let (_, outgoing) = gateway.get(&payment_uri(ALICE, PAYMENT_HASH)).await;
    let (_, incoming) = gateway.get(&payment_uri(BOB, PAYMENT_HASH)).await;

    assert_eq!(outgoing["payment"]["direction"], json!("outgoing"));
    assert_eq!(incoming["payment"]["direction"], json!("incoming"));
}

#[tokio::test]
async fn test_get_unvalidated_payment_is_pending() {
    let gateway = TestGateway::new();
    let mut tx = fixture("tx_payment");
    tx["validated"] = json!(false);
    gateway.peer.respond(RequestKind::Tx, tx);

    let (status, body) = gateway.get(&payment_uri(ALICE, PAYMENT_HASH)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment"]["state"], json!("pending"));
    assert_eq!(body["payment"]["result"], json!("tesSUCCESS"));
}

#[tokio::test]
async fn test_get_payment_with_out_of_range_balance() {
    let gateway = TestGateway::new();
    let mut tx = fixture("tx_payment");
    let trust_line = json!({
        "ModifiedNode": {
            "LedgerEntryType": "RippleState",
            "FinalFields": {
                "Balance": {"currency": "USD", "issuer": "rrrrrrrrrrrrrrrrrrrrBZbvji", "value": "-1e50"},
                "HighLimit": {"currency": "USD", "issuer": ALICE, "value": "0"},
                "LowLimit": {"currency": "USD", "issuer": BITSTAMP, "value": "0"}
            },
            "PreviousFields": {
                "Balance": {"currency": "USD", "issuer": "rrrrrrrrrrrrrrrrrrrrBZbvji", "value": "-2e50"}
            }
        }
    });
    tx["meta"]["AffectedNodes"]
        .as_array_mut()
        .expect("affected nodes")
        .push(trust_line);
    gateway.peer.respond(RequestKind::Tx, tx);

    let (status, body) = gateway.get(&payment_uri(ALICE, PAYMENT_HASH)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "payment": fixture("rest_payment")})
    );
}

#[tokio::test]
async fn test_get_payment_invalid_hash() {
    let gateway = TestGateway::new();

    let (status, body) = gateway.get(&payment_uri(ALICE, "abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Transaction not found",
            "message": "Missing hash"
        })
    );
    assert!(gateway.peer.requests().is_empty());
}

#[tokio::test]
async fn test_get_payment_invalid_account() {
    let gateway = TestGateway::new();

    let (status, body) = gateway.get(&payment_uri("rBogus", PAYMENT_HASH)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Parameter is not a valid Ripple address: account"
        })
    );
    assert!(gateway.peer.requests().is_empty());
}

#[tokio::test]
async fn test_get_payment_not_found() {
    let gateway = TestGateway::new();
    gateway
        .peer
        .respond_error(RequestKind::Tx, "txnNotFound", "Transaction not found.");

    let (status, body) = gateway.get(&payment_uri(ALICE, PAYMENT_HASH)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error_type": "transaction",
            "error": "txnNotFound",
            "message": "Transaction not found."
        })
    );
}

#[tokio::test]
async fn test_get_non_payment_transaction() {
    let gateway = TestGateway::new();
    let mut offer = fixture("tx_payment");
    offer["TransactionType"] = json!("OfferCreate");
    gateway.peer.respond(RequestKind::Tx, offer);

    let (status, body) = gateway.get(&payment_uri(ALICE, PAYMENT_HASH)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Not a payment"));
}

#[tokio::test]
async fn test_get_payment_peer_unreachable() {
    let gateway = TestGateway::new();
    gateway.peer.fail_connection(RequestKind::Tx);

    let (status, body) = gateway.get(&payment_uri(ALICE, PAYMENT_HASH)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error_type": "connection",
            "error": "Cannot connect to rippled"
        })
    );
}

#[tokio::test]
async fn test_get_payment_peer_too_slow() {
    let gateway = TestGateway::with_peer(ScriptedPeer::new().with_latency(Duration::from_secs(5)));
    gateway.peer.respond(RequestKind::Tx, fixture("tx_payment"));

    let (status, body) = gateway.get(&payment_uri(ALICE, PAYMENT_HASH)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_type"], json!("connection"));
    assert_eq!(body["message"], json!("Timed out waiting for a reply"));
}
