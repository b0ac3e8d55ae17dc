//! Integration test: payment submission through the HTTP API.
//!
//! Invalid requests must be answered locally, without any ledger traffic.

use axum::http::StatusCode;
use rrest_integration_tests::{
    accept_submission, fixture, payments_uri, TestGateway, ALICE, BITSTAMP, BOB, SECRET,
    SUBMITTED_IOU_HASH, SUBMITTED_MEMO_HASH, SUBMITTED_NO_DATA_HASH,
};
use rrest_ledger::RequestKind;
use serde_json::{json, Value};

fn with_memos(memos: Value) -> Value {
    let mut body = fixture("payment_with_memo");
    body["payment"]["memos"] = memos;
    body
}

fn scripted_submission(gateway: &TestGateway, hash: &'static str) {
    gateway
        .peer
        .respond(RequestKind::AccountInfo, fixture("account_info"))
        .respond_with(RequestKind::Submit, accept_submission(hash));
}

async fn assert_rejected_locally(body: Value, expected: Value) {
    let gateway = TestGateway::new();
    let (status, reply) = gateway.post_json(&payments_uri(ALICE), &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply, expected);
    assert!(gateway.peer.requests().is_empty());
}

// =========================================================================
// Memo validation
// =========================================================================

#[tokio::test]
async fn test_memos_not_an_array() {
    assert_rejected_locally(
        with_memos(json!("some string")),
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Invalid parameter: memos",
            "message": "Must be an array with memo objects"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_memos_null_is_not_an_array() {
    assert_rejected_locally(
        with_memos(Value::Null),
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Invalid parameter: memos",
            "message": "Must be an array with memo objects"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_memos_empty_array() {
    assert_rejected_locally(
        with_memos(json!([])),
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Invalid parameter: memos",
            "message":
                "Must contain at least one Memo object, otherwise omit the memos property"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_memo_type_must_be_string() {
    assert_rejected_locally(
        with_memos(json!([{"MemoType": 1, "MemoData": "some_value"}])),
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Invalid parameter: MemoType",
            "message": "MemoType must be a string"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_memo_data_must_be_string() {
    assert_rejected_locally(
        with_memos(json!([{"MemoType": "some_key", "MemoData": 1}])),
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Invalid parameter: MemoData",
            "message": "MemoData must be a string"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_memo_without_fields() {
    assert_rejected_locally(
        with_memos(json!([{}])),
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Invalid parameter: memos",
            "message": "Memo objects must contain at least one of MemoType, MemoData or MemoFormat"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_memo_without_data_is_accepted() {
    let gateway = TestGateway::new();
    scripted_submission(&gateway, SUBMITTED_NO_DATA_HASH);

    let body = with_memos(json!([{"MemoType": "some_key"}]));
    let (status, reply) = gateway.post_json(&payments_uri(ALICE), &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["payment"]["hash"], json!(SUBMITTED_NO_DATA_HASH));
    assert_eq!(reply["payment"]["memos"], json!([{"MemoType": "some_key"}]));

    let submit = &gateway.peer.requests_of(RequestKind::Submit)[0];
    assert_eq!(
        submit.params["tx_json"]["Memos"],
        json!([{"Memo": {"MemoType": "736F6D655F6B6579"}}])
    );
}

// =========================================================================
// Successful submissions
// =========================================================================

#[tokio::test]
async fn test_submit_payment_with_memo() {
    let gateway = TestGateway::new();
    scripted_submission(&gateway, SUBMITTED_MEMO_HASH);

    let (status, reply) = gateway
        .post_json(&payments_uri(ALICE), &fixture("payment_with_memo"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        reply,
        json!({
            "success": true,
            "payment": {
                "source_account": ALICE,
                "source_tag": "",
                "source_amount": {"value": "1", "currency": "XRP", "issuer": ""},
                "source_slippage": "0",
                "destination_account": BOB,
                "destination_tag": "",
                "destination_amount": {"value": "1", "currency": "XRP", "issuer": ""},
                "invoice_id": "",
                "paths": "[]",
                "no_direct_ripple": false,
                "partial_payment": false,
                "direction": "outgoing",
                "state": "pending",
                "result": "tesSUCCESS",
                "ledger": "",
                "hash": SUBMITTED_MEMO_HASH,
                "timestamp": "",
                "fee": "0.000012",
                "source_balance_changes": [],
                "destination_balance_changes": [],
                "memos": [{"MemoType": "some_key", "MemoData": "some_value"}]
            }
        })
    );

    let kinds: Vec<RequestKind> = gateway.peer.requests().iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![RequestKind::AccountInfo, RequestKind::Submit]);

    let submit = &gateway.peer.requests_of(RequestKind::Submit)[0];
    assert_eq!(submit.params["secret"], json!(SECRET));
    assert_eq!(
        submit.params["tx_json"],
        json!({
            "TransactionType": "Payment",
            "Account": ALICE,
            "Destination": BOB,
            "Amount": "1000000",
            "Fee": "12",
            "Flags": 2147483648u32,
            "Sequence": 23,
            "LastLedgerSequence": 8_819_954,
            "Memos": [{
                "Memo": {"MemoType": "736F6D655F6B6579", "MemoData": "736F6D655F76616C7565"}
            }]
        })
    );
}

#[tokio::test]
async fn test_submit_issued_currency_payment() {
    let gateway = TestGateway::new();
    scripted_submission(&gateway, SUBMITTED_IOU_HASH);

    let (status, reply) = gateway
        .post_json(&payments_uri(ALICE), &fixture("payment_non_xrp"))
        .await;

    assert_eq!(status, StatusCode::OK);
    let usd = json!({"value": "10", "currency": "USD", "issuer": BITSTAMP});
    assert_eq!(reply["payment"]["hash"], json!(SUBMITTED_IOU_HASH));
    assert_eq!(reply["payment"]["source_amount"], usd);
    assert_eq!(reply["payment"]["destination_amount"], usd);
    assert!(reply["payment"].get("memos").is_none());

    let tx_json = &gateway.peer.requests_of(RequestKind::Submit)[0].params["tx_json"];
    let wire = json!({"currency": "USD", "issuer": BITSTAMP, "value": "10"});
    assert_eq!(tx_json["Amount"], wire);
    assert_eq!(tx_json["SendMax"], wire);
}

// =========================================================================
// Rejections
// =========================================================================

#[tokio::test]
async fn test_issued_currency_without_issuer() {
    let mut body = fixture("payment_non_xrp");
    body["payment"]["destination_amount"]["issuer"] = json!("");
    assert_rejected_locally(
        body,
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Invalid parameter: destination_amount",
            "message": "Non-XRP payment must have an issuer"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_missing_destination_account() {
    let mut body = fixture("payment_with_memo");
    body["payment"]
        .as_object_mut()
        .expect("payment object")
        .remove("destination_account");
    assert_rejected_locally(
        body,
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Parameter missing: destination_account"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_native_amount_above_supply() {
    let mut body = fixture("payment_with_memo");
    body["payment"]["destination_amount"] = json!("100000000000000000000000");
    assert_rejected_locally(
        body,
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Invalid parameter: destination_amount",
            "message": "XRP amounts must not exceed 100000000000 XRP"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_slippage_overflowing_source_amount() {
    let mut body = fixture("payment_non_xrp");
    body["payment"]["source_amount"] =
        json!(format!("79228162514264337593543950335+USD+{BITSTAMP}"));
    body["payment"]["source_slippage"] = json!("1");
    assert_rejected_locally(
        body,
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Invalid parameter: source_slippage",
            "message": "Source amount plus slippage must be a representable amount"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_destination_account_not_a_string() {
    let mut body = fixture("payment_with_memo");
    body["payment"]["destination_account"] = json!(12);
    assert_rejected_locally(
        body,
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Parameter is not a valid Ripple address: destination_account"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_partial_payment_not_a_boolean() {
    let mut body = fixture("payment_with_memo");
    body["payment"]["partial_payment"] = json!("yes");
    assert_rejected_locally(
        body,
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Invalid parameter: partial_payment",
            "message": "Must be a boolean"
        }),
    )
    .await;
}

#[tokio::test]
async fn test_invalid_account_in_path() {
    let gateway = TestGateway::new();

    let (status, reply) = gateway
        .post_json(&payments_uri("rBogus"), &fixture("payment_with_memo"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply,
        json!({
            "success": false,
            "error_type": "invalid_request",
            "error": "Parameter is not a valid Ripple address: account"
        })
    );
    assert!(gateway.peer.requests().is_empty());
}

#[tokio::test]
async fn test_invalid_secret() {
    let gateway = TestGateway::new();
    let mut body = fixture("payment_with_memo");
    body["secret"] = json!("sfakesecret");

    let (status, reply) = gateway.post_json(&payments_uri(ALICE), &body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        reply,
        json!({
            "success": false,
            "error_type": "transaction",
            "error": "tejSecretInvalid",
            "message": "Invalid secret"
        })
    );
    assert!(gateway.peer.requests().is_empty());
}

#[tokio::test]
async fn test_unknown_source_account() {
    let gateway = TestGateway::new();
    gateway
        .peer
        .respond_error(RequestKind::AccountInfo, "actNotFound", "Account not found.");

    let (status, reply) = gateway
        .post_json(&payments_uri(ALICE), &fixture("payment_with_memo"))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(reply["error"], json!("actNotFound"));
    assert_eq!(reply["message"], json!("Account not found."));
    assert!(gateway.peer.requests_of(RequestKind::Submit).is_empty());
}

#[tokio::test]
async fn test_submission_rejected_by_engine() {
    let gateway = TestGateway::new();
    gateway
        .peer
        .respond(RequestKind::AccountInfo, fixture("account_info"))
        .respond_with(RequestKind::Submit, |params| {
            json!({
                "engine_result": "tecUNFUNDED_PAYMENT",
                "engine_result_code": 104,
                "engine_result_message": "Insufficient XRP balance to send.",
                "status": "success",
                "tx_json": params["tx_json"].clone()
            })
        });

    let (status, reply) = gateway
        .post_json(&payments_uri(ALICE), &fixture("payment_with_memo"))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        reply,
        json!({
            "success": false,
            "error_type": "transaction",
            "error": "tecUNFUNDED_PAYMENT",
            "message": "Insufficient XRP balance to send."
        })
    );
}
