//! Shared helpers for the gateway integration tests.
//!
//! [`TestGateway`] wires the HTTP router to a [`ScriptedPeer`] so each test
//! scripts the ledger replies it needs and then inspects both the HTTP
//! response and the requests the gateway made.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use rrest_ledger::ScriptedPeer;
use rrest_node::{build_router, AppState, PaymentSettings};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const ALICE: &str = "rGUpotx8YYDiocqS577N4T1p1kHBNdEJ9s";
pub const BOB: &str = "rDuV4ndTFUn5NjLJSTNfEFMTxqQVeafvxC";
pub const BITSTAMP: &str = "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B";
/// Sender of the memo payment; neither ALICE nor BOB.
pub const CAROL: &str = "rLNaPoKeeBjZe2qs6x52yVPZpZ8td4dc6w";
pub const SECRET: &str = "snoPBrXtMeMyMHUVTgbuqAfg1SUTb";

pub const PAYMENT_HASH: &str = "A116C9ED46D6207734A43317D30FD88F52AC8634C37D904BBF4E41D865F90475";
pub const PARTIAL_PAYMENT_HASH: &str =
    "9834A14AB9BCAA0F6A8DA71073617EAC8F004E596A3FA11D807B84631B825D9D";
pub const MEMO_PAYMENT_HASH: &str =
    "9C225A950B92172F8C2AFE8B682B7B86CE8F835578B546F9B8070CBA309AD314";
pub const SUBMITTED_MEMO_HASH: &str =
    "74994981FCA6081AFAC5BF620C10BF410216FF60B73E3628E209CE656E44306F";
pub const SUBMITTED_IOU_HASH: &str =
    "A5878028A8A2FA98A2549454D037D9FFD9159FDA140252C52F5ABE38B287A03B";
pub const SUBMITTED_NO_DATA_HASH: &str =
    "1EAD52B660CF4191126F8580D9799F079A3D38C1B8C94F7CE181C9AF3BC04BF8";

/// Load a JSON fixture by file stem.
pub fn fixture(name: &str) -> Value {
    let raw = match name {
        "tx_payment" => include_str!("../fixtures/tx_payment.json"),
        "rest_payment" => include_str!("../fixtures/rest_payment.json"),
        "tx_partial_payment" => include_str!("../fixtures/tx_partial_payment.json"),
        "rest_partial_payment" => include_str!("../fixtures/rest_partial_payment.json"),
        "tx_memo_payment" => include_str!("../fixtures/tx_memo_payment.json"),
        "ledger_memo" => include_str!("../fixtures/ledger_memo.json"),
        "rest_memo_payment" => include_str!("../fixtures/rest_memo_payment.json"),
        "account_info" => include_str!("../fixtures/account_info.json"),
        "payment_with_memo" => include_str!("../fixtures/payment_with_memo.json"),
        "payment_non_xrp" => include_str!("../fixtures/payment_non_xrp.json"),
        other => panic!("unknown fixture {other}"),
    };
    serde_json::from_str(raw).expect("fixture is valid JSON")
}

/// A `submit` responder that signs nothing but echoes the transaction back
/// as accepted under `hash`.
pub fn accept_submission(hash: &'static str) -> impl Fn(&Value) -> Value + Send + Sync + 'static {
    move |params| {
        let mut tx_json = params["tx_json"].clone();
        tx_json["hash"] = json!(hash);
        tx_json["SigningPubKey"] =
            json!("02BC8C02199949B15C005B997E7C8594574E9B02BA2D0628902E0532989976CF9D");
        json!({
            "engine_result": "tesSUCCESS",
            "engine_result_code": 0,
            "engine_result_message":
                "The transaction was applied. Only final in a validated ledger.",
            "status": "success",
            "tx_blob": "1200002280000000",
            "tx_json": tx_json
        })
    }
}

/// The gateway router backed by a scripted ledger peer.
pub struct TestGateway {
    pub peer: Arc<ScriptedPeer>,
    app: Router,
}

impl TestGateway {
    pub fn new() -> Self {
        Self::with_peer(ScriptedPeer::new())
    }

    pub fn with_peer(peer: ScriptedPeer) -> Self {
        let settings = PaymentSettings {
            timeout: Duration::from_millis(250),
            ..PaymentSettings::default()
        };
        let peer = Arc::new(peer);
        let state = AppState::new(peer.clone(), settings);
        let app = build_router(Arc::new(state));
        Self { peer, app }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds");
        self.send(req).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self
            .app
            .clone()
            .oneshot(req)
            .await
            .expect("router is infallible");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let body = serde_json::from_slice(&bytes).expect("body is JSON");
        (status, body)
    }
}

impl Default for TestGateway {
    fn default() -> Self {
        Self::new()
    }
}

pub fn payment_uri(account: &str, hash: &str) -> String {
    format!("/v1/accounts/{account}/payments/{hash}")
}

pub fn payments_uri(account: &str) -> String {
    format!("/v1/accounts/{account}/payments")
}
