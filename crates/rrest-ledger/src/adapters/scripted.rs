use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::PeerError;
use crate::protocol;
use crate::traits::LedgerPeer;
use crate::types::RequestKind;

type Responder = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// One queued answer.
#[derive(Clone)]
enum Reply {
    /// A result object, checked like a real peer's.
    Result(Value),
    /// A transport-level failure.
    Fail(PeerError),
    /// Builds the result object from the request params.
    Respond(Responder),
}

/// A request the peer has seen.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub kind: RequestKind,
    pub params: Value,
}

/// In-memory ledger peer that answers from per-kind queues.
///
/// Every request is recorded. Each queued reply is used once, in order; a
/// request with nothing queued fails as a connection error.
#[derive(Default)]
pub struct ScriptedPeer {
    replies: DashMap<RequestKind, VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
    latency: Option<Duration>,
}

impl ScriptedPeer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every reply by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn push(&self, kind: RequestKind, reply: Reply) -> &Self {
        self.replies.entry(kind).or_default().push_back(reply);
        self
    }

    /// Queue a result object for the next `kind` request.
    pub fn respond(&self, kind: RequestKind, result: Value) -> &Self {
        self.push(kind, Reply::Result(result))
    }

    /// Queue an error result (`status: "error"`).
    pub fn respond_error(&self, kind: RequestKind, code: &str, message: &str) -> &Self {
        let result = json!({
            "status": "error",
            "error": code,
            "error_message": message,
        });
        self.push(kind, Reply::Result(result))
    }

    /// Queue a result built from the request params.
    pub fn respond_with<F>(&self, kind: RequestKind, responder: F) -> &Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.push(kind, Reply::Respond(Arc::new(responder)))
    }

    /// Queue a connection failure.
    pub fn fail_connection(&self, kind: RequestKind) -> &Self {
        self.push(
            kind,
            Reply::Fail(PeerError::Connection("connection refused".into())),
        )
    }

    /// All requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Requests of one kind, oldest first.
    pub fn requests_of(&self, kind: RequestKind) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.kind == kind)
            .collect()
    }

    /// Queued replies not yet consumed.
    pub fn pending(&self, kind: RequestKind) -> usize {
        self.replies.get(&kind).map(|q| q.len()).unwrap_or(0)
    }

    fn next_reply(&self, kind: RequestKind) -> Option<Reply> {
        self.replies.get_mut(&kind)?.pop_front()
    }
}

#[async_trait]
impl LedgerPeer for ScriptedPeer {
    async fn request(&self, kind: RequestKind, params: Value) -> Result<Value, PeerError> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(RecordedRequest {
                kind,
                params: params.clone(),
            });
        }
        tracing::debug!(%kind, "scripted ledger request");

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.next_reply(kind) {
            Some(Reply::Result(result)) => protocol::check_result(kind, result),
            Some(Reply::Respond(responder)) => protocol::check_result(kind, responder(&params)),
            Some(Reply::Fail(err)) => Err(err),
            None => Err(PeerError::Connection(format!("no scripted reply for {kind}"))),
        }
    }

    fn peer_id(&self) -> &str {
        "scripted"
    }
}
