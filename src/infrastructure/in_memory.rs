use crate::domain::ports::Transport;
use crate::domain::request::Endpoint;
use crate::domain::response::ResponseEnvelope;
use crate::domain::signer::Signature;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A request as it reached a [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    pub body: Value,
    pub signature: Signature,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<ResponseEnvelope>,
    calls: Vec<RecordedCall>,
}

/// An in-process gateway that answers from a queue of canned envelopes.
///
/// Clones share the same script, so a test can keep one handle to inspect
/// the recorded calls while the orchestrator owns another. Once the queue is
/// empty every call yields a transport failure.
#[derive(Default, Clone)]
pub struct ScriptedTransport {
    script: Arc<RwLock<Script>>,
}

impl ScriptedTransport {
    /// Creates a transport with no queued replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one reply; replies are served in order regardless of endpoint.
    pub async fn push(&self, reply: ResponseEnvelope) {
        self.script.write().await.replies.push_back(reply);
    }

    /// Queues a JSON body answered with HTTP 200.
    pub async fn push_body(&self, body: Value) {
        self.push(ResponseEnvelope::received(200, body)).await;
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.script.read().await.calls.clone()
    }

    pub async fn calls_to(&self, endpoint: Endpoint) -> usize {
        self.script
            .read()
            .await
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, endpoint: Endpoint, body: Value, signature: &Signature) -> ResponseEnvelope {
        let mut script = self.script.write().await;
        script.calls.push(RecordedCall {
            endpoint,
            body,
            signature: signature.clone(),
        });
        script.replies.pop_front().unwrap_or_else(|| {
            ResponseEnvelope::transport_failure(format!(
                "no scripted reply left for {}",
                endpoint.path()
            ))
        })
    }
}
