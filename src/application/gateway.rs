use crate::domain::ports::TransportBox;
use crate::domain::request::{
    C2pOrder, CreditOrder, DebitSubmission, OtpRequest, RateQuery, SignedPayload, StatusQuery,
};
use crate::domain::response::ResponseEnvelope;
use crate::domain::signer::Signature;

/// One operation per gateway endpoint.
///
/// Each call is a single POST; retrying is the poller's business, and only
/// for status queries.
pub struct GatewayClient {
    transport: TransportBox,
}

impl GatewayClient {
    pub fn new(transport: TransportBox) -> Self {
        Self { transport }
    }

    pub async fn generate_otp(&self, request: &OtpRequest, signature: &Signature) -> ResponseEnvelope {
        self.send(request, signature).await
    }

    pub async fn submit_debit(
        &self,
        submission: &DebitSubmission,
        signature: &Signature,
    ) -> ResponseEnvelope {
        self.send(submission, signature).await
    }

    pub async fn submit_credit(&self, order: &CreditOrder, signature: &Signature) -> ResponseEnvelope {
        self.send(order, signature).await
    }

    pub async fn submit_c2p(&self, order: &C2pOrder, signature: &Signature) -> ResponseEnvelope {
        self.send(order, signature).await
    }

    pub async fn query_status(&self, query: &StatusQuery, signature: &Signature) -> ResponseEnvelope {
        self.send(query, signature).await
    }

    pub async fn lookup_rate(&self, query: &RateQuery, signature: &Signature) -> ResponseEnvelope {
        self.send(query, signature).await
    }

    async fn send<P: SignedPayload>(&self, payload: &P, signature: &Signature) -> ResponseEnvelope {
        match serde_json::to_value(payload) {
            Ok(body) => self.transport.post(P::ENDPOINT, body, signature).await,
            Err(e) => ResponseEnvelope::transport_failure(format!(
                "{}: request encoding failed: {e}",
                P::ENDPOINT.path()
            )),
        }
    }
}
