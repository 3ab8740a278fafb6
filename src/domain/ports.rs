use super::request::{Endpoint, OtpRequest};
use super::response::ResponseEnvelope;
use super::signer::Signature;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Carries one signed request to the gateway.
///
/// Implementations never fail: network trouble comes back as
/// [`ResponseEnvelope::TransportFailure`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, endpoint: Endpoint, body: Value, signature: &Signature) -> ResponseEnvelope;
}

/// Supplies the one-time password the payer received after an OTP request.
#[async_trait]
pub trait OtpSource: Send + Sync {
    async fn obtain_otp(&self, request: &OtpRequest) -> Result<String>;
}

pub type TransportBox = Box<dyn Transport>;
pub type OtpSourceBox = Box<dyn OtpSource>;
