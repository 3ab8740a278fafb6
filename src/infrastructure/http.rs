use crate::config::GatewayConfig;
use crate::domain::ports::Transport;
use crate::domain::request::Endpoint;
use crate::domain::response::ResponseEnvelope;
use crate::domain::signer::Signature;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};

const COMMERCE: HeaderName = HeaderName::from_static("commerce");

/// `reqwest`-backed transport for the R4 Conecta REST API.
///
/// `Content-Type` and `Commerce` are fixed for the life of the client and set
/// as default headers; `Authorization` carries the per-request signature.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let commerce = HeaderValue::from_str(config.commerce_token()).map_err(|_| {
            GatewayError::Configuration("commerce token contains invalid header characters".into())
        })?;
        headers.insert(COMMERCE, commerce);

        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, endpoint: Endpoint, body: Value, signature: &Signature) -> ResponseEnvelope {
        let url = self.url_for(endpoint);
        let sent = self
            .client
            .post(&url)
            .header(AUTHORIZATION, signature.as_str())
            .json(&body)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                let description = if e.is_timeout() {
                    format!("{}: request timed out", endpoint.path())
                } else {
                    format!("{}: {e}", endpoint.path())
                };
                warn!(endpoint = endpoint.path(), error = %e, "gateway unreachable");
                return ResponseEnvelope::transport_failure(description);
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(endpoint = endpoint.path(), %status, error = %e, "failed reading gateway response");
                return ResponseEnvelope::transport_failure(format!(
                    "{}: HTTP {status}, body unreadable: {e}",
                    endpoint.path()
                ));
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(parsed) => {
                debug!(endpoint = endpoint.path(), %status, "gateway answered");
                ResponseEnvelope::received(status.as_u16(), parsed)
            }
            Err(e) => {
                let excerpt: String = String::from_utf8_lossy(&bytes).chars().take(200).collect();
                warn!(endpoint = endpoint.path(), %status, error = %e, "gateway answered with malformed body");
                ResponseEnvelope::transport_failure(format!(
                    "{}: HTTP {status}, malformed response body: {excerpt}",
                    endpoint.path()
                ))
            }
        }
    }
}
