use crate::error::{GatewayError, Result};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5_000);
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 12;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed-interval schedule for verification polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    interval: Duration,
    max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Result<Self> {
        if max_attempts == 0 {
            return Err(GatewayError::Configuration(
                "poll max attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            interval,
            max_attempts,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Always at least 1.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Immutable process-wide gateway settings.
///
/// The commerce token doubles as the HMAC secret.
#[derive(Clone)]
pub struct GatewayConfig {
    base_url: String,
    commerce_token: String,
    pub http_timeout: Duration,
    pub poll: PollPolicy,
}

impl GatewayConfig {
    pub fn new(base_url: Option<&str>, commerce_token: Option<&str>) -> Result<Self> {
        let base_url = required("base URL (BASE_URL)", base_url)?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(GatewayError::Configuration(format!(
                "base URL must be an http(s) URL, got '{base_url}'"
            )));
        }
        let commerce_token = required("commerce token (TOKEN_COMMERCE)", commerce_token)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            commerce_token: commerce_token.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            poll: PollPolicy::default(),
        })
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn commerce_token(&self) -> &str {
        &self.commerce_token
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("http_timeout", &self.http_timeout)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

fn required<'a>(what: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(GatewayError::Configuration(format!("missing {what}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_fail_fast() {
        assert!(matches!(
            GatewayConfig::new(None, Some("token")),
            Err(GatewayError::Configuration(msg)) if msg.contains("BASE_URL")
        ));
        assert!(matches!(
            GatewayConfig::new(Some("https://r4.example"), Some("   ")),
            Err(GatewayError::Configuration(msg)) if msg.contains("TOKEN_COMMERCE")
        ));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let config = GatewayConfig::new(Some(" https://r4.example/api/ "), Some("tok")).unwrap();
        assert_eq!(config.base_url(), "https://r4.example/api");
        assert_eq!(config.poll, PollPolicy::default());
    }

    #[test]
    fn test_non_http_base_url_is_rejected() {
        assert!(GatewayConfig::new(Some("r4.example"), Some("tok")).is_err());
    }

    #[test]
    fn test_poll_policy_needs_an_attempt() {
        assert!(PollPolicy::new(Duration::from_millis(10), 0).is_err());
        assert_eq!(PollPolicy::default().max_attempts(), 12);
        assert_eq!(PollPolicy::default().interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = GatewayConfig::new(Some("https://r4.example"), Some("s3cr3t")).unwrap();
        assert!(!format!("{config:?}").contains("s3cr3t"));
    }
}
