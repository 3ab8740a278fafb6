use thiserror::Error;

/// Failures owned by the caller side of the gateway: bad configuration,
/// invalid input, or an OTP that could not be collected.
///
/// Gateway answers and network trouble are not errors; they travel as
/// [`TransactionOutcome`](crate::domain::outcome::TransactionOutcome) values.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("OTP entry failed: {0}")]
    OtpEntry(String),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
