use crate::domain::ports::OtpSource;
use crate::domain::request::OtpRequest;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

/// Asks the operator for the OTP the payer received by SMS.
///
/// Generic over the streams so tests can drive it with in-memory buffers.
pub struct OtpPrompt<R, W> {
    io: Mutex<(R, W)>,
}

impl OtpPrompt<BufReader<tokio::io::Stdin>, tokio::io::Stderr> {
    /// Prompts on stderr, reads from stdin, keeping stdout for the report.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> OtpPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }
}

#[async_trait]
impl<R, W> OtpSource for OtpPrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn obtain_otp(&self, request: &OtpRequest) -> Result<String> {
        let mut io = self.io.lock().await;
        let (reader, writer) = &mut *io;

        let prompt = format!("OTP sent to {} (bank {}): ", request.phone, request.bank);
        writer.write_all(prompt.as_bytes()).await?;
        writer.flush().await?;

        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Err(GatewayError::OtpEntry("input closed before an OTP was entered".into()));
        }
        let otp = line.trim();
        if otp.is_empty() {
            return Err(GatewayError::OtpEntry("empty OTP".into()));
        }
        Ok(otp.to_string())
    }
}

/// An OTP known before the flow starts, e.g. passed on the command line.
pub struct FixedOtp(pub String);

#[async_trait]
impl OtpSource for FixedOtp {
    async fn obtain_otp(&self, _request: &OtpRequest) -> Result<String> {
        Ok(self.0.clone())
    }
}
