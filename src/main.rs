use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use r4conecta::application::orchestrator::TransactionOrchestrator;
use r4conecta::application::poller::VerificationPoller;
use r4conecta::config::{GatewayConfig, PollPolicy};
use r4conecta::domain::amount::Amount;
use r4conecta::domain::outcome::TransactionOutcome;
use r4conecta::domain::ports::OtpSourceBox;
use r4conecta::domain::request::{C2pOrder, CreditOrder, DebitOrder, RateQuery};
use r4conecta::infrastructure::http::HttpTransport;
use r4conecta::interfaces::console::otp_prompt::{FixedOtp, OtpPrompt};
use r4conecta::interfaces::console::report;
use r4conecta::telemetry;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

#[derive(Parser)]
#[command(author, version, about = "Client for the R4 Conecta payment gateway", long_about = None)]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "BASE_URL", hide_env_values = true)]
    base_url: Option<String>,

    /// Merchant token, also used as the HMAC signing secret
    #[arg(long, env = "TOKEN_COMMERCE", hide_env_values = true)]
    commerce_token: Option<String>,

    /// Delay between verification status queries, in milliseconds
    #[arg(long, env = "R4_POLL_INTERVAL_MS", default_value_t = 5_000)]
    poll_interval_ms: u64,

    /// Maximum number of verification status queries
    #[arg(long, env = "R4_POLL_MAX_ATTEMPTS", default_value_t = 12)]
    poll_max_attempts: u32,

    /// Per-request HTTP timeout, in seconds
    #[arg(long, env = "R4_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Append an audit trail of every flow to this file
    #[arg(long, env = "R4_AUDIT_LOG")]
    audit_log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Immediate debit, authorized by an OTP sent to the payer
    Debit {
        #[arg(long)]
        bank: String,
        #[arg(long)]
        amount: Amount,
        #[arg(long)]
        phone: String,
        /// Payer national id (cedula)
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        concept: String,
        /// OTP received by the payer; prompted for when omitted
        #[arg(long)]
        otp: Option<String>,
    },
    /// Immediate credit to an account
    Credit {
        /// Beneficiary national id (cedula)
        #[arg(long)]
        id: String,
        #[arg(long)]
        account: String,
        #[arg(long)]
        amount: Amount,
        #[arg(long)]
        concept: String,
    },
    /// Phone-to-phone collection
    C2p {
        #[arg(long)]
        destination_phone: String,
        /// Payer national id (cedula)
        #[arg(long)]
        id: String,
        #[arg(long)]
        concept: String,
        #[arg(long)]
        bank: String,
        #[arg(long)]
        ip: String,
        #[arg(long)]
        amount: Amount,
        #[arg(long)]
        otp: String,
    },
    /// Official exchange rate for a currency and value date
    Rate {
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Value date as YYYY-MM-DD; defaults to today
        #[arg(long)]
        value_date: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;
    let result = runtime.block_on(run(cli));
    // A stdin read left behind by an interrupted OTP prompt cannot be
    // cancelled; do not wait for it.
    runtime.shutdown_background();
    result
}

async fn run(cli: Cli) -> Result<ExitCode> {
    telemetry::init(cli.audit_log.as_deref()).into_diagnostic()?;

    // Configuration problems stop us before any request leaves.
    let poll = PollPolicy::new(
        Duration::from_millis(cli.poll_interval_ms),
        cli.poll_max_attempts,
    )
    .into_diagnostic()?;
    let config = GatewayConfig::new(cli.base_url.as_deref(), cli.commerce_token.as_deref())
        .into_diagnostic()?
        .with_http_timeout(Duration::from_secs(cli.timeout_secs))
        .with_poll(poll);
    let transport = HttpTransport::new(&config).into_diagnostic()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_tx.send(true).ok();
        }
    });

    let orchestrator = TransactionOrchestrator::new(&config, Box::new(transport))
        .with_poller(VerificationPoller::new(config.poll).with_shutdown(shutdown_rx.clone()));

    // The poller ends its own session on Ctrl-C between queries; this catches
    // the interrupt anywhere else (OTP prompt, in-flight request).
    let outcome = tokio::select! {
        biased;
        outcome = execute(cli.command, &orchestrator) => outcome?,
        _ = interrupted(shutdown_rx) => {
            warn!("interrupted by the operator");
            TransactionOutcome::Cancelled {
                transaction_id: None,
                attempts: 0,
            }
        }
    };

    let stdout = io::stdout();
    report::write_outcome(stdout.lock(), &outcome).into_diagnostic()?;

    Ok(report::exit_code(&outcome))
}

async fn execute(
    command: Command,
    orchestrator: &TransactionOrchestrator,
) -> Result<TransactionOutcome> {
    let outcome = match command {
        Command::Debit {
            bank,
            amount,
            phone,
            id,
            name,
            concept,
            otp,
        } => {
            let order = DebitOrder {
                bank,
                amount,
                phone,
                id,
                name,
                concept,
            };
            let otp_source: OtpSourceBox = match otp {
                Some(otp) => Box::new(FixedOtp(otp)),
                None => Box::new(OtpPrompt::stdio()),
            };
            orchestrator
                .debit(&order, otp_source.as_ref())
                .await
                .into_diagnostic()?
        }
        Command::Credit {
            id,
            account,
            amount,
            concept,
        } => {
            let order = CreditOrder {
                id,
                account,
                amount,
                concept,
            };
            orchestrator.credit(&order).await
        }
        Command::C2p {
            destination_phone,
            id,
            concept,
            bank,
            ip,
            amount,
            otp,
        } => {
            let order = C2pOrder {
                destination_phone,
                id,
                concept,
                bank,
                ip,
                amount,
                otp,
            };
            orchestrator.c2p(&order).await
        }
        Command::Rate {
            currency,
            value_date,
        } => {
            let value_date =
                value_date.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
            let query = RateQuery {
                currency,
                value_date,
            };
            orchestrator.rate(&query).await
        }
    };

    Ok(outcome)
}

/// Resolves once Ctrl-C was pressed; never if the handler could not be set up.
async fn interrupted(mut shutdown: watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
