use super::gateway::GatewayClient;
use crate::config::PollPolicy;
use crate::domain::classifier::{FlowKind, classify};
use crate::domain::outcome::{Settlement, TransactionOutcome};
use crate::domain::request::StatusQuery;
use crate::domain::signer::Signer;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// How a verification session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollResult {
    Completed { settlement: Settlement, attempts: u32 },
    TimedOut { attempts: u32 },
    Cancelled { attempts: u32 },
}

impl PollResult {
    pub fn attempts(&self) -> u32 {
        match self {
            PollResult::Completed { attempts, .. }
            | PollResult::TimedOut { attempts }
            | PollResult::Cancelled { attempts } => *attempts,
        }
    }

    pub fn into_outcome(self, transaction_id: &str) -> TransactionOutcome {
        match self {
            PollResult::Completed { settlement, .. } => TransactionOutcome::Completed(settlement),
            PollResult::TimedOut { attempts } => TransactionOutcome::TimedOut {
                transaction_id: transaction_id.to_string(),
                attempts,
            },
            PollResult::Cancelled { attempts } => TransactionOutcome::Cancelled {
                transaction_id: Some(transaction_id.to_string()),
                attempts,
            },
        }
    }
}

/// State of one verification run. `attempts_made` never passes `max_attempts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSession {
    pub transaction_id: String,
    pub attempts_made: u32,
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollSession {
    pub fn new(transaction_id: impl Into<String>, policy: PollPolicy) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            attempts_made: 0,
            max_attempts: policy.max_attempts(),
            interval: policy.interval(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts_made >= self.max_attempts
    }

    fn record_attempt(&mut self) {
        self.attempts_made += 1;
    }
}

/// Drives a pending transaction to a terminal state by querying its status
/// on a fixed interval.
///
/// Any non-`ACCP` answer, a transport failure included, counts as "still
/// pending" and consumes one attempt. The wait between attempts is raced
/// against the optional shutdown signal.
#[derive(Debug, Clone)]
pub struct VerificationPoller {
    policy: PollPolicy,
    shutdown: Option<watch::Receiver<bool>>,
}

impl VerificationPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            shutdown: None,
        }
    }

    /// Ends sessions as `Cancelled` once `true` is published on the channel.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub async fn verify(
        &self,
        client: &GatewayClient,
        signer: &Signer,
        transaction_id: &str,
    ) -> PollResult {
        self.run(client, signer, PollSession::new(transaction_id, self.policy))
            .await
    }

    async fn run(
        &self,
        client: &GatewayClient,
        signer: &Signer,
        mut session: PollSession,
    ) -> PollResult {
        let transaction_id = session.transaction_id.clone();
        let query = StatusQuery {
            id: transaction_id.clone(),
        };
        let signature = signer.sign_payload(&query);
        let mut shutdown = self.shutdown.clone();

        while !session.is_exhausted() {
            if session.attempts_made > 0 {
                tokio::select! {
                    _ = tokio::time::sleep(session.interval) => {}
                    _ = shutdown_requested(&mut shutdown) => {
                        info!(%transaction_id, attempts = session.attempts_made, "verification cancelled");
                        return PollResult::Cancelled {
                            attempts: session.attempts_made,
                        };
                    }
                }
            }

            let envelope = client.query_status(&query, &signature).await;
            session.record_attempt();

            match classify(FlowKind::StatusQuery, &envelope) {
                TransactionOutcome::Completed(settlement) => {
                    info!(
                        %transaction_id,
                        attempt = session.attempts_made,
                        "transaction settled"
                    );
                    return PollResult::Completed {
                        settlement,
                        attempts: session.attempts_made,
                    };
                }
                TransactionOutcome::TransportFailure { description } => warn!(
                    %transaction_id,
                    attempt = session.attempts_made,
                    %description,
                    "status query failed, counting as pending"
                ),
                _ => info!(
                    %transaction_id,
                    attempt = session.attempts_made,
                    max_attempts = session.max_attempts,
                    "transaction still pending"
                ),
            }
        }

        warn!(
            %transaction_id,
            attempts = session.attempts_made,
            "verification attempts exhausted"
        );
        PollResult::TimedOut {
            attempts: session.attempts_made,
        }
    }
}

/// Resolves once `true` is observed; never resolves without a channel or
/// after the sender is gone.
async fn shutdown_requested(shutdown: &mut Option<watch::Receiver<bool>>) {
    let Some(rx) = shutdown else {
        return std::future::pending::<()>().await;
    };
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return std::future::pending::<()>().await;
        }
    }
}
