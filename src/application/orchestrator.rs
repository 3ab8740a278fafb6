use super::gateway::GatewayClient;
use super::poller::VerificationPoller;
use crate::config::GatewayConfig;
use crate::domain::classifier::{FlowKind, classify};
use crate::domain::outcome::TransactionOutcome;
use crate::domain::ports::{OtpSource, TransportBox};
use crate::domain::request::{C2pOrder, CreditOrder, DebitOrder, RateQuery};
use crate::domain::signer::Signer;
use crate::error::Result;
use tracing::{debug, info, instrument};

/// Runs the gateway's business flows.
///
/// Each flow is a fixed sequence over the shared primitives: sign, send,
/// classify, and poll when the gateway parks the operation as pending.
/// Holds no mutable state, so one orchestrator can serve concurrent flows.
pub struct TransactionOrchestrator {
    gateway: GatewayClient,
    signer: Signer,
    poller: VerificationPoller,
}

impl TransactionOrchestrator {
    /// Creates an orchestrator over `transport`, signing with the configured
    /// commerce token and polling on the configured schedule.
    pub fn new(config: &GatewayConfig, transport: TransportBox) -> Self {
        Self {
            gateway: GatewayClient::new(transport),
            signer: Signer::new(config.commerce_token()),
            poller: VerificationPoller::new(config.poll),
        }
    }

    /// Replaces the poller, e.g. to attach a shutdown signal.
    pub fn with_poller(mut self, poller: VerificationPoller) -> Self {
        self.poller = poller;
        self
    }

    /// OTP-gated immediate debit.
    ///
    /// The only error is a failure of `otp_source`; every gateway answer is
    /// an outcome.
    #[instrument(skip_all, fields(bank = %order.bank, amount = %order.amount))]
    pub async fn debit(
        &self,
        order: &DebitOrder,
        otp_source: &dyn OtpSource,
    ) -> Result<TransactionOutcome> {
        let otp_request = order.otp_request();
        let signature = self.signer.sign_payload(&otp_request);
        let envelope = self.gateway.generate_otp(&otp_request, &signature).await;
        match classify(FlowKind::OtpRequest, &envelope) {
            TransactionOutcome::Completed(_) => info!("OTP request acknowledged"),
            refused => {
                info!(outcome = %refused, "OTP request not acknowledged");
                return Ok(refused);
            }
        }

        let otp = otp_source.obtain_otp(&otp_request).await?;
        let submission = order.with_otp(otp.trim());
        let signature = self.signer.sign_payload(&submission);
        let envelope = self.gateway.submit_debit(&submission, &signature).await;

        Ok(self.settle(classify(FlowKind::Debit, &envelope)).await)
    }

    /// Immediate credit to an account.
    #[instrument(skip_all, fields(amount = %order.amount))]
    pub async fn credit(&self, order: &CreditOrder) -> TransactionOutcome {
        let signature = self.signer.sign_payload(order);
        let envelope = self.gateway.submit_credit(order, &signature).await;
        self.settle(classify(FlowKind::Credit, &envelope)).await
    }

    /// Phone-to-phone collection. The gateway answers synchronously, so there
    /// is nothing to poll.
    #[instrument(skip_all, fields(bank = %order.bank, amount = %order.amount))]
    pub async fn c2p(&self, order: &C2pOrder) -> TransactionOutcome {
        let signature = self.signer.sign_payload(order);
        let envelope = self.gateway.submit_c2p(order, &signature).await;
        let outcome = classify(FlowKind::C2p, &envelope);
        info!(%outcome, "C2P finished");
        outcome
    }

    /// Exchange-rate lookup; the parsed body is passed through untouched.
    #[instrument(skip_all, fields(currency = %query.currency, value_date = %query.value_date))]
    pub async fn rate(&self, query: &RateQuery) -> TransactionOutcome {
        let signature = self.signer.sign_payload(query);
        let envelope = self.gateway.lookup_rate(query, &signature).await;
        classify(FlowKind::Rate, &envelope)
    }

    async fn settle(&self, outcome: TransactionOutcome) -> TransactionOutcome {
        let outcome = match outcome {
            TransactionOutcome::PendingVerification {
                transaction_id: Some(id),
            } => {
                info!(transaction_id = %id, "operation pending, starting verification");
                let result = self.poller.verify(&self.gateway, &self.signer, &id).await;
                debug!(transaction_id = %id, attempts = result.attempts(), "verification ended");
                result.into_outcome(&id)
            }
            other => other,
        };
        info!(%outcome, "flow finished");
        outcome
    }
}
