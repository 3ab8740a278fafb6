use super::outcome::{Settlement, TransactionOutcome};
use super::response::{ResponseEnvelope, text_field};

/// The gateway exchanges whose answers get classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    OtpRequest,
    Debit,
    Credit,
    C2p,
    StatusQuery,
    Rate,
}

/// When a non-success answer means "accepted, verify later".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRule {
    Never,
    OnCode {
        code: &'static str,
        requires_id: bool,
    },
    OnAnyOtherCode,
}

/// Per-flow interpretation of the `code` field.
///
/// A flow without a success code passes any parsed body through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowRules {
    pub success_code: Option<&'static str>,
    pub pending: PendingRule,
}

impl FlowKind {
    pub fn rules(self) -> FlowRules {
        match self {
            FlowKind::OtpRequest => FlowRules {
                success_code: Some("202"),
                pending: PendingRule::Never,
            },
            FlowKind::Debit => FlowRules {
                success_code: Some("ACCP"),
                pending: PendingRule::OnCode {
                    code: "AC00",
                    requires_id: false,
                },
            },
            FlowKind::Credit => FlowRules {
                success_code: Some("ACCP"),
                pending: PendingRule::OnCode {
                    code: "AC00",
                    requires_id: true,
                },
            },
            FlowKind::C2p => FlowRules {
                success_code: Some("00"),
                pending: PendingRule::Never,
            },
            FlowKind::StatusQuery => FlowRules {
                success_code: Some("ACCP"),
                pending: PendingRule::OnAnyOtherCode,
            },
            FlowKind::Rate => FlowRules {
                success_code: None,
                pending: PendingRule::Never,
            },
        }
    }
}

/// Maps a gateway answer to an outcome. Pure and total.
///
/// A transport failure wins over every code check.
pub fn classify(flow: FlowKind, envelope: &ResponseEnvelope) -> TransactionOutcome {
    let body = match envelope {
        ResponseEnvelope::TransportFailure { description } => {
            return TransactionOutcome::TransportFailure {
                description: description.clone(),
            };
        }
        ResponseEnvelope::Received { body, .. } => body,
    };

    let rules = flow.rules();
    let Some(success_code) = rules.success_code else {
        return TransactionOutcome::Completed(Settlement::from_body(body));
    };

    let code = text_field(body, "code");
    if code.as_deref() == Some(success_code) {
        return TransactionOutcome::Completed(Settlement::from_body(body));
    }

    let id = text_field(body, "id");
    let pending = match rules.pending {
        PendingRule::Never => false,
        PendingRule::OnCode { code: pending_code, requires_id } => {
            code.as_deref() == Some(pending_code) && (!requires_id || id.is_some())
        }
        PendingRule::OnAnyOtherCode => true,
    };

    if pending {
        TransactionOutcome::PendingVerification { transaction_id: id }
    } else {
        TransactionOutcome::Rejected {
            code: code.unwrap_or_default(),
            message: text_field(body, "message"),
        }
    }
}
