use super::response::text_field;
use serde_json::Value;
use std::fmt;

/// What the gateway reported for a settled (or answered) request.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub id: Option<String>,
    pub reference: Option<String>,
    pub message: Option<String>,
    /// The full response body, passed through for display.
    pub body: Value,
}

impl Settlement {
    pub fn from_body(body: &Value) -> Self {
        Self {
            id: text_field(body, "id"),
            reference: text_field(body, "reference"),
            message: text_field(body, "message"),
            body: body.clone(),
        }
    }
}

/// Result of a flow, or of a single classified gateway call.
///
/// `PendingVerification` only survives to the caller when the gateway gave no
/// transaction id to poll with. `TimedOut` does not mean failed: the gateway
/// may still settle the operation later. `Cancelled` carries no id when the
/// operator interrupted the flow before verification started.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionOutcome {
    Completed(Settlement),
    PendingVerification {
        transaction_id: Option<String>,
    },
    Rejected {
        code: String,
        message: Option<String>,
    },
    TransportFailure {
        description: String,
    },
    TimedOut {
        transaction_id: String,
        attempts: u32,
    },
    Cancelled {
        transaction_id: Option<String>,
        attempts: u32,
    },
}

impl TransactionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransactionOutcome::Completed(_))
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            TransactionOutcome::Completed(settlement) => settlement.reference.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionOutcome::Completed(s) => {
                write!(f, "completed")?;
                if let Some(reference) = &s.reference {
                    write!(f, " (reference {reference})")?;
                }
                if let Some(message) = &s.message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            TransactionOutcome::PendingVerification { transaction_id } => match transaction_id {
                Some(id) => write!(f, "pending verification (id {id})"),
                None => write!(f, "pending verification (no transaction id returned)"),
            },
            TransactionOutcome::Rejected { code, message } => {
                write!(f, "rejected with code {code}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            TransactionOutcome::TransportFailure { description } => {
                write!(f, "transport failure: {description}")
            }
            TransactionOutcome::TimedOut {
                transaction_id,
                attempts,
            } => write!(
                f,
                "verification timed out for {transaction_id} after {attempts} attempts; \
                 the operation may still settle"
            ),
            TransactionOutcome::Cancelled {
                transaction_id: Some(id),
                attempts,
            } => write!(f, "verification of {id} cancelled after {attempts} attempts"),
            TransactionOutcome::Cancelled {
                transaction_id: None,
                ..
            } => write!(
                f,
                "interrupted by the operator; a submitted operation may still settle"
            ),
        }
    }
}
