use crate::domain::outcome::TransactionOutcome;
use std::io::{self, Write};
use std::process::ExitCode;

/// Writes the outcome summary and, when the gateway sent one, the
/// pretty-printed response body.
pub fn write_outcome<W: Write>(mut writer: W, outcome: &TransactionOutcome) -> io::Result<()> {
    writeln!(writer, "{}", headline(outcome))?;
    if let TransactionOutcome::Completed(settlement) = outcome {
        let pretty = serde_json::to_string_pretty(&settlement.body).map_err(io::Error::other)?;
        writeln!(writer, "{pretty}")?;
    }
    writer.flush()
}

fn headline(outcome: &TransactionOutcome) -> String {
    let label = match outcome {
        TransactionOutcome::Completed(_) => "COMPLETED",
        TransactionOutcome::PendingVerification { .. } => "PENDING",
        TransactionOutcome::Rejected { .. } => "REJECTED",
        TransactionOutcome::TransportFailure { .. } => "TRANSPORT FAILURE",
        TransactionOutcome::TimedOut { .. } => "TIMED OUT",
        TransactionOutcome::Cancelled { .. } => "CANCELLED",
    };
    format!("{label}: {outcome}")
}

/// Distinct exit status per outcome so scripts can tell a timeout (may still
/// settle) from a rejection.
pub fn exit_code(outcome: &TransactionOutcome) -> ExitCode {
    ExitCode::from(exit_status(outcome))
}

fn exit_status(outcome: &TransactionOutcome) -> u8 {
    match outcome {
        TransactionOutcome::Completed(_) => 0,
        TransactionOutcome::Rejected { .. } => 2,
        TransactionOutcome::TimedOut { .. } => 3,
        TransactionOutcome::TransportFailure { .. } => 4,
        TransactionOutcome::PendingVerification { .. } => 5,
        TransactionOutcome::Cancelled { .. } => 130,
    }
}
