//! Operator-facing adapters: OTP entry and outcome reporting.

pub mod console;
