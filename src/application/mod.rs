//! Application layer: the gateway client, the verification poller and the
//! flow orchestrator that sequences them.
//!
//! Flows run on `tokio`; the only suspension points are the outbound HTTP
//! call and the wait between status queries.

pub mod gateway;
pub mod orchestrator;
pub mod poller;
