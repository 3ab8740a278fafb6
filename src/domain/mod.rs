//! Gateway vocabulary: request payloads and their signatures, response
//! envelopes, outcomes, and the pure rules that classify one into the other.

pub mod amount;
pub mod classifier;
pub mod outcome;
pub mod ports;
pub mod request;
pub mod response;
pub mod signer;
