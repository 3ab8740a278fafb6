//! Transport adapters: the live HTTP client and a scripted in-memory gateway.

pub mod http;
pub mod in_memory;
