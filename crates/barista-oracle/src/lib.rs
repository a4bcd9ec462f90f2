//! Language-understanding oracle integration.
//!
//! The oracle is an external text-generation service treated as an
//! unreliable, latency-bearing function. This crate owns the transport
//! (`complete` over HTTP) and the best-effort extraction of a structured
//! payload from noisy output; interpreting the payload belongs to the
//! conversation engine.

pub mod client;
pub mod error;
pub mod extract;
pub mod scripted;

pub use client::{HttpOracle, Oracle};
pub use error::OracleError;
pub use extract::extract_json_object;
pub use scripted::ScriptedOracle;
