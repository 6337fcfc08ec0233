//! Domain model for meshsnr
//!
//! This module contains core domain types and errors that provide:
//! - Newtypes for node IDs and signal readings
//! - A tagged probe outcome instead of sentinel values
//! - Structured error handling per failure category

pub mod errors;
pub mod types;

pub use types::{FailureStatus, NodeId, ProbeOutcome, Snr};

pub use errors::{ConvertError, LinkError, ReachabilityError};
