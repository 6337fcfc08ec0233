//! Analysis logic for collected SNR samples
//!
//! This module contains the pure aggregation logic, separated from the
//! scheduler loop and from console reporting.

pub mod snr_stats;

pub use snr_stats::{summarize, SampleHistory, Summary};
