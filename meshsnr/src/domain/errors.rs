//! Structured error types for meshsnr
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::NodeId;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain output from the radio control executable.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Failed to launch {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    #[error("{program} exited with status {code}: {stderr}")]
    ExitStatus { program: String, code: i32, stderr: String },
}

/// Reasons the run must stop before any probe is sent.
#[derive(Error, Debug)]
pub enum ReachabilityError {
    #[error("Aborting: target {0} not found in the node table")]
    TargetNotFound(NodeId),

    #[error("Aborting: {id} is {hops} hop(s) away, not a direct neighbor")]
    NotDirect { id: NodeId, hops: i64 },

    #[error("Malformed node table: Hops value {value:?} for {id} is not an integer")]
    MalformedHops { id: NodeId, value: String },

    #[error("Malformed node table: row for {id} has no {field} column")]
    MissingField { id: NodeId, field: &'static str },

    #[error("Failed to query node table: {0}")]
    Query(#[from] LinkError),
}

/// Failures of the offline log → CSV conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("File '{}' not found ({source})", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
