//! Core value types shared by the parsers, the scheduler and the report.

use std::fmt;

/// Canonical node identifier as rendered in the node table (e.g. `!ba4bf9d0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(pub String);

impl NodeId {
    /// Search form used against the node table: no leading `!`, lower-cased.
    #[must_use]
    pub fn search_key(&self) -> String {
        self.0.trim().trim_start_matches('!').to_lowercase()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Signal-to-noise ratio in decibels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Snr(pub f64);

impl Snr {
    #[must_use]
    pub fn db(self) -> f64 {
        self.0
    }
}

// `{:?}` keeps the trailing `.0` on whole values so log lines read `-7.0dB`.
impl fmt::Display for Snr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}dB", self.0)
    }
}

/// Why a single probe produced no usable sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureStatus {
    /// No return route was reported, or the collaborator timed out
    RouteLost,
    /// The return route went through a relay
    NotDirect,
    /// The return route had fewer than two hop descriptors
    NoHops,
    /// The final hop carried no `(…dB)` value
    NoSignal,
    /// The collaborator could not be run or its output could not be read
    Exception,
}

impl FailureStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FailureStatus::RouteLost => "route lost or timed out",
            FailureStatus::NotDirect => "response not direct",
            FailureStatus::NoHops => "no hops",
            FailureStatus::NoSignal => "no signal value",
            FailureStatus::Exception => "exception",
        }
    }
}

impl fmt::Display for FailureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one traceroute attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    /// Direct return path with a readable signal value.
    ///
    /// `outbound` is the reading on the way to the target, present only when
    /// the forward path was also a single hop.
    Ok { inbound: Snr, outbound: Option<Snr> },
    Failed(FailureStatus),
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Ok { inbound, outbound: Some(out) } => {
                write!(f, "OK: {inbound} (out: {out})")
            }
            ProbeOutcome::Ok { inbound, outbound: None } => write!(f, "OK: {inbound}"),
            ProbeOutcome::Failed(status) => write!(f, "FAILED ({status})"),
        }
    }
}
