//! Traceroute response parsing.
//!
//! A successful `meshtastic --traceroute` run prints both legs of the route,
//! each as a chain of hop descriptors:
//!
//! ```text
//! Route traced towards destination:
//! !aaaa1111 --> !ba4bf9d0 (6.25dB)
//! Route traced back to us:
//! !ba4bf9d0 --> !aaaa1111 (-7.0dB)
//! ```
//!
//! Only the return leg decides the outcome. The forward leg is read the same
//! way and attached when it is also a single hop.

use crate::domain::{FailureStatus, LinkError, ProbeOutcome, Snr};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// Line announcing the return path; the hop chain follows on the next line.
pub const RETURN_MARKER: &str = "Route traced back to us";

/// Line announcing the forward path.
pub const FORWARD_MARKER: &str = "Route traced towards destination";

/// Delimiter between hop descriptors.
pub const HOP_DELIMITER: &str = "-->";

/// Signed decimal in parentheses with a `dB` suffix, e.g. `(-7.0dB)` or `(.5 dB)`.
static SIGNAL_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*([-+]?(?:\d+\.?\d*|\.\d+))\s*dB\s*\)").expect("valid signal pattern")
});

/// Hop descriptors on one leg of a route, origin first.
pub type HopSequence<'a> = Vec<&'a str>;

/// Turn the collaborator's result into an outcome.
///
/// Errors never escape: a timeout counts as a lost route, anything else as an
/// exception.
#[must_use]
pub fn classify(result: Result<String, LinkError>) -> ProbeOutcome {
    match result {
        Ok(output) => parse_trace(&output),
        Err(LinkError::TimedOut { .. }) => ProbeOutcome::Failed(FailureStatus::RouteLost),
        Err(err) => {
            debug!("traceroute invocation failed: {err}");
            ProbeOutcome::Failed(FailureStatus::Exception)
        }
    }
}

/// Parse the text of one traceroute run.
#[must_use]
pub fn parse_trace(output: &str) -> ProbeOutcome {
    match read_leg(output, RETURN_MARKER) {
        Ok(inbound) => {
            let outbound = read_leg(output, FORWARD_MARKER).ok();
            ProbeOutcome::Ok { inbound, outbound }
        }
        Err(status) => ProbeOutcome::Failed(status),
    }
}

/// Read the single-hop signal value on the leg introduced by `marker`.
fn read_leg(output: &str, marker: &str) -> Result<Snr, FailureStatus> {
    let mut lines = output.lines().skip_while(|line| !line.contains(marker));
    lines.next().ok_or(FailureStatus::RouteLost)?;
    let chain = lines.next().ok_or(FailureStatus::RouteLost)?;

    let hops = split_hops(chain);
    debug!("{marker}: {} hop descriptor(s) in {chain:?}", hops.len());

    match hops.len() {
        2 => hops.last().copied().and_then(signal_value).ok_or(FailureStatus::NoSignal),
        n if n > 2 => Err(FailureStatus::NotDirect),
        _ => Err(FailureStatus::NoHops),
    }
}

/// Split a hop chain on the delimiter.
///
/// Empty descriptors between delimiters are kept, so a doubled or dangling
/// `-->` counts as an extra hop. A blank line has no hops at all.
#[must_use]
pub fn split_hops(chain: &str) -> HopSequence<'_> {
    if chain.trim().is_empty() {
        return Vec::new();
    }
    chain.split(HOP_DELIMITER).map(str::trim).collect()
}

/// Extract the `(…dB)` value embedded in a hop descriptor.
#[must_use]
pub fn signal_value(hop: &str) -> Option<Snr> {
    SIGNAL_VALUE
        .captures(hop)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(Snr)
}
