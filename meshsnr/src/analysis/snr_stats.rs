//! SNR sample aggregation.
//!
//! # Architecture
//!
//! - **`SampleHistory`** - append-only accumulator fed one outcome per attempt
//! - **`summarize()`** - final statistics over a finished history
//!
//! ## Data Flow
//!
//! ```text
//! ProbeOutcome
//!     │
//!     └──► SampleHistory.record()   ← once per attempt, in order
//!              │
//!              └──► summarize()     ← once, after the last attempt
//! ```

// Sample counts are small; converting them to f64 for the mean is exact
#![allow(clippy::cast_precision_loss)]

use crate::domain::{FailureStatus, ProbeOutcome, Snr};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// SAMPLE HISTORY (ACCUMULATOR)
// =============================================================================

/// Samples collected during one run, in attempt order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SampleHistory {
    /// Return-path readings from successful attempts.
    inbound: Vec<f64>,

    /// Forward-path readings, only from attempts that reported one.
    outbound: Vec<f64>,

    /// Failed attempts per status.
    failures: BTreeMap<FailureStatus, usize>,
}

impl SampleHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one attempt.
    pub fn record(&mut self, outcome: &ProbeOutcome) {
        match outcome {
            ProbeOutcome::Ok { inbound, outbound } => {
                self.inbound.push(inbound.db());
                if let Some(out) = outbound {
                    self.outbound.push(out.db());
                }
            }
            ProbeOutcome::Failed(status) => {
                *self.failures.entry(*status).or_insert(0) += 1;
            }
        }
    }

    /// Successful return-path readings.
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.inbound
    }

    #[must_use]
    pub fn outbound_samples(&self) -> &[f64] {
        &self.outbound
    }

    /// Failure counts keyed by status.
    #[must_use]
    pub fn failures(&self) -> &BTreeMap<FailureStatus, usize> {
        &self.failures
    }

    /// Attempts recorded so far, successful or not.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.inbound.len() + self.failures.values().sum::<usize>()
    }
}

// =============================================================================
// SUMMARY (OUTPUT TYPE)
// =============================================================================

/// Final statistics for a run with at least one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub inbound_mean: Snr,
    pub min: Snr,
    pub max: Snr,
    pub samples: usize,
    pub attempts: usize,
    /// Mean forward-path reading, when any attempt reported one.
    pub outbound_mean: Option<Snr>,
}

/// Summarize a finished run. `None` means no attempt produced a sample.
#[must_use]
pub fn summarize(history: &SampleHistory) -> Option<Summary> {
    let inbound_mean = mean(history.samples())?;
    let min = history.samples().iter().copied().fold(f64::INFINITY, f64::min);
    let max = history.samples().iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(Summary {
        inbound_mean: Snr(inbound_mean),
        min: Snr(min),
        max: Snr(max),
        samples: history.samples().len(),
        attempts: history.attempts(),
        outbound_mean: mean(history.outbound_samples()).map(Snr),
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Final Averages ---")?;
        if let Some(out) = self.outbound_mean {
            writeln!(f, "Outbound: {:.2} dB", out.db())?;
        }
        writeln!(f, "Inbound:  {:.2} dB", self.inbound_mean.db())?;
        write!(
            f,
            "Samples:  {}/{} (min {:.2} dB, max {:.2} dB)",
            self.samples,
            self.attempts,
            self.min.db(),
            self.max.db()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(db: f64) -> ProbeOutcome {
        ProbeOutcome::Ok { inbound: Snr(db), outbound: None }
    }

    #[test]
    fn test_mean_of_successes() {
        let mut history = SampleHistory::new();
        history.record(&ok(1.0));
        history.record(&ProbeOutcome::Failed(FailureStatus::RouteLost));
        history.record(&ok(3.0));

        assert_eq!(history.samples(), &[1.0, 3.0]);
        let summary = summarize(&history).unwrap();
        assert_eq!(format!("{:.2}", summary.inbound_mean.db()), "2.00");
        assert_eq!(summary.samples, 2);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.min, Snr(1.0));
        assert_eq!(summary.max, Snr(3.0));
        assert_eq!(summary.outbound_mean, None);
    }

    #[test]
    fn test_empty_history_has_no_summary() {
        let mut history = SampleHistory::new();
        history.record(&ProbeOutcome::Failed(FailureStatus::NotDirect));
        history.record(&ProbeOutcome::Failed(FailureStatus::NotDirect));

        assert!(summarize(&history).is_none());
        assert_eq!(history.failures().get(&FailureStatus::NotDirect), Some(&2));
        assert_eq!(history.attempts(), 2);
    }

    #[test]
    fn test_outbound_mean_only_over_reported_legs() {
        let mut history = SampleHistory::new();
        history.record(&ProbeOutcome::Ok { inbound: Snr(-7.0), outbound: Some(Snr(6.0)) });
        history.record(&ok(-5.0));

        let summary = summarize(&history).unwrap();
        assert_eq!(summary.outbound_mean, Some(Snr(6.0)));
        assert_eq!(summary.inbound_mean, Snr(-6.0));
    }

    #[test]
    fn test_summary_display() {
        let mut history = SampleHistory::new();
        history.record(&ProbeOutcome::Ok { inbound: Snr(-7.0), outbound: Some(Snr(6.25)) });

        let report = summarize(&history).unwrap().to_string();
        assert!(report.starts_with("--- Final Averages ---"));
        assert!(report.contains("Outbound: 6.25 dB"));
        assert!(report.contains("Inbound:  -7.00 dB"));
        assert!(report.contains("Samples:  1/1"));
    }
}
