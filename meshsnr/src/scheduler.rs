//! Timed traceroute repetitions against a verified neighbor.
//!
//! Probes run strictly one after another: two traceroutes in flight on the
//! same channel would interfere with each other's readings.

use crate::analysis::SampleHistory;
use crate::domain::{FailureStatus, NodeId, ProbeOutcome};
use crate::link::RadioLink;
use crate::route;
use chrono::Local;
use log::{info, warn};
use std::io::Write;
use std::time::Duration;

/// Wall-clock format used to tag each attempt line.
pub const STAMP_FORMAT: &str = "%H:%M:%S";

/// Pause between attempts.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Repetition settings for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeConfig {
    /// Number of attempts; treated as at least one
    pub repeat: u32,
    /// Pause after every attempt except the last
    pub delay: Duration,
    /// Suppress the per-attempt lines
    pub quiet: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { repeat: 8, delay: Duration::from_secs(15 * 60), quiet: false }
    }
}

/// Runs the attempts and collects their samples.
#[derive(Debug)]
pub struct ProbeScheduler<'a, L, S> {
    link: &'a L,
    sleeper: S,
    config: ProbeConfig,
}

impl<'a, L: RadioLink, S: Sleeper> ProbeScheduler<'a, L, S> {
    pub fn new(link: &'a L, sleeper: S, config: ProbeConfig) -> Self {
        Self { link, sleeper, config }
    }

    /// Probe `target` the configured number of times.
    ///
    /// Failed attempts are counted in the returned history and never stop the
    /// run. Only a failure to write the report lines is returned as an error.
    pub async fn run<W: Write>(
        &self,
        target: &NodeId,
        out: &mut W,
    ) -> std::io::Result<SampleHistory> {
        let total = self.config.repeat.max(1);
        let mut history = SampleHistory::new();

        info!("starting {total} traceroute(s) to {target}, {:?} apart", self.config.delay);

        for attempt in 1..=total {
            let stamp = Local::now().format(STAMP_FORMAT).to_string();
            let outcome = route::classify(self.link.traceroute(target).await);

            if outcome == ProbeOutcome::Failed(FailureStatus::NotDirect) {
                warn!("{target} is listed as direct but the return route was relayed");
            }
            history.record(&outcome);

            if !self.config.quiet {
                writeln!(out, "[{stamp}] Trace {attempt}/{total}: {outcome}")?;
                out.flush()?;
            }

            if attempt < total {
                self.sleeper.sleep(self.config.delay).await;
            }
        }

        Ok(history)
    }
}
