//! CLI argument definitions

use crate::link::{LinkConfig, DEFAULT_PROGRAM};
use crate::scheduler::ProbeConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "meshsnr",
    version,
    about = "Measure SNR to a direct Meshtastic neighbor with repeated traceroutes",
    after_help = "\
EXAMPLES:
    meshsnr probe '!ba4bf9d0'                       8 traces, 15 minutes apart
    meshsnr probe '!ba4bf9d0' -i 4 -m 1 -p COM3     4 traces, 1 minute apart, serial port
    meshsnr probe '!ba4bf9d0' | tee pepper.log      Keep a run log
    meshsnr convert pepper.log                      Write pepper.csv"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify the target is a direct neighbor, then trace it repeatedly
    Probe(ProbeArgs),
    /// Convert a run log into CSV (test_name, timestamp, SNR)
    Convert(ConvertArgs),
}

#[derive(clap::Args, Debug)]
pub struct ProbeArgs {
    /// Target node ID (e.g. '!ba4bf9d0')
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Number of traces
    #[arg(short, long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: u32,

    /// Minutes between traces
    #[arg(short, long, default_value_t = 15.0, value_parser = parse_minutes)]
    pub minutes: f64,

    /// Serial port of the local radio (e.g. /dev/ttyUSB0, COM3)
    #[arg(short, long)]
    pub port: Option<String>,

    /// Host of a network-connected local radio
    #[arg(long)]
    pub host: Option<String>,

    /// Client-side traceroute timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub trace_timeout: Option<u64>,

    /// Print the target's node table row as JSON
    #[arg(long)]
    pub info: bool,

    /// Only print the final averages
    #[arg(short, long)]
    pub quiet: bool,

    /// Radio client executable
    #[arg(long, env = "MESHSNR_MESHTASTIC", default_value = DEFAULT_PROGRAM)]
    pub meshtastic_bin: String,
}

impl ProbeArgs {
    #[must_use]
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            repeat: self.iterations,
            delay: Duration::try_from_secs_f64(self.minutes * 60.0).unwrap_or(Duration::ZERO),
            quiet: self.quiet,
        }
    }

    #[must_use]
    pub fn link_config(&self) -> LinkConfig {
        LinkConfig {
            program: self.meshtastic_bin.clone(),
            port: self.port.clone(),
            host: self.host.clone(),
            trace_timeout: self.trace_timeout,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Run log to convert; the CSV is written next to it
    #[arg(value_name = "LOG")]
    pub input: PathBuf,
}

fn parse_minutes(s: &str) -> Result<f64, String> {
    let minutes: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if minutes < 0.0 || Duration::try_from_secs_f64(minutes * 60.0).is_err() {
        return Err(format!("'{s}' must be a non-negative number of minutes"));
    }
    Ok(minutes)
}
