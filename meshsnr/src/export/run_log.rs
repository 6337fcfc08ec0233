//! Run log → CSV conversion.
//!
//! A run log interleaves section headers with per-attempt lines:
//!
//! ```text
//! Checking on pepper...
//! [10:00:00] Trace 1/2: OK: -5.0dB
//! [10:15:00] Trace 2/2: FAILED (route lost or timed out)
//! Checking on salt...
//! [10:30:00] Trace 1/1: OK: 2.25dB (out: 4.0dB)
//! ```
//!
//! Each attempt line becomes one record tagged with the most recent section
//! name. Lines that are neither headers nor attempts are skipped.

use crate::domain::ConvertError;
use log::{debug, info};
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Column names of the CSV output, in order.
pub const CSV_HEADER: [&str; 3] = ["test_name", "timestamp", "SNR"];

/// Written in the SNR column when a line carried no value.
pub const NULL_TOKEN: &str = "null";

/// Name used for lines seen before any section header.
pub const UNKNOWN_TEST: &str = "unknown";

const SECTION_INTRO: &str = "Checking on ";
const SECTION_END: &str = "...";

static TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d{2}:\d{2}:\d{2})\]").expect("valid timestamp pattern"));

static SNR_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[:\s]([-+]?(?:\d+\.?\d*|\.\d+))dB").expect("valid SNR pattern")
});

/// One attempt line recovered from a run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub test_name: String,
    /// `HH:MM:SS` as logged
    pub timestamp: String,
    /// Decimal text as logged, `None` when the attempt had no value
    pub snr: Option<String>,
}

impl LogRecord {
    /// The SNR as a number.
    #[must_use]
    pub fn snr_value(&self) -> Option<f64> {
        self.snr.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Fold state: the section currently in effect plus everything emitted so far.
#[derive(Debug)]
struct LogFold {
    current_test: String,
    records: Vec<LogRecord>,
}

impl LogFold {
    fn new() -> Self {
        Self { current_test: UNKNOWN_TEST.to_string(), records: Vec::new() }
    }

    fn step(mut self, line: &str) -> Self {
        if let Some(name) = section_name(line) {
            self.current_test = name.to_string();
        } else if let Some(record) = attempt_record(line, &self.current_test) {
            self.records.push(record);
        }
        self
    }
}

/// Convert log lines into records, in order.
pub fn convert_lines<I, S>(lines: I) -> Vec<LogRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.into_iter().fold(LogFold::new(), |fold, line| fold.step(line.as_ref())).records
}

/// Name of the section a header line opens, e.g. `pepper` for `Checking on pepper...`.
fn section_name(line: &str) -> Option<&str> {
    let start = line.find(SECTION_INTRO)? + SECTION_INTRO.len();
    let rest = &line[start..];
    let end = rest.find(SECTION_END)?;
    Some(&rest[..end])
}

fn attempt_record(line: &str, test_name: &str) -> Option<LogRecord> {
    let caps = TIMESTAMP.captures(line)?;
    let stamp = caps.get(1)?;
    let whole = caps.get(0)?;

    let snr = SNR_VALUE
        .captures(&line[whole.end()..])
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    Some(LogRecord { test_name: test_name.to_string(), timestamp: stamp.as_str().to_string(), snr })
}

/// Write records as CSV with the fixed header.
pub fn write_csv<W: Write>(records: &[LogRecord], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.write_record([
            record.test_name.as_str(),
            record.timestamp.as_str(),
            record.snr.as_deref().unwrap_or(NULL_TOKEN),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Output path for a log: same location and stem, `.csv` extension.
#[must_use]
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

/// Convert the log at `input` into a CSV file beside it.
///
/// The input is read and the CSV rendered in memory before the output is
/// touched, so a failure leaves no partial file. Returns the output path and
/// record count.
pub fn convert_file(input: &Path) -> Result<(PathBuf, usize), ConvertError> {
    let text = std::fs::read_to_string(input)
        .map_err(|source| ConvertError::InputNotFound { path: input.to_path_buf(), source })?;

    let records = convert_lines(text.lines());
    debug!("{} record(s) recovered from {}", records.len(), input.display());

    let output = output_path(input);
    let mut rendered = Vec::new();
    write_csv(&records, &mut rendered)
        .map_err(|source| ConvertError::WriteFailed { path: output.clone(), source })?;
    std::fs::write(&output, rendered)?;

    info!("wrote {}", output.display());
    Ok((output, records.len()))
}
