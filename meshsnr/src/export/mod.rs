//! Run log export functionality
//!
//! This module turns the text printed by a live run back into structured
//! records. Currently supports CSV for spreadsheet and notebook analysis.

pub mod run_log;

pub use run_log::{convert_file, convert_lines, write_csv, LogRecord, CSV_HEADER};
