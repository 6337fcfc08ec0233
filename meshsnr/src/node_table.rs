//! Node table parsing.
//!
//! `meshtastic --nodes` prints a box-drawn table whose columns vary between
//! firmware and CLI releases:
//!
//! ```text
//! ╒════╤══════════════╤═══════════╤═══════╤════════╕
//! │  N │ User         │ ID        │   SNR │   Hops │
//! ╞════╪══════════════╪═══════════╪═══════╪════════╡
//! │  1 │ Pepper Hill  │ !ba4bf9d0 │  6.25 │      0 │
//! ╘════╧══════════════╧═══════════╧═══════╧════════╛
//! ```
//!
//! Column names are therefore taken from the header row at parse time rather
//! than fixed in advance. The scan is a fold over lines with three states:
//! waiting for the header, waiting for a matching data row, done.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Column separators accepted in header and data rows.
const SEPARATORS: [char; 2] = ['│', '|'];

/// Markers that identify the header row.
const HEADER_MARKERS: [&str; 2] = ["User", "ID"];

/// One row of the node table, keyed by the header's column names.
///
/// Field order follows the header, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeRecord {
    fields: Vec<(String, String)>,
}

impl NodeRecord {
    /// Value of `column`, if the row had a cell under it.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.iter().find(|(name, _)| name == column).map(|(_, value)| value.as_str())
    }

    /// Column names in header order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for NodeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Scanner state while folding over the table lines.
#[derive(Debug)]
enum ScanState<'a> {
    AwaitingHeader,
    AwaitingData { header: &'a str, columns: Vec<String> },
    Done(NodeRecord),
}

/// Find the first row whose text contains `search` (case-insensitive).
///
/// Returns `None` when the table has no header row or no row matches.
/// Later rows matching the same term are ignored.
#[must_use]
pub fn find_node(table: &str, search: &str) -> Option<NodeRecord> {
    let needle = search.to_lowercase();

    let state = table
        .lines()
        .fold(ScanState::AwaitingHeader, |state, line| step(state, line, &needle));

    match state {
        ScanState::Done(record) => Some(record),
        ScanState::AwaitingHeader | ScanState::AwaitingData { .. } => None,
    }
}

fn step<'a>(state: ScanState<'a>, line: &'a str, needle: &str) -> ScanState<'a> {
    match state {
        ScanState::AwaitingHeader if is_header(line) => {
            ScanState::AwaitingData { header: line, columns: split_cells(line) }
        }
        ScanState::AwaitingData { header, columns }
            if is_data_row(line, header) && line.to_lowercase().contains(needle) =>
        {
            ScanState::Done(zip_row(&columns, line))
        }
        other => other,
    }
}

fn is_header(line: &str) -> bool {
    HEADER_MARKERS.iter().all(|marker| line.contains(marker))
}

fn is_data_row(line: &str, header: &str) -> bool {
    line.trim_start().starts_with(SEPARATORS) && line.contains(SEPARATORS) && line != header
}

/// Split a row on the separators, trimming cells and dropping empty fragments.
fn split_cells(line: &str) -> Vec<String> {
    line.split(SEPARATORS)
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

fn zip_row(columns: &[String], line: &str) -> NodeRecord {
    let fields = columns.iter().cloned().zip(split_cells(line)).collect();
    NodeRecord { fields }
}
