//! JSON and CSV export of analysis reports.
//!
//! A report is written as one pretty-printed JSON document, so it can be
//! handed to a dashboard or archived next to the snapshot it came from.
//! The signal table alone can also be written as CSV for spreadsheets.
//!
//! # Usage
//!
//! ```ignore
//! use folioscope::persistence;
//! use std::path::Path;
//!
//! persistence::save_report(&report, Path::new("report.json")).unwrap();
//! let restored = persistence::load_report(Path::new("report.json")).unwrap();
//! ```

use std::io::{self, Write};
use std::path::Path;

use crate::pipeline::AnalysisReport;
use crate::rebalance::Signal;

/// Write a report to `path` as JSON, replacing any existing file.
pub fn save_report(report: &AnalysisReport, path: &Path) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).map_err(io::Error::other)?;
    writeln!(writer)?;
    writer.flush()
}

/// Read a report previously written by [`save_report`].
pub fn load_report(path: &Path) -> io::Result<AnalysisReport> {
    let file = std::fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Serialize a report to a JSON string.
pub fn to_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Write the signal table as CSV: `asset,current_pct,target_pct,action`.
pub fn write_signals_csv<W: Write>(signals: &[Signal], writer: W) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for signal in signals {
        wtr.serialize(signal).map_err(io::Error::other)?;
    }
    wtr.flush()
}

/// Write the signal table to `path` as CSV, replacing any existing file.
pub fn save_signals_csv(signals: &[Signal], path: &Path) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    write_signals_csv(signals, io::BufWriter::new(file))
}
