// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Append-only CSV ledgers of metrics rows

use std::collections::HashSet;
use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;

use crate::pipeline::FileSummary;

/// Longest error message kept in a ledger row, in characters
pub const MAX_ERROR_LEN: usize = 500;

/// Outcome of processing one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Ok,
    Fail,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Ok => write!(f, "OK"),
            RunStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// One ledger row
///
/// Field order is the column order of the CSV files. Numeric fields are
/// `None` on failed rows and serialize as blank cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub path: String,
    pub apod: String,
    pub zf: i64,
    pub status: RunStatus,
    pub error: String,
    pub lwn: Option<f64>,
    pub hfq: Option<f64>,
    pub lfq: Option<f64>,
    pub points: Option<usize>,
    #[serde(rename = "mean_dnu_cm-1")]
    pub mean_dnu: Option<f64>,
    #[serde(rename = "peak_cm-1")]
    pub peak_wavenumber: Option<f64>,
    #[serde(rename = "peak_A")]
    pub peak_absorbance: Option<f64>,
    #[serde(rename = "rms_vs_ref")]
    pub rms: Option<f64>,
    #[serde(rename = "mae_vs_ref")]
    pub mae: Option<f64>,
    #[serde(rename = "maxabs_vs_ref")]
    pub max_abs: Option<f64>,
}

impl MetricsRow {
    /// Row for a successfully processed file
    pub fn ok(path: impl Into<String>, apod: &str, zf: i64, summary: &FileSummary) -> Self {
        Self {
            path: path.into(),
            apod: apod.to_string(),
            zf,
            status: RunStatus::Ok,
            error: String::new(),
            lwn: Some(summary.lwn),
            hfq: Some(summary.hfq),
            lfq: Some(summary.lfq),
            points: Some(summary.points),
            mean_dnu: Some(summary.mean_spacing),
            peak_wavenumber: Some(summary.peak_wavenumber),
            peak_absorbance: Some(summary.peak_absorbance),
            rms: Some(summary.metrics.rms),
            mae: Some(summary.metrics.mae),
            max_abs: Some(summary.metrics.max_abs),
        }
    }

    /// Row for a file that could not be processed
    ///
    /// `error` is cut to [`MAX_ERROR_LEN`] characters.
    pub fn failed(path: impl Into<String>, apod: &str, zf: i64, error: &str) -> Self {
        Self {
            path: path.into(),
            apod: apod.to_string(),
            zf,
            status: RunStatus::Fail,
            error: error.chars().take(MAX_ERROR_LEN).collect(),
            lwn: None,
            hfq: None,
            lfq: None,
            points: None,
            mean_dnu: None,
            peak_wavenumber: None,
            peak_absorbance: None,
            rms: None,
            mae: None,
            max_abs: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RunStatus::Ok
    }
}

/// Append `row` to the ledger at `path`, writing the header if the file is new
pub fn append_row(path: &Path, row: &MetricsRow) -> Result<()> {
    let write_header = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open ledger {}", path.display()))?;

    let mut wtr = WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    wtr.serialize(row)
        .with_context(|| format!("Failed to append to ledger {}", path.display()))?;
    wtr.flush()?;
    Ok(())
}

/// Paths already recorded in the ledger at `path`
///
/// A missing ledger or one without a `path` column yields an empty set.
pub fn load_done_set(path: &Path) -> Result<HashSet<String>> {
    let mut done = HashSet::new();
    if !path.exists() {
        return Ok(done);
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open ledger {}", path.display()))?;
    let path_idx = match reader
        .headers()
        .context("reading ledger header")?
        .iter()
        .position(|h| h == "path")
    {
        Some(idx) => idx,
        None => return Ok(done),
    };

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Ledger row {row_no}"))?;
        if let Some(p) = record.get(path_idx) {
            done.insert(p.to_string());
        }
    }
    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::SpectrumMetrics;
    use tempfile::tempdir;

    fn summary() -> FileSummary {
        FileSummary {
            lwn: 15798.0,
            hfq: 4000.0,
            lfq: 400.0,
            points: 10,
            mean_spacing: 1.5,
            peak_wavenumber: 1000.0,
            peak_absorbance: 0.75,
            metrics: SpectrumMetrics {
                rms: 0.1,
                mae: 0.05,
                max_abs: 0.2,
            },
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("batch_metrics.csv");

        append_row(&ledger, &MetricsRow::ok("a.0", "b3", 2, &summary())).unwrap();
        append_row(&ledger, &MetricsRow::failed("b.0", "b3", 2, "boom")).unwrap();

        let content = std::fs::read_to_string(&ledger).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "path,apod,zf,status,error,lwn,hfq,lfq,points,mean_dnu_cm-1,peak_cm-1,peak_A,rms_vs_ref,mae_vs_ref,maxabs_vs_ref"
        );
        assert_eq!(lines[1], "a.0,b3,2,OK,,15798.0,4000.0,400.0,10,1.5,1000.0,0.75,0.1,0.05,0.2");
        assert_eq!(lines[2], "b.0,b3,2,FAIL,boom,,,,,,,,,,");
    }

    #[test]
    fn test_failed_row_truncates_error() {
        let long = "x".repeat(2 * MAX_ERROR_LEN);
        let row = MetricsRow::failed("a.0", "b3", 2, &long);
        assert_eq!(row.error.chars().count(), MAX_ERROR_LEN);
        assert_eq!(row.status, RunStatus::Fail);
        assert!(row.points.is_none() && row.rms.is_none());
    }

    #[test]
    fn test_load_done_set() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("batch_metrics.csv");
        assert!(load_done_set(&ledger).unwrap().is_empty());

        append_row(&ledger, &MetricsRow::ok("a.0", "b3", 2, &summary())).unwrap();
        append_row(&ledger, &MetricsRow::failed("b.0", "b3", 2, "boom")).unwrap();
        let done = load_done_set(&ledger).unwrap();
        assert_eq!(done.len(), 2);
        assert!(done.contains("a.0") && done.contains("b.0"));

        let other = dir.path().join("other.csv");
        std::fs::write(&other, "file,apod\na.0,b3\n").unwrap();
        assert!(load_done_set(&other).unwrap().is_empty());
    }
}
