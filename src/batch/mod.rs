// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Batch processing of a directory of interferogram files
//!
//! Candidate files are queued and drained by a fixed pool of blocking
//! workers. Each worker turns a file into a [`MetricsRow`] and sends it to
//! the receiving task, which is the only writer of the ledgers:
//!
//! - `batch_metrics.csv` gets every row
//! - `batch_failures.csv` gets the `FAIL` rows as well
//!
//! With `resume` enabled, paths already present in the metrics ledger are
//! skipped, so an interrupted run can be restarted.

mod ledger;

pub use ledger::{append_row, load_done_set, MetricsRow, RunStatus, MAX_ERROR_LEN};

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use log::{debug, error, info};
use tokio::sync::mpsc;

use crate::acquisition::InterferogramSource;
use crate::config::{BatchConfig, OutputConfig};
use crate::pipeline::{process_one_file, ProcessingSettings};

/// Ledger receiving every processed row
pub const METRICS_LEDGER: &str = "batch_metrics.csv";
/// Ledger receiving failed rows only
pub const FAILURES_LEDGER: &str = "batch_failures.csv";
/// Completed files between two progress messages
pub const PROGRESS_INTERVAL: usize = 200;

/// Counters reported at the end of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Candidate files found in the data directory
    pub found: usize,
    /// Files skipped because the ledger already lists them
    pub skipped: usize,
    pub processed: usize,
    pub ok: usize,
    pub failed: usize,
}

/// Regular files directly inside `dir` whose extension is in `extensions`
///
/// Extensions include the leading dot (`.0`, `.json`). The result is sorted.
pub fn list_input_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read data directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension() else {
            continue;
        };
        let dotted = format!(".{}", ext.to_string_lossy());
        if extensions.iter().any(|e| *e == dotted) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Process every candidate file of `batch.data_dir`
///
/// Rows are appended to the ledgers in completion order. Per-file failures
/// never abort the run; only ledger I/O errors do.
pub async fn run_batch(
    source: Arc<dyn InterferogramSource>,
    settings: ProcessingSettings,
    batch: &BatchConfig,
    output: &OutputConfig,
) -> Result<BatchSummary> {
    fs::create_dir_all(&output.out_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            output.out_dir.display()
        )
    })?;
    let metrics_csv = output.out_dir.join(METRICS_LEDGER);
    let failures_csv = output.out_dir.join(FAILURES_LEDGER);

    let files = list_input_files(&batch.data_dir, &batch.extensions)?;
    info!(
        "Found {} candidate files in {}",
        files.len(),
        batch.data_dir.display()
    );

    let done = if batch.resume {
        let done = load_done_set(&metrics_csv)?;
        info!(
            "Resume enabled: {} already processed (from {})",
            done.len(),
            metrics_csv.display()
        );
        done
    } else {
        HashSet::new()
    };

    let todo: VecDeque<PathBuf> = files
        .iter()
        .filter(|p| !done.contains(&p.display().to_string()))
        .cloned()
        .collect();
    let total = todo.len();
    info!("To process: {} files", total);

    let mut summary = BatchSummary {
        found: files.len(),
        skipped: files.len() - total,
        ..Default::default()
    };

    let queue = Arc::new(Mutex::new(todo));
    let settings = Arc::new(settings);
    let (tx, mut rx) = mpsc::unbounded_channel::<MetricsRow>();

    let workers = batch.workers.max(1).min(total.max(1));
    debug!("Starting {} batch workers", workers);
    let mut handles = Vec::with_capacity(workers);
    for id in 0..workers {
        let queue = Arc::clone(&queue);
        let source = Arc::clone(&source);
        let settings = Arc::clone(&settings);
        let tx = tx.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            worker_loop(id, &queue, source.as_ref(), &settings, &tx)
        }));
    }
    // Only the workers hold senders now, so the loop below ends with them
    drop(tx);

    while let Some(row) = rx.recv().await {
        append_row(&metrics_csv, &row)?;
        summary.processed += 1;
        if row.is_ok() {
            summary.ok += 1;
        } else {
            summary.failed += 1;
            append_row(&failures_csv, &row)?;
        }

        if summary.processed % PROGRESS_INTERVAL == 0 {
            info!(
                "Progress: {}/{} | OK={} FAIL={}",
                summary.processed, total, summary.ok, summary.failed
            );
        }
    }

    for handle in handles {
        if let Err(e) = handle.await {
            error!("Batch worker terminated abnormally: {}", e);
        }
    }

    info!("Done. OK={} FAIL={}", summary.ok, summary.failed);
    info!("Metrics:  {}", metrics_csv.display());
    info!("Failures: {}", failures_csv.display());
    Ok(summary)
}

fn worker_loop(
    id: usize,
    queue: &Mutex<VecDeque<PathBuf>>,
    source: &dyn InterferogramSource,
    settings: &ProcessingSettings,
    tx: &mpsc::UnboundedSender<MetricsRow>,
) {
    loop {
        let next = match queue.lock() {
            Ok(mut q) => q.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        let Some(path) = next else {
            break;
        };

        let row = process_one_file(source, &path, settings);
        if tx.send(row).is_err() {
            debug!("Worker {}: receiver closed, stopping", id);
            break;
        }
    }
    debug!("Worker {} finished", id);
}
