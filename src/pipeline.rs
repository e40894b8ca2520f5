// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Per-file processing
//!
//! [`run_pipeline`] chains the spectral stages for one opened file:
//! bidirectional single beams, ratio to absorbance, then comparison with
//! the instrument's own spectrum. [`process_one_file`] wraps it for the
//! batch harness and never fails, while [`run_file`] is the single-file
//! mode that also writes the series files and a metrics CSV.

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, error, info, warn};

use crate::acquisition::{InterferogramFile, InterferogramSource, Parameters, ReferenceSpectrum};
use crate::batch::{append_row, MetricsRow};
use crate::export::{write_absorbance_series, write_comparison_series};
use crate::metrics::{evaluate, find_peak, mean_spacing, SpectrumMetrics};
use crate::spectral::{
    combine, ratio_to_absorbance, AbsorbanceSpectrum, Apodization, SpectralError,
    DEFAULT_EPSILON,
};

/// Processing choices shared by every file of a run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingSettings {
    /// Apodization name as given by the user, reported in outputs
    pub apod_name: String,
    pub apodization: Apodization,
    /// Zero-fill factor as given; values below 1 behave as 1
    pub zero_fill: i64,
    /// Floor for the reference spectrum and the transmittance
    pub epsilon: f64,
}

impl ProcessingSettings {
    /// Resolve `apod_name` and build settings with the default epsilon
    pub fn new(apod_name: &str, zero_fill: i64) -> Result<Self, SpectralError> {
        Ok(Self {
            apod_name: apod_name.to_string(),
            apodization: apod_name.parse()?,
            zero_fill,
            epsilon: DEFAULT_EPSILON,
        })
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Output file tag, e.g. `scan_apodkaiser_weak_zf2`
    pub fn tag(&self, stem: &str) -> String {
        format!(
            "{}_apod{}_zf{}",
            stem,
            self.apod_name.replace('-', "_"),
            self.zero_fill
        )
    }
}

/// Scalar results for one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub lwn: f64,
    pub hfq: f64,
    pub lfq: f64,
    /// Points in the cropped absorbance spectrum
    pub points: usize,
    pub mean_spacing: f64,
    pub peak_wavenumber: f64,
    pub peak_absorbance: f64,
    pub metrics: SpectrumMetrics,
}

/// Everything produced for one file
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub spectrum: AbsorbanceSpectrum,
    pub reference: ReferenceSpectrum,
    pub summary: FileSummary,
}

/// Run the spectral chain on one opened file
pub fn run_pipeline(
    file: &dyn InterferogramFile,
    settings: &ProcessingSettings,
) -> Result<PipelineOutput> {
    let params = file.parameters();
    let lwn = finite_parameter(params, "lwn")?;
    let lfq = finite_parameter(params, "lfq")?;
    let hfq = finite_parameter(params, "hfq")?;

    let sample = file
        .sample_interferogram()
        .context("reading sample interferogram")?;
    let reference = file
        .reference_interferogram()
        .context("reading reference interferogram")?;
    let reference_spectrum = file
        .reference_absorbance()
        .context("reading reference absorbance")?
        .into_owned();

    let beams = combine(
        &sample,
        &reference,
        lwn,
        settings.zero_fill,
        settings.apodization,
    )?;
    let spectrum = ratio_to_absorbance(
        &beams.wavenumbers,
        &beams.sample,
        &beams.reference,
        hfq,
        lfq,
        settings.epsilon,
    )?;

    let negative = spectrum.negative_absorbance_count();
    if negative > 0 {
        debug!(
            "{} of {} in-band points have transmittance above 1",
            negative,
            spectrum.len()
        );
    }

    let metrics = evaluate(
        &spectrum.wavenumbers,
        &spectrum.absorbance,
        &reference_spectrum.wavenumbers,
        &reference_spectrum.absorbance,
    );
    let (peak_wavenumber, peak_absorbance) = find_peak(&spectrum.wavenumbers, &spectrum.absorbance);

    let summary = FileSummary {
        lwn,
        hfq,
        lfq,
        points: spectrum.len(),
        mean_spacing: mean_spacing(&spectrum.wavenumbers),
        peak_wavenumber,
        peak_absorbance,
        metrics,
    };

    Ok(PipelineOutput {
        spectrum,
        reference: reference_spectrum,
        summary,
    })
}

/// Process the file at `path` into a ledger row
///
/// Errors and panics are caught and reported as a `FAIL` row.
pub fn process_one_file(
    source: &dyn InterferogramSource,
    path: &Path,
    settings: &ProcessingSettings,
) -> MetricsRow {
    let label = path.display().to_string();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<FileSummary> {
        let file = source
            .open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        Ok(run_pipeline(file.as_ref(), settings)?.summary)
    }));

    match outcome {
        Ok(Ok(summary)) => {
            MetricsRow::ok(label, &settings.apod_name, settings.zero_fill, &summary)
        }
        Ok(Err(err)) => {
            warn!("Failed to process {}: {:#}", label, err);
            MetricsRow::failed(
                label,
                &settings.apod_name,
                settings.zero_fill,
                &format!("{:#}", err),
            )
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("Panic while processing {}: {}", label, message);
            MetricsRow::failed(
                label,
                &settings.apod_name,
                settings.zero_fill,
                &format!("panic: {}", message),
            )
        }
    }
}

/// Single-file mode
///
/// Processes `path`, writes `absorb_<tag>.csv` and `compare_<tag>.csv` to
/// `out_dir` and appends the resulting row to `metrics_<stem>.csv`.
pub fn run_file(
    source: &dyn InterferogramSource,
    path: &Path,
    settings: &ProcessingSettings,
    out_dir: &Path,
) -> Result<MetricsRow> {
    let file = source
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let output = run_pipeline(file.as_ref(), settings)
        .with_context(|| format!("processing {}", path.display()))?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tag = settings.tag(&stem);

    write_absorbance_series(
        &out_dir.join(format!("absorb_{tag}.csv")),
        &output.spectrum.wavenumbers,
        &output.spectrum.absorbance,
    )?;
    write_comparison_series(
        &out_dir.join(format!("compare_{tag}.csv")),
        &output.spectrum.wavenumbers,
        &output.spectrum.absorbance,
        &output.reference.wavenumbers,
        &output.reference.absorbance,
    )?;

    let row = MetricsRow::ok(
        path.display().to_string(),
        &settings.apod_name,
        settings.zero_fill,
        &output.summary,
    );
    append_row(&out_dir.join(format!("metrics_{stem}.csv")), &row)?;

    info!("Processed {} ({} points)", path.display(), output.summary.points);
    Ok(row)
}

fn finite_parameter(params: &Parameters, key: &str) -> Result<f64> {
    let value = params.get_f64(key)?;
    if !value.is_finite() {
        bail!("Parameter '{}' is not finite: {}", key, value);
    }
    Ok(value)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
