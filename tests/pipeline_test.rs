use std::path::Path;

use anyhow::Result;
use approx::assert_relative_eq;
use ftir_reprocess::acquisition::{
    InMemorySource, InterferogramBundle, InterferogramFile, InterferogramSource, Parameters,
    ReferenceSpectrum, SourceError,
};
use ftir_reprocess::batch::RunStatus;
use ftir_reprocess::pipeline::{process_one_file, run_file, run_pipeline, ProcessingSettings};
use tempfile::tempdir;

const LWN: f64 = 15798.0;

/// Bidirectional scan with one centre burst in each half
fn interferogram(len: usize) -> Vec<f64> {
    let forward_centre = len as f64 / 4.0;
    let backward_centre = 3.0 * len as f64 / 4.0;
    (0..len)
        .map(|i| {
            let t = i as f64;
            let burst = (-(t - forward_centre).powi(2) / 4000.0).exp()
                + (-(t - backward_centre).powi(2) / 4000.0).exp();
            burst * ((0.31 * t).cos() + 0.5 * (0.77 * t).cos()) + 0.05 * (0.013 * t).sin() + 1.0
        })
        .collect()
}

/// Bundle whose sample is half its reference, so every in-band point has
/// absorbance log10(2)
fn half_transmittance_bundle() -> InterferogramBundle {
    let reference = interferogram(2048);
    let sample: Vec<f64> = reference.iter().map(|x| 0.5 * x).collect();
    let wavenumbers: Vec<f64> = (0..=300).map(|k| 500.0 + 10.0 * k as f64).collect();
    let absorbance = vec![2f64.log10(); wavenumbers.len()];

    InterferogramBundle {
        parameters: Parameters::new()
            .with("LWN", LWN)
            .with("LFQ", 400.0)
            .with("HFQ", 4000.0),
        sample_interferogram: sample,
        reference_interferogram: reference,
        reference_absorbance: ReferenceSpectrum {
            wavenumbers,
            absorbance,
        },
    }
}

#[test]
fn test_identical_interferograms_give_zero_absorbance() -> Result<()> {
    let ifg = interferogram(2048);
    let bundle = InterferogramBundle {
        parameters: Parameters::new()
            .with("lwn", LWN)
            .with("lfq", 400.0)
            .with("hfq", 4000.0),
        sample_interferogram: ifg.clone(),
        reference_interferogram: ifg,
        reference_absorbance: ReferenceSpectrum {
            wavenumbers: vec![1000.0, 2000.0, 3000.0],
            absorbance: vec![0.0; 3],
        },
    };

    let settings = ProcessingSettings::new("b3", 2)?;
    let output = run_pipeline(&bundle, &settings)?;

    assert!(!output.spectrum.is_empty());
    assert!(output.spectrum.absorbance.iter().all(|a| *a == 0.0));
    assert_eq!(output.summary.metrics.rms, 0.0);
    assert_eq!(output.summary.metrics.mae, 0.0);
    assert_eq!(output.summary.metrics.max_abs, 0.0);
    Ok(())
}

#[test]
fn test_cropped_axis_matches_transform_geometry() -> Result<()> {
    let bundle = half_transmittance_bundle();
    let settings = ProcessingSettings::new("b3", 2)?;
    let output = run_pipeline(&bundle, &settings)?;

    // 1024-sample directions padded to 2048 points
    let spacing = 2.0 * LWN / 2048.0;
    let summary = &output.summary;
    assert_relative_eq!(summary.mean_spacing, spacing, epsilon = 1e-9);
    assert_eq!(
        summary.points,
        (0..=1024)
            .map(|k| k as f64 * spacing)
            .filter(|wn| (400.0..=4000.0).contains(wn))
            .count()
    );

    // Descending and inside the band
    let wn = &output.spectrum.wavenumbers;
    assert!(wn.windows(2).all(|w| w[0] > w[1]));
    assert!(wn[0] <= 4000.0 && *wn.last().unwrap() >= 400.0);

    assert_relative_eq!(summary.peak_absorbance, 2f64.log10(), epsilon = 1e-12);
    assert!(wn.contains(&summary.peak_wavenumber));
    assert!(summary.metrics.max_abs < 1e-12);
    Ok(())
}

#[test]
fn test_band_order_does_not_matter() -> Result<()> {
    let mut swapped = half_transmittance_bundle();
    swapped.parameters = Parameters::new()
        .with("LWN", LWN)
        .with("LFQ", 4000.0)
        .with("HFQ", 400.0);

    let settings = ProcessingSettings::new("hann", 1)?;
    let a = run_pipeline(&half_transmittance_bundle(), &settings)?;
    let b = run_pipeline(&swapped, &settings)?;
    assert_eq!(a.spectrum, b.spectrum);
    Ok(())
}

#[test]
fn test_missing_laser_wavenumber_gives_fail_row() {
    let mut bundle = half_transmittance_bundle();
    bundle.parameters = Parameters::new().with("LFQ", 400.0).with("HFQ", 4000.0);
    let source = InMemorySource::new().with("scan.0", bundle);

    let settings = ProcessingSettings::new("b3", 2).unwrap();
    let row = process_one_file(&source, Path::new("scan.0"), &settings);

    assert_eq!(row.status, RunStatus::Fail);
    assert!(row.error.contains("lwn"), "unexpected error: {}", row.error);
    assert_eq!(row.path, "scan.0");
    assert_eq!(row.apod, "b3");
    assert_eq!(row.zf, 2);
    assert!(row.lwn.is_none() && row.points.is_none() && row.rms.is_none());
}

#[test]
fn test_successful_row_carries_summary() {
    let source = InMemorySource::new().with("scan.0", half_transmittance_bundle());
    let settings = ProcessingSettings::new("kaiser-weak", 2).unwrap();
    let row = process_one_file(&source, Path::new("scan.0"), &settings);

    assert_eq!(row.status, RunStatus::Ok);
    assert!(row.error.is_empty());
    assert_eq!(row.lwn, Some(LWN));
    assert_eq!(row.apod, "kaiser-weak");
    assert!(row.points.unwrap() > 0);
}

#[test]
fn test_single_sample_interferogram_gives_ok_row_with_nan_metrics() {
    let mut bundle = half_transmittance_bundle();
    bundle.sample_interferogram = vec![1.0];
    bundle.reference_interferogram = vec![2.0];
    let source = InMemorySource::new().with("short.0", bundle);

    let settings = ProcessingSettings::new("b3", 2).unwrap();
    let row = process_one_file(&source, Path::new("short.0"), &settings);

    assert_eq!(row.status, RunStatus::Ok, "unexpected error: {}", row.error);
    assert_eq!(row.points, Some(0));
    assert!(row.mean_dnu.unwrap().is_nan());
    assert!(row.peak_wavenumber.unwrap().is_nan());
    assert!(row.rms.unwrap().is_nan());
    assert!(row.max_abs.unwrap().is_nan());
}

struct PanickingSource;

impl InterferogramSource for PanickingSource {
    fn open(&self, _path: &Path) -> Result<Box<dyn InterferogramFile>, SourceError> {
        panic!("decoder exploded");
    }
}

#[test]
fn test_panicking_source_gives_fail_row() {
    let settings = ProcessingSettings::new("b3", 2).unwrap();
    let row = process_one_file(&PanickingSource, Path::new("bad.0"), &settings);
    assert_eq!(row.status, RunStatus::Fail);
    assert!(row.error.contains("decoder exploded"));
}

#[test]
fn test_run_file_writes_series_and_metrics() -> Result<()> {
    let out = tempdir()?;
    let source = InMemorySource::new().with("scan.0", half_transmittance_bundle());
    let settings = ProcessingSettings::new("kaiser-strong", 2)?;

    let row = run_file(&source, Path::new("scan.0"), &settings, out.path())?;
    assert_eq!(row.status, RunStatus::Ok);

    let absorb = out.path().join("absorb_scan_apodkaiser_strong_zf2.csv");
    let compare = out.path().join("compare_scan_apodkaiser_strong_zf2.csv");
    let metrics = out.path().join("metrics_scan.csv");
    assert!(absorb.exists() && compare.exists() && metrics.exists());

    let absorb_content = std::fs::read_to_string(&absorb)?;
    assert_eq!(absorb_content.lines().next(), Some("wavenumber,absorbance"));
    assert_eq!(absorb_content.lines().count(), row.points.unwrap() + 1);

    let compare_content = std::fs::read_to_string(&compare)?;
    assert!(compare_content.lines().any(|l| l.starts_with("reference,")));

    // A second run appends without repeating the header
    run_file(&source, Path::new("scan.0"), &settings, out.path())?;
    let metrics_content = std::fs::read_to_string(&metrics)?;
    assert_eq!(metrics_content.lines().count(), 3);
    assert!(metrics_content.starts_with("path,apod,zf,status"));
    Ok(())
}

#[test]
fn test_run_file_propagates_errors() {
    let out = tempdir().unwrap();
    let source = InMemorySource::new();
    let settings = ProcessingSettings::new("b3", 2).unwrap();
    assert!(run_file(&source, Path::new("missing.0"), &settings, out.path()).is_err());
}
