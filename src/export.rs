// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Plot-ready series files
//!
//! Curves are written as CSV so any plotting tool can render them. Both
//! writers emit points in descending wavenumber order, the usual
//! orientation of an infrared spectrum.

use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use log::debug;

/// Write a single absorbance curve as `wavenumber,absorbance`
pub fn write_absorbance_series(path: &Path, wavenumbers: &[f64], absorbance: &[f64]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record(["wavenumber", "absorbance"])?;
    for (wn, a) in descending(wavenumbers, absorbance) {
        wtr.write_record([wn.to_string(), a.to_string()])?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!("Wrote absorbance series to {}", path.display());
    Ok(())
}

/// Write the processed and reference curves as `source,wavenumber,absorbance`
///
/// Rows of the processed curve come first, tagged `processed`, followed by
/// the reference curve tagged `reference`.
pub fn write_comparison_series(
    path: &Path,
    processed_wavenumbers: &[f64],
    processed_absorbance: &[f64],
    reference_wavenumbers: &[f64],
    reference_absorbance: &[f64],
) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record(["source", "wavenumber", "absorbance"])?;
    let curves = [
        ("processed", processed_wavenumbers, processed_absorbance),
        ("reference", reference_wavenumbers, reference_absorbance),
    ];
    for (label, axis, values) in curves {
        for (wn, a) in descending(axis, values) {
            wtr.write_record([label.to_string(), wn.to_string(), a.to_string()])?;
        }
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!("Wrote comparison series to {}", path.display());
    Ok(())
}

/// Pairs of `(axis, value)`, reversed when the axis ascends
fn descending<'a>(axis: &'a [f64], values: &'a [f64]) -> Box<dyn Iterator<Item = (f64, f64)> + 'a> {
    let pairs = axis.iter().copied().zip(values.iter().copied());
    match (axis.first(), axis.last()) {
        (Some(first), Some(last)) if first < last => Box::new(pairs.rev()),
        _ => Box::new(pairs),
    }
}
