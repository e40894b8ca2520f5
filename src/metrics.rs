// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Accuracy metrics against a reference spectrum
//!
//! The processed absorbance is linearly interpolated onto the reference
//! axis and the residual `reference - interpolated` is summarized as RMS,
//! mean absolute error and maximum absolute error. Degenerate inputs give
//! NaN rather than an error so a metrics record can always be produced.

use serde::Serialize;

/// Deviation statistics of a processed spectrum against a reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectrumMetrics {
    pub rms: f64,
    pub mae: f64,
    pub max_abs: f64,
}

impl SpectrumMetrics {
    /// All three statistics set to NaN
    pub fn nan() -> Self {
        Self {
            rms: f64::NAN,
            mae: f64::NAN,
            max_abs: f64::NAN,
        }
    }
}

/// Compare a processed spectrum with a reference spectrum.
///
/// Either axis may be ascending or descending. Fewer than two processed
/// points, or an empty reference, yield [`SpectrumMetrics::nan`].
pub fn evaluate(
    axis_proc: &[f64],
    absorbance_proc: &[f64],
    axis_ref: &[f64],
    absorbance_ref: &[f64],
) -> SpectrumMetrics {
    if axis_proc.len() < 2 || axis_ref.is_empty() {
        return SpectrumMetrics::nan();
    }

    let (xp, fp) = ascending(axis_proc, absorbance_proc);
    let (x_ref, y_ref) = ascending(axis_ref, absorbance_ref);

    let interpolated = interpolate(&x_ref, &xp, &fp);
    let residuals: Vec<f64> = y_ref
        .iter()
        .zip(&interpolated)
        .map(|(r, i)| (r - i).abs())
        .collect();
    if residuals.is_empty() {
        return SpectrumMetrics::nan();
    }

    let n = residuals.len() as f64;
    let rms = (residuals.iter().map(|d| d * d).sum::<f64>() / n).sqrt();
    let mae = residuals.iter().sum::<f64>() / n;
    let max_abs = residuals.iter().fold(0.0_f64, |acc, &d| {
        if acc.is_nan() || d.is_nan() {
            f64::NAN
        } else {
            acc.max(d)
        }
    });

    SpectrumMetrics { rms, mae, max_abs }
}

/// Piecewise-linear interpolation of `(xp, fp)` at the points `x`.
///
/// `xp` must be ascending. Points outside `[xp[0], xp[last]]` take the
/// nearest endpoint value.
pub fn interpolate(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return vec![f64::NAN; x.len()];
    }
    let (xp, fp) = (&xp[..n], &fp[..n]);
    let last = n - 1;

    x.iter()
        .map(|&xi| {
            if xi.is_nan() {
                f64::NAN
            } else if xi <= xp[0] {
                fp[0]
            } else if xi >= xp[last] {
                fp[last]
            } else {
                // xp[j] <= xi < xp[j + 1]
                let j = xp.partition_point(|&v| v <= xi) - 1;
                let slope = (fp[j + 1] - fp[j]) / (xp[j + 1] - xp[j]);
                slope * (xi - xp[j]) + fp[j]
            }
        })
        .collect()
}

/// Mean absolute spacing between consecutive axis values (NaN below 2 points)
pub fn mean_spacing(axis: &[f64]) -> f64 {
    if axis.len() < 2 {
        return f64::NAN;
    }
    let total: f64 = axis.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    total / (axis.len() - 1) as f64
}

/// `(axis, value)` at the first maximum of `values` (NaN pair when empty)
pub fn find_peak(axis: &[f64], values: &[f64]) -> (f64, f64) {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate().take(axis.len()) {
        match best {
            Some((_, b)) if !(v > b) => {}
            _ => best = Some((i, v)),
        }
    }
    match best {
        Some((i, v)) => (axis[i], v),
        None => (f64::NAN, f64::NAN),
    }
}

fn ascending(axis: &[f64], values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = axis.len().min(values.len());
    let (axis, values) = (&axis[..n], &values[..n]);
    if n >= 2 && axis[0] > axis[n - 1] {
        (
            axis.iter().rev().copied().collect(),
            values.iter().rev().copied().collect(),
        )
    } else {
        (axis.to_vec(), values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_spectra_have_zero_error() {
        let axis: Vec<f64> = (0..100).rev().map(|k| 400.0 + k as f64 * 3.7).collect();
        let values: Vec<f64> = axis.iter().map(|x| (x / 50.0).sin()).collect();
        let m = evaluate(&axis, &values, &axis, &values);
        assert_eq!(m.rms, 0.0);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.max_abs, 0.0);
    }

    #[test]
    fn test_constant_offset() {
        let axis = [1.0, 2.0, 3.0, 4.0];
        let proc_values = [1.0, 1.0, 1.0, 1.0];
        let ref_values = [1.5, 0.5, 1.5, 0.5];
        let m = evaluate(&axis, &proc_values, &axis, &ref_values);
        assert_relative_eq!(m.rms, 0.5, epsilon = 1e-15);
        assert_relative_eq!(m.mae, 0.5, epsilon = 1e-15);
        assert_relative_eq!(m.max_abs, 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_descending_processed_against_ascending_reference() {
        let axis_proc = [30.0, 20.0, 10.0];
        let values_proc = [3.0, 2.0, 1.0];
        let axis_ref = [10.0, 15.0, 25.0];
        let values_ref = [1.0, 1.5, 2.5];
        let m = evaluate(&axis_proc, &values_proc, &axis_ref, &values_ref);
        assert_relative_eq!(m.max_abs, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_too_few_processed_points_gives_nan() {
        let m = evaluate(&[1.0], &[1.0], &[1.0, 2.0], &[1.0, 2.0]);
        assert!(m.rms.is_nan() && m.mae.is_nan() && m.max_abs.is_nan());
        let m = evaluate(&[1.0, 2.0], &[1.0, 2.0], &[], &[]);
        assert!(m.rms.is_nan());
    }

    #[test]
    fn test_interpolate_holds_endpoints() {
        let xp = [0.0, 1.0, 2.0];
        let fp = [0.0, 10.0, 40.0];
        let y = interpolate(&[-1.0, 0.0, 0.5, 1.0, 1.5, 2.0, 3.0], &xp, &fp);
        assert_eq!(y, vec![0.0, 0.0, 5.0, 10.0, 25.0, 40.0, 40.0]);

        // NaN queries stay NaN
        assert!(interpolate(&[f64::NAN], &xp, &fp)[0].is_nan());
    }

    #[test]
    fn test_mean_spacing() {
        assert!(mean_spacing(&[]).is_nan());
        assert!(mean_spacing(&[5.0]).is_nan());
        assert_relative_eq!(mean_spacing(&[10.0, 8.0, 4.0]), 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_find_peak_returns_first_maximum() {
        let axis = [400.0, 300.0, 200.0, 100.0];
        let values = [0.1, 0.9, 0.9, 0.2];
        assert_eq!(find_peak(&axis, &values), (300.0, 0.9));
        let (x, y) = find_peak(&[], &[]);
        assert!(x.is_nan() && y.is_nan());
    }
}
