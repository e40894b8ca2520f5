// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Ratio-to-absorbance conversion
//!
//! The sample single beam is divided by the reference single beam to obtain
//! transmittance, which is then converted to absorbance `A = -log10(T)`.
//! The result is ordered from high to low wavenumber and cropped to the
//! instrument band `[min(lfq, hfq), max(lfq, hfq)]`.
//!
//! Transmittance is floored at `epsilon` (NaN passes through unchanged)
//! but has no upper clamp: a sample
//! stronger than its reference yields negative absorbance. That behaviour
//! matches the firmware and is reported by
//! [`AbsorbanceSpectrum::negative_absorbance_count`].

use super::SpectralError;

/// Default floor for the reference spectrum and the transmittance
pub const DEFAULT_EPSILON: f64 = 1e-12;

/// Absorbance spectrum ordered by descending wavenumber
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AbsorbanceSpectrum {
    pub wavenumbers: Vec<f64>,
    pub absorbance: Vec<f64>,
    pub transmittance: Vec<f64>,
}

impl AbsorbanceSpectrum {
    pub fn len(&self) -> usize {
        self.wavenumbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavenumbers.is_empty()
    }

    /// Points whose transmittance exceeds 1
    pub fn negative_absorbance_count(&self) -> usize {
        self.absorbance.iter().filter(|&&a| a < 0.0).count()
    }
}

/// Convert sample and reference single beams to a cropped absorbance spectrum.
///
/// # Arguments
///
/// * `wavenumbers` - Axis shared by both single beams
/// * `sample` - Sample single-beam magnitudes
/// * `reference` - Reference single-beam magnitudes
/// * `hfq`, `lfq` - Band edges; their order does not matter
/// * `epsilon` - Floor applied to the reference and to the transmittance
///
/// # Example
///
/// ```
/// use ftir_reprocess::spectral::{ratio_to_absorbance, DEFAULT_EPSILON};
///
/// let axis = [0.0, 1.0, 2.0, 3.0];
/// let sample = [1.0, 0.1, 0.01, 1.0];
/// let reference = [1.0, 1.0, 1.0, 1.0];
/// let spectrum = ratio_to_absorbance(&axis, &sample, &reference, 1.0, 2.0, DEFAULT_EPSILON).unwrap();
///
/// assert_eq!(spectrum.wavenumbers, vec![2.0, 1.0]);
/// assert!((spectrum.absorbance[0] - 2.0).abs() < 1e-12);
/// ```
pub fn ratio_to_absorbance(
    wavenumbers: &[f64],
    sample: &[f64],
    reference: &[f64],
    hfq: f64,
    lfq: f64,
    epsilon: f64,
) -> Result<AbsorbanceSpectrum, SpectralError> {
    if sample.len() != wavenumbers.len() {
        return Err(SpectralError::LengthMismatch {
            what: "axis and sample spectrum",
            left: wavenumbers.len(),
            right: sample.len(),
        });
    }
    if reference.len() != wavenumbers.len() {
        return Err(SpectralError::LengthMismatch {
            what: "axis and reference spectrum",
            left: wavenumbers.len(),
            right: reference.len(),
        });
    }

    let low = hfq.min(lfq);
    let high = hfq.max(lfq);

    // Descending wavenumber order
    let mut order: Vec<usize> = (0..wavenumbers.len()).collect();
    order.sort_by(|&a, &b| wavenumbers[b].total_cmp(&wavenumbers[a]));

    let mut spectrum = AbsorbanceSpectrum::default();
    for i in order {
        let wn = wavenumbers[i];
        if !(wn >= low && wn <= high) {
            continue;
        }
        let floored_reference = floor(reference[i], epsilon);
        let transmittance = floor(sample[i] / floored_reference, epsilon);

        spectrum.wavenumbers.push(wn);
        spectrum.absorbance.push(-transmittance.log10());
        spectrum.transmittance.push(transmittance);
    }

    Ok(spectrum)
}

/// `value.max(epsilon)`, except that NaN stays NaN
fn floor(value: f64, epsilon: f64) -> f64 {
    if value.is_nan() {
        value
    } else {
        value.max(epsilon)
    }
}
