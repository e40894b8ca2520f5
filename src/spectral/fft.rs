// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Single-direction FFT processing
//!
//! This module turns one interferogram segment into a single-beam magnitude
//! spectrum. The steps run in a fixed order, and reordering them changes
//! the numbers:
//!
//! 1. Remove the DC offset (subtract the mean)
//! 2. Multiply by the apodization window
//! 3. Zero-fill to `next_power_of_two(len) × zero_fill`
//! 4. Real-input FFT, keep the magnitude `|F|`
//! 5. Build the wavenumber axis from the laser wavenumber
//!
//! # Example
//!
//! ```
//! use ftir_reprocess::spectral::{Apodization, DirectionProcessor};
//!
//! let segment = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
//! let mut processor = DirectionProcessor::new(Apodization::Boxcar, 1);
//! let beam = processor.process(&segment, 15798.0).unwrap();
//!
//! assert_eq!(beam.wavenumbers.len(), 5);
//! assert!((beam.magnitudes[4] - 8.0).abs() < 1e-9);
//! ```

use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};

use super::axis::{next_power_of_two, wavenumber_axis};
use super::window::Apodization;
use super::SpectralError;
use crate::preprocessing::remove_mean;

/// Largest padded transform accepted by [`DirectionProcessor`] (2²⁸ points)
pub const MAX_TRANSFORM_LENGTH: usize = 1 << 28;

/// Magnitude spectrum of one interferogram segment
///
/// `wavenumbers` ascends from 0 and has the same length as `magnitudes`.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleBeam {
    /// Wavenumber of each bin in cm⁻¹
    pub wavenumbers: Vec<f64>,
    /// Non-negative magnitude of each bin
    pub magnitudes: Vec<f64>,
}

impl SingleBeam {
    /// Number of spectral bins
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

/// FFT-based processor for single scan directions
///
/// The processor keeps its FFT planner between calls so repeated segments
/// of the same length reuse the same plan.
pub struct DirectionProcessor {
    /// Window applied after DC removal
    apodization: Apodization,

    /// Zero-fill multiplier, at least 1
    zero_fill: usize,

    /// Planner caching real-to-complex plans by length
    planner: RealFftPlanner<f64>,
}

impl DirectionProcessor {
    /// Create a processor for the given window and zero-fill factor.
    ///
    /// Zero-fill values below 1 are clamped to 1.
    pub fn new(apodization: Apodization, zero_fill: i64) -> Self {
        Self {
            apodization,
            zero_fill: zero_fill.max(1) as usize,
            planner: RealFftPlanner::new(),
        }
    }

    pub fn apodization(&self) -> Apodization {
        self.apodization
    }

    /// Effective zero-fill multiplier after clamping
    pub fn zero_fill(&self) -> usize {
        self.zero_fill
    }

    /// Padded transform length for a segment of `segment_len` samples
    ///
    /// Fails with [`SpectralError::TransformTooLarge`] when the product
    /// overflows or exceeds [`MAX_TRANSFORM_LENGTH`].
    pub fn transform_length(&self, segment_len: usize) -> Result<usize, SpectralError> {
        next_power_of_two(segment_len)
            .checked_mul(self.zero_fill)
            .filter(|&nfft| nfft <= MAX_TRANSFORM_LENGTH)
            .ok_or(SpectralError::TransformTooLarge {
                segment_len,
                zero_fill: self.zero_fill,
            })
    }

    /// Process one segment into its single-beam spectrum.
    ///
    /// Empty and one-sample segments are padded to `zero_fill` points like
    /// any other segment, so they yield a degenerate spectrum rather than
    /// an error.
    ///
    /// ### Errors
    ///
    /// - [`SpectralError::InvalidLaserWavenumber`] if `lwn` is not a
    ///   positive finite number
    /// - [`SpectralError::TransformTooLarge`] if the padded length is out
    ///   of range
    pub fn process(&mut self, segment: &[f64], lwn: f64) -> Result<SingleBeam, SpectralError> {
        if !lwn.is_finite() || lwn <= 0.0 {
            return Err(SpectralError::InvalidLaserWavenumber(lwn));
        }

        // 1) DC removal on a working copy
        let mut data = segment.to_vec();
        remove_mean(&mut data);

        // 2) apodize
        let window = self.apodization.generate(data.len());
        for (sample, weight) in data.iter_mut().zip(&window) {
            *sample *= weight;
        }

        // 3) zero-fill, windowed data first
        let nfft = self.transform_length(data.len())?;
        let mut padded = vec![0.0; nfft];
        padded[..data.len()].copy_from_slice(&data);

        // 4) FFT magnitude
        let magnitudes = self.magnitude_spectrum(&mut padded)?;

        // 5) wavenumber axis
        let wavenumbers = wavenumber_axis(nfft, lwn);

        Ok(SingleBeam {
            wavenumbers,
            magnitudes,
        })
    }

    fn magnitude_spectrum(&mut self, padded: &mut [f64]) -> Result<Vec<f64>, SpectralError> {
        if padded.len() < 2 {
            // A one-point DFT is the sample itself
            return Ok(padded.iter().map(|x| x.abs()).collect());
        }

        let fft: Arc<dyn RealToComplex<f64>> = self.planner.plan_fft_forward(padded.len());
        let mut spectrum = fft.make_output_vec();
        fft.process(padded, &mut spectrum)
            .map_err(|e| SpectralError::Fft(e.to_string()))?;

        Ok(spectrum.iter().map(|c| c.norm()).collect())
    }
}

/// Process one segment with a fresh [`DirectionProcessor`].
pub fn process_direction(
    segment: &[f64],
    lwn: f64,
    zero_fill: i64,
    apodization: Apodization,
) -> Result<SingleBeam, SpectralError> {
    DirectionProcessor::new(apodization, zero_fill).process(segment, lwn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::num_complex::Complex;
    use rustfft::FftPlanner;

    fn test_signal(len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| {
                let t = n as f64;
                3.0 + (0.3 * t).sin() + 0.5 * (1.7 * t).cos() + 0.01 * t
            })
            .collect()
    }

    #[test]
    fn test_alternating_signal_peaks_at_nyquist_bin() {
        let segment = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let lwn = 15798.0;
        let beam = process_direction(&segment, lwn, 1, Apodization::Boxcar).unwrap();

        assert_eq!(beam.len(), 5);
        assert!((beam.magnitudes[4] - 8.0).abs() < 1e-9);
        for k in 0..4 {
            assert!(beam.magnitudes[k] < 1e-9, "bin {} = {}", k, beam.magnitudes[k]);
        }
        assert!((beam.wavenumbers[4] - lwn).abs() < 1e-9);
    }

    #[test]
    fn test_axis_length_follows_zero_fill() {
        for (len, zf) in [(5usize, 1i64), (5, 2), (8, 4), (100, 3), (1, 1), (7, 0), (7, -3)] {
            let beam = process_direction(&test_signal(len), 7000.0, zf, Apodization::Hann).unwrap();
            let nfft = next_power_of_two(len) * zf.max(1) as usize;
            assert_eq!(beam.wavenumbers.len(), nfft / 2 + 1);
            assert_eq!(beam.magnitudes.len(), nfft / 2 + 1);
        }
    }

    #[test]
    fn test_magnitudes_are_non_negative_and_dc_is_removed_for_boxcar() {
        let beam = process_direction(&test_signal(64), 7000.0, 1, Apodization::Boxcar).unwrap();
        assert!(beam.magnitudes.iter().all(|&m| m >= 0.0));
        // With a flat window the mean-free segment has no DC content
        assert!(beam.magnitudes[0] < 1e-9);
    }

    #[test]
    fn test_matches_full_complex_fft() {
        let segment = test_signal(50);
        let apod = Apodization::BlackmanHarris3;
        let zf = 2;
        let beam = process_direction(&segment, 7000.0, zf, apod).unwrap();

        // Reference: same preprocessing, full complex FFT
        let mean = segment.iter().sum::<f64>() / segment.len() as f64;
        let window = apod.generate(segment.len());
        let nfft = 128;
        let mut buffer = vec![Complex::new(0.0, 0.0); nfft];
        for (i, (&x, &w)) in segment.iter().zip(&window).enumerate() {
            buffer[i] = Complex::new((x - mean) * w, 0.0);
        }
        FftPlanner::new().plan_fft_forward(nfft).process(&mut buffer);

        assert_eq!(beam.magnitudes.len(), nfft / 2 + 1);
        for (k, &m) in beam.magnitudes.iter().enumerate() {
            let expected = buffer[k].norm();
            assert!(
                (m - expected).abs() < 1e-9 * expected.max(1.0),
                "bin {}: {} vs {}",
                k,
                m,
                expected
            );
        }
    }

    #[test]
    fn test_processor_reuses_plans_across_calls() {
        let mut processor = DirectionProcessor::new(Apodization::Hamming, 2);
        let a = processor.process(&test_signal(40), 7000.0).unwrap();
        let b = processor.process(&test_signal(40), 7000.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(processor.zero_fill(), 2);
        assert_eq!(processor.transform_length(40).unwrap(), 128);
    }

    #[test]
    fn test_empty_segment_gives_single_zero_bin() {
        let beam = process_direction(&[], 7000.0, 1, Apodization::Boxcar).unwrap();
        assert_eq!(beam.wavenumbers, vec![0.0]);
        assert_eq!(beam.magnitudes, vec![0.0]);

        // A lone sample is mean-free, so every padded bin is zero
        let beam = process_direction(&[3.5], 7000.0, 4, Apodization::Hann).unwrap();
        assert_eq!(beam.len(), 3);
        assert!(beam.magnitudes.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_oversized_zero_fill_errors() {
        for zf in [i64::MAX, (MAX_TRANSFORM_LENGTH as i64) + 1] {
            let res = process_direction(&[1.0, 2.0], 7000.0, zf, Apodization::Boxcar);
            assert!(
                matches!(res, Err(SpectralError::TransformTooLarge { segment_len: 2, .. })),
                "zf {} accepted",
                zf
            );
        }

        let processor = DirectionProcessor::new(Apodization::Boxcar, 2);
        assert_eq!(
            processor.transform_length(MAX_TRANSFORM_LENGTH / 2).unwrap(),
            MAX_TRANSFORM_LENGTH
        );
        assert!(processor.transform_length(MAX_TRANSFORM_LENGTH).is_err());
    }

    #[test]
    fn test_invalid_laser_wavenumber_errors() {
        for lwn in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let res = process_direction(&[1.0, 2.0], lwn, 1, Apodization::Boxcar);
            assert!(matches!(res, Err(SpectralError::InvalidLaserWavenumber(_))));
        }
    }
}
