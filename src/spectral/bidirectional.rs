// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Bidirectional averaging of sample and reference interferograms

use log::debug;

use super::fft::{DirectionProcessor, SingleBeam};
use super::window::Apodization;
use super::SpectralError;
use crate::preprocessing::split_bidirectional;

/// Sample and reference single-beam spectra on a shared wavenumber axis
#[derive(Debug, Clone, PartialEq)]
pub struct BidirectionalSpectra {
    /// Axis of the sample forward direction, shared by all four transforms
    pub wavenumbers: Vec<f64>,
    /// Forward/backward average of the sample interferogram
    pub sample: Vec<f64>,
    /// Forward/backward average of the reference interferogram
    pub reference: Vec<f64>,
}

impl DirectionProcessor {
    /// Split `interferogram`, transform both directions and average their
    /// magnitudes. The returned axis is the forward one.
    pub fn process_bidirectional(
        &mut self,
        interferogram: &[f64],
        lwn: f64,
    ) -> Result<SingleBeam, SpectralError> {
        let (forward, backward) = split_bidirectional(interferogram);
        let fwd = self.process(&forward, lwn)?;
        let bwd = self.process(&backward, lwn)?;

        let magnitudes = fwd
            .magnitudes
            .iter()
            .zip(&bwd.magnitudes)
            .map(|(f, b)| 0.5 * (f + b))
            .collect();

        Ok(SingleBeam {
            wavenumbers: fwd.wavenumbers,
            magnitudes,
        })
    }
}

/// Compute the bidirectionally averaged single-beam spectra of a sample and
/// a reference interferogram.
///
/// Both interferograms must split to the same segment length so that all
/// four transforms share one axis; otherwise
/// [`SpectralError::LengthMismatch`] is returned.
pub fn combine(
    sample_ifg: &[f64],
    reference_ifg: &[f64],
    lwn: f64,
    zero_fill: i64,
    apodization: Apodization,
) -> Result<BidirectionalSpectra, SpectralError> {
    let mut processor = DirectionProcessor::new(apodization, zero_fill);

    let sample = processor.process_bidirectional(sample_ifg, lwn)?;
    let reference = processor.process_bidirectional(reference_ifg, lwn)?;

    if sample.len() != reference.len() {
        return Err(SpectralError::LengthMismatch {
            what: "sample and reference single beams",
            left: sample.len(),
            right: reference.len(),
        });
    }

    debug!(
        "Bidirectional spectra: {} bins, apod={}, zf={}",
        sample.len(),
        apodization,
        processor.zero_fill()
    );

    Ok(BidirectionalSpectra {
        wavenumbers: sample.wavenumbers,
        sample: sample.magnitudes,
        reference: reference.magnitudes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::process_direction;

    fn interferogram(len: usize, phase: f64) -> Vec<f64> {
        (0..len)
            .map(|n| {
                let t = n as f64;
                (0.21 * t + phase).cos() + 0.4 * (0.9 * t).sin() + 2.0
            })
            .collect()
    }

    #[test]
    fn test_average_of_forward_and_backward() {
        let ifg = interferogram(40, 0.3);
        let spectra = combine(&ifg, &ifg, 8000.0, 2, Apodization::BlackmanHarris3).unwrap();

        let (f, b) = split_bidirectional(&ifg);
        let fwd = process_direction(&f, 8000.0, 2, Apodization::BlackmanHarris3).unwrap();
        let bwd = process_direction(&b, 8000.0, 2, Apodization::BlackmanHarris3).unwrap();

        assert_eq!(spectra.wavenumbers, fwd.wavenumbers);
        for k in 0..spectra.sample.len() {
            assert_eq!(spectra.sample[k], 0.5 * (fwd.magnitudes[k] + bwd.magnitudes[k]));
        }
        assert_eq!(spectra.sample, spectra.reference);
    }

    #[test]
    fn test_shared_axis_length() {
        let sample = interferogram(101, 0.0);
        let reference = interferogram(101, 1.0);
        let spectra = combine(&sample, &reference, 8000.0, 1, Apodization::Hann).unwrap();
        // 101 splits into two segments of 50 samples, nfft = 64
        assert_eq!(spectra.wavenumbers.len(), 33);
        assert_eq!(spectra.sample.len(), 33);
        assert_eq!(spectra.reference.len(), 33);
    }

    #[test]
    fn test_mismatched_lengths_are_rejected() {
        let sample = interferogram(64, 0.0);
        let reference = interferogram(256, 0.0);
        let res = combine(&sample, &reference, 8000.0, 1, Apodization::Boxcar);
        assert!(matches!(res, Err(SpectralError::LengthMismatch { .. })));
    }

    #[test]
    fn test_too_short_interferogram_gives_single_bin() {
        for ifg in [&[1.0][..], &[][..]] {
            let spectra = combine(ifg, ifg, 8000.0, 1, Apodization::Boxcar).unwrap();
            assert_eq!(spectra.wavenumbers, vec![0.0]);
            assert_eq!(spectra.sample, vec![0.0]);
            assert_eq!(spectra.reference, vec![0.0]);
        }
    }
}
