// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! Spectral analysis module
//!
//! This module handles the transform from interferogram to absorbance:
//! apodization windows, wavenumber axes, single-beam FFT processing of one
//! scan direction, bidirectional averaging and the sample/reference ratio.

pub mod absorbance;
pub mod axis;
pub mod bidirectional;
pub mod fft;
pub mod window;

pub use absorbance::{ratio_to_absorbance, AbsorbanceSpectrum, DEFAULT_EPSILON};
pub use axis::{next_power_of_two, optical_path_spacing, wavenumber_axis};
pub use bidirectional::{combine, BidirectionalSpectra};
pub use fft::{process_direction, DirectionProcessor, SingleBeam, MAX_TRANSFORM_LENGTH};
pub use window::{window_by_name, Apodization};

use thiserror::Error;

/// Errors raised by the spectral transform chain
#[derive(Debug, Error)]
pub enum SpectralError {
    #[error("Unknown apod/window name: {0}")]
    UnknownWindow(String),

    #[error("Invalid parameter for window '{name}': {reason}")]
    InvalidWindowParameter { name: String, reason: String },

    #[error("Laser wavenumber must be a positive finite number (got {0})")]
    InvalidLaserWavenumber(f64),

    #[error("Transform too large: {segment_len} samples with zero-fill {zero_fill}")]
    TransformTooLarge { segment_len: usize, zero_fill: usize },

    #[error("Length mismatch for {what}: {left} vs {right}")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("FFT failed: {0}")]
    Fft(String),
}
