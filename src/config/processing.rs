// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Spectral processing configuration
//!
//! This module defines the choices applied to every interferogram: the
//! apodization window, the zero-fill factor and the floor used when
//! dividing single beams.

use serde::{Deserialize, Serialize};

use crate::pipeline::ProcessingSettings;
use crate::spectral::{SpectralError, DEFAULT_EPSILON};

/// Configuration of the spectral transform.
///
/// # Example
///
/// ```
/// use ftir_reprocess::config::ProcessingConfig;
///
/// let processing = ProcessingConfig {
///     apod: "kaiser-medium".to_string(),
///     zero_fill: 4,
///     epsilon: 1e-12,
/// };
/// assert_eq!(processing.settings().unwrap().zero_fill, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Apodization window name (`b3`, `hann`, `kaiser-b6.5`, `poly2`, ...)
    #[serde(default = "default_apod")]
    pub apod: String,

    /// Zero-fill multiplier applied after padding to a power of two
    #[serde(default = "default_zero_fill")]
    pub zero_fill: i64,

    /// Floor for the reference single beam and the transmittance
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_apod() -> String {
    "b3".to_string()
}

fn default_zero_fill() -> i64 {
    2
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            apod: default_apod(),
            zero_fill: default_zero_fill(),
            epsilon: default_epsilon(),
        }
    }
}

impl ProcessingConfig {
    /// Resolve the window name and build the per-run settings
    pub fn settings(&self) -> Result<ProcessingSettings, SpectralError> {
        Ok(ProcessingSettings::new(&self.apod, self.zero_fill)?.with_epsilon(self.epsilon))
    }
}
