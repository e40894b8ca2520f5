// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Interferogram acquisition module
//!
//! This module defines the port through which the processing chain reads
//! instrument files, and the adapters shipped with the crate. The chain
//! only needs four things from a file: its calibration parameters, the
//! sample and reference interferograms, and the firmware's own absorbance
//! spectrum used for comparison.
//!
//! - [`JsonBundleSource`] reads one JSON document per file
//! - [`InMemorySource`] serves bundles registered in memory

mod json_bundle;
mod memory;
mod parameters;

pub use json_bundle::JsonBundleSource;
pub use memory::InMemorySource;
pub use parameters::{ParameterValue, Parameters};

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading an interferogram file
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Missing parameter '{0}'")]
    MissingParameter(String),

    #[error("Parameter '{key}' is not a number: {value}")]
    InvalidParameter { key: String, value: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No interferogram registered for {}", .0.display())]
    NotFound(PathBuf),

    #[error("Inconsistent data: {0}")]
    Inconsistent(String),
}

/// Firmware absorbance spectrum stored alongside the interferograms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSpectrum {
    pub wavenumbers: Vec<f64>,
    pub absorbance: Vec<f64>,
}

/// One opened instrument file
pub trait InterferogramFile: Send {
    /// Calibration and acquisition parameters (`lwn`, `lfq`, `hfq`, ...)
    fn parameters(&self) -> &Parameters;

    /// Raw sample interferogram
    fn sample_interferogram(&self) -> Result<Cow<'_, [f64]>, SourceError>;

    /// Raw reference (background) interferogram
    fn reference_interferogram(&self) -> Result<Cow<'_, [f64]>, SourceError>;

    /// Absorbance spectrum computed by the instrument
    fn reference_absorbance(&self) -> Result<Cow<'_, ReferenceSpectrum>, SourceError>;
}

/// Represents a source of interferogram files
pub trait InterferogramSource: Send + Sync {
    /// Open the file at `path`
    fn open(&self, path: &Path) -> Result<Box<dyn InterferogramFile>, SourceError>;
}

/// Everything the pipeline reads from one instrument file
///
/// This is also the on-disk layout read by [`JsonBundleSource`]:
///
/// ```json
/// {
///   "parameters": { "LWN": 15798.0, "LFQ": 400.0, "HFQ": 4000.0 },
///   "sample_interferogram": [0.01, 0.02],
///   "reference_interferogram": [0.01, 0.03],
///   "reference_absorbance": { "wavenumbers": [4000.0], "absorbance": [0.1] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterferogramBundle {
    #[serde(default)]
    pub parameters: Parameters,
    pub sample_interferogram: Vec<f64>,
    pub reference_interferogram: Vec<f64>,
    #[serde(default)]
    pub reference_absorbance: ReferenceSpectrum,
}

impl InterferogramFile for InterferogramBundle {
    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn sample_interferogram(&self) -> Result<Cow<'_, [f64]>, SourceError> {
        Ok(Cow::Borrowed(&self.sample_interferogram))
    }

    fn reference_interferogram(&self) -> Result<Cow<'_, [f64]>, SourceError> {
        Ok(Cow::Borrowed(&self.reference_interferogram))
    }

    fn reference_absorbance(&self) -> Result<Cow<'_, ReferenceSpectrum>, SourceError> {
        let spectrum = &self.reference_absorbance;
        if spectrum.wavenumbers.len() != spectrum.absorbance.len() {
            return Err(SourceError::Inconsistent(format!(
                "reference absorbance has {} wavenumbers but {} values",
                spectrum.wavenumbers.len(),
                spectrum.absorbance.len()
            )));
        }
        Ok(Cow::Borrowed(spectrum))
    }
}

/// Get the default interferogram source (JSON bundle files)
pub fn get_default_source() -> Box<dyn InterferogramSource> {
    Box::new(JsonBundleSource::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_rejects_ragged_reference_spectrum() {
        let bundle = InterferogramBundle {
            reference_absorbance: ReferenceSpectrum {
                wavenumbers: vec![1.0, 2.0],
                absorbance: vec![0.1],
            },
            ..Default::default()
        };
        assert!(matches!(
            bundle.reference_absorbance(),
            Err(SourceError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_bundle_serves_borrowed_data() {
        let bundle = InterferogramBundle {
            sample_interferogram: vec![1.0, 2.0],
            reference_interferogram: vec![3.0],
            ..Default::default()
        };
        assert_eq!(&*bundle.sample_interferogram().unwrap(), &[1.0, 2.0]);
        assert_eq!(&*bundle.reference_interferogram().unwrap(), &[3.0]);
        assert!(bundle.reference_absorbance().unwrap().wavenumbers.is_empty());
    }
}
