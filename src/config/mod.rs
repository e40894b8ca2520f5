// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the reprocessing tool
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings. The configuration is backed by a YAML file; rules
//! that the types cannot express are checked by
//! [`utils::validate_specific_rules`].
//!
//! ## Configuration Structure
//!
//! - `processing`: apodization window, zero-fill factor and epsilon
//! - `batch`: data directory, worker count, resume flag and extensions
//! - `output`: directory receiving series files and ledgers
//!
//! ## Usage
//!
//! ```no_run
//! use ftir_reprocess::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some("hann".to_string()), // Apodization
//!     Some(4),                  // Zero-fill
//!     None,                     // Epsilon
//!     None,                     // Data directory
//!     None,                     // Output directory
//!     Some(8),                  // Workers
//!     true,                     // Resume
//! );
//!
//! println!("Window: {}", config.processing.apod);
//! ```

pub mod batch;
pub mod output;
pub mod processing;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

pub use batch::{BatchConfig, DEFAULT_EXTENSIONS};
pub use output::OutputConfig;
pub use processing::ProcessingConfig;
pub use utils::{is_valid_extension, validate_specific_rules};

/// Root configuration structure.
///
/// Every section falls back to its defaults when missing from the file, so
/// an empty YAML document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Spectral transform settings shared by every file.
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Batch harness settings.
    #[serde(default)]
    pub batch: BatchConfig,

    /// Output location for series files and ledgers.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Creating sample configuration file at {:?}", sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with the default values. A file that fails
    /// to parse or validate leaves a `<name>.sample.yaml` next to it and
    /// returns the error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        let config: Config = match serde_yml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = config.validate() {
            error!("Configuration specific validation error: {:#}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Check the rules that deserialization alone cannot enforce
    pub fn validate(&self) -> Result<()> {
        validate_specific_rules(self)
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only values explicitly provided override the existing configuration;
    /// `resume` can only switch resuming on.
    ///
    /// # Parameters
    ///
    /// * `apod` - Apodization window name
    /// * `zero_fill` - Zero-fill factor
    /// * `epsilon` - Floor for the reference single beam and the transmittance
    /// * `data_dir` - Directory scanned by the batch harness
    /// * `out_dir` - Directory receiving series files and ledgers
    /// * `workers` - Number of batch workers
    /// * `resume` - Skip files already in the metrics ledger
    #[allow(clippy::too_many_arguments)]
    pub fn apply_args(
        &mut self,
        apod: Option<String>,
        zero_fill: Option<i64>,
        epsilon: Option<f64>,
        data_dir: Option<PathBuf>,
        out_dir: Option<PathBuf>,
        workers: Option<usize>,
        resume: bool,
    ) {
        if let Some(apod) = apod {
            debug!("Overriding apodization from command line: {}", apod);
            self.processing.apod = apod;
        }
        if let Some(zf) = zero_fill {
            debug!("Overriding zero-fill from command line: {}", zf);
            self.processing.zero_fill = zf;
        }
        if let Some(eps) = epsilon {
            debug!("Overriding epsilon from command line: {}", eps);
            self.processing.epsilon = eps;
        }

        if let Some(dir) = data_dir {
            debug!("Overriding data directory from command line: {:?}", dir);
            self.batch.data_dir = dir;
        }
        if let Some(dir) = out_dir {
            debug!("Overriding output directory from command line: {:?}", dir);
            self.output.out_dir = dir;
        }
        if let Some(n) = workers {
            debug!("Overriding workers from command line: {}", n);
            self.batch.workers = n;
        }
        if resume {
            self.batch.resume = true;
        }
    }
}
