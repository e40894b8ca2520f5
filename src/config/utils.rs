// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! Validation rules that serde's type checks cannot express.

use anyhow::{Context, Result};
use log::{debug, warn};

use super::Config;
use crate::spectral::{Apodization, MAX_TRANSFORM_LENGTH};

/// Check if an extension is written with its leading dot (`.0`, `.json`)
pub fn is_valid_extension(ext: &str) -> bool {
    ext.len() > 1 && ext.starts_with('.') && !ext[1..].contains(&['.', '/', '\\'][..])
}

/// Validates the configuration against rules not covered by deserialization.
///
/// # Validation Rules
///
/// - **Apodization**: `processing.apod` must name a known window
/// - **Epsilon**: `processing.epsilon` must be finite and strictly positive
/// - **Zero-fill**: `processing.zero_fill` must not exceed the largest
///   transform length
/// - **Workers**: `batch.workers` must be at least 1
/// - **Extensions**: each entry of `batch.extensions` must start with a dot
///
/// A zero-fill factor below 1 is accepted and behaves as 1; it only logs a
/// warning.
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    config
        .processing
        .apod
        .parse::<Apodization>()
        .with_context(|| format!("Invalid apodization '{}'", config.processing.apod))?;

    let epsilon = config.processing.epsilon;
    if !epsilon.is_finite() || epsilon <= 0.0 {
        anyhow::bail!("Epsilon must be a positive finite number (got {})", epsilon);
    }

    let zero_fill = config.processing.zero_fill;
    if zero_fill > MAX_TRANSFORM_LENGTH as i64 {
        anyhow::bail!(
            "Zero-fill factor {} exceeds the largest transform length {}",
            zero_fill,
            MAX_TRANSFORM_LENGTH
        );
    }
    if zero_fill < 1 {
        warn!(
            "Zero-fill factor {} is below 1 and will be treated as 1",
            zero_fill
        );
    }

    if config.batch.workers == 0 {
        anyhow::bail!("Batch workers must be at least 1");
    }

    for ext in &config.batch.extensions {
        if !is_valid_extension(ext) {
            anyhow::bail!("Invalid file extension '{}': expected a form like '.0'", ext);
        }
    }

    Ok(())
}
