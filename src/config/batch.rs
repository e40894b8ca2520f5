// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Batch run configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Extensions picked up by default: numbered instrument files and JSON bundles
pub const DEFAULT_EXTENSIONS: [&str; 17] = [
    ".0", ".1", ".2", ".3", ".4", ".5", ".6", ".7", ".8", ".0001", ".0002", ".0003", ".0004",
    ".0005", ".0006", ".0007", ".json",
];

/// Settings of the batch harness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Directory scanned (non-recursively) for input files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Skip files already listed in the metrics ledger
    #[serde(default)]
    pub resume: bool,

    /// Accepted file extensions, leading dot included
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("Data")
}

fn default_workers() -> usize {
    6
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            workers: default_workers(),
            resume: false,
            extensions: default_extensions(),
        }
    }
}
