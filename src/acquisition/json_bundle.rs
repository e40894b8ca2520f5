// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! JSON bundle adapter

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use super::{InterferogramBundle, InterferogramFile, InterferogramSource, SourceError};

/// Interferogram source reading one [`InterferogramBundle`] JSON document per file
///
/// The file extension is not checked, so exported instrument files keep
/// their original names.
#[derive(Debug, Clone, Default)]
pub struct JsonBundleSource;

impl JsonBundleSource {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse the bundle stored at `path`
    pub fn read_bundle(path: &Path) -> Result<InterferogramBundle, SourceError> {
        debug!("Reading interferogram bundle {}", path.display());
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write `bundle` to `path` as JSON
    pub fn write_bundle(path: &Path, bundle: &InterferogramBundle) -> Result<(), SourceError> {
        let file = File::create(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer(file, bundle).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl InterferogramSource for JsonBundleSource {
    fn open(&self, path: &Path) -> Result<Box<dyn InterferogramFile>, SourceError> {
        Ok(Box::new(Self::read_bundle(path)?))
    }
}
