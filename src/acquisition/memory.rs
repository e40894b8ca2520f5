// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! In-memory interferogram source

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{InterferogramBundle, InterferogramFile, InterferogramSource, SourceError};

/// Interferogram source backed by bundles registered in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    bundles: HashMap<PathBuf, InterferogramBundle>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bundle` under `path`, replacing any previous entry
    pub fn insert(&mut self, path: impl Into<PathBuf>, bundle: InterferogramBundle) {
        self.bundles.insert(path.into(), bundle);
    }

    /// Builder-style [`InMemorySource::insert`]
    pub fn with(mut self, path: impl Into<PathBuf>, bundle: InterferogramBundle) -> Self {
        self.insert(path, bundle);
        self
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl InterferogramSource for InMemorySource {
    fn open(&self, path: &Path) -> Result<Box<dyn InterferogramFile>, SourceError> {
        self.bundles
            .get(path)
            .cloned()
            .map(|bundle| Box::new(bundle) as Box<dyn InterferogramFile>)
            .ok_or_else(|| SourceError::NotFound(path.to_path_buf()))
    }
}
