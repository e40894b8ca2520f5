// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! FTIR reprocessing library
//!
//! This library turns raw FTIR interferograms into absorbance spectra that
//! reproduce the instrument firmware output, and measures how closely they
//! match the firmware's own spectrum.
//!
//! The crate is organized around the processing chain:
//!
//! - [`acquisition`]: port for interferogram sources and the bundled adapters
//! - [`preprocessing`]: bidirectional split and baseline removal
//! - [`spectral`]: windows, wavenumber axes, single-beam transforms,
//!   bidirectional averaging and ratio-to-absorbance conversion
//! - [`metrics`]: comparison against a reference spectrum
//! - [`pipeline`]: per-file processing and single-file mode
//! - [`batch`]: worker pool and CSV ledgers for directories of files
//! - [`export`]: plot-ready series files
//! - [`config`]: YAML configuration

pub mod acquisition;
pub mod batch;
pub mod config;
pub mod export;
pub mod metrics;
pub mod pipeline;
pub mod preprocessing;
pub mod spectral;

pub use pipeline::{run_pipeline, PipelineOutput, ProcessingSettings};
