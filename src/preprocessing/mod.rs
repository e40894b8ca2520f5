// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//! Interferogram preprocessing module
//!
//! This module prepares raw interferograms before the transform,
//! including the bidirectional split and DC offset removal.

pub mod baseline;
pub mod split;

pub use baseline::{mean, remove_mean};
pub use split::split_bidirectional;
