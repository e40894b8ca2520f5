// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Wavenumber axis construction

/// Smallest power of two greater than or equal to `n` (1 for `n <= 1`).
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Optical path difference between two interferogram samples, `1 / (2·lwn)`.
pub fn optical_path_spacing(lwn: f64) -> f64 {
    1.0 / (2.0 * lwn)
}

/// Non-negative frequency bins of a real FFT of length `nfft`, expressed in
/// wavenumber units for a laser wavenumber `lwn`.
///
/// Returns `nfft / 2 + 1` ascending values starting at 0. `nfft` must be at
/// least 1.
pub fn wavenumber_axis(nfft: usize, lwn: f64) -> Vec<f64> {
    let step = 1.0 / (nfft as f64 * optical_path_spacing(lwn));
    (0..=nfft / 2).map(|k| k as f64 * step).collect()
}
