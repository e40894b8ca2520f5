// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//! DC offset removal

/// Arithmetic mean of the samples, 0 for an empty slice
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Subtract the arithmetic mean from every sample in place
pub fn remove_mean(samples: &mut [f64]) {
    let offset = mean(samples);
    for sample in samples.iter_mut() {
        *sample -= offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_remove_mean_centers_signal() {
        let mut data = vec![1.0, 2.0, 3.0, 6.0];
        remove_mean(&mut data);
        assert_eq!(data, vec![-2.0, -1.0, 0.0, 3.0]);
        assert_relative_eq!(mean(&data), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_empty_slice_is_untouched() {
        let mut data: Vec<f64> = Vec::new();
        remove_mean(&mut data);
        assert!(data.is_empty());
        assert_eq!(mean(&data), 0.0);
    }
}
