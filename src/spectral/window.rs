// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Apodization windows
//!
//! Window functions are applied to each interferogram segment before the
//! FFT to control spectral leakage. A window is resolved once from its name
//! into an [`Apodization`] value and then generated for any length.
//!
//! # Supported names
//!
//! Names are trimmed and compared case-insensitively:
//!
//! | Family                  | Names                                                        |
//! |-------------------------|--------------------------------------------------------------|
//! | Boxcar                  | `boxcar`, `rect`, `rectangle`, `none`                        |
//! | Hann                    | `hann`, `hanning`                                            |
//! | Hamming                 | `hamming`                                                    |
//! | Blackman-Harris 3-term  | `b3`, `bh3`, `blackmanharris`, `blackman-harris`, `...3`     |
//! | Kaiser presets          | `kaiser`, `kaiser-weak`, `kaiser-medium`, `kaiser-strong`    |
//! | Kaiser with explicit β  | `kaiser6.5`, `kaiser-b6.5`, `kaiser_beta=6.5`                |
//! | Polynomial              | `poly2`, `poly-3`, `polynomial4`                             |
//!
//! # Example
//!
//! ```
//! use ftir_reprocess::spectral::window::Apodization;
//!
//! let apod: Apodization = "poly2".parse().unwrap();
//! let weights = apod.generate(5);
//! assert_eq!(weights[0], 0.0);
//! assert_eq!(weights[2], 1.0);
//! ```

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use super::SpectralError;

/// Coefficients of the 3-term Blackman-Harris window used by the instrument firmware.
pub const B3_COEFFICIENTS: [f64; 3] = [0.42323, 0.49755, 0.07922];

/// Kaiser β of the `kaiser-weak` preset
pub const KAISER_WEAK_BETA: f64 = 5.0;
/// Kaiser β of the `kaiser-medium` preset (also plain `kaiser`)
pub const KAISER_MEDIUM_BETA: f64 = 8.0;
/// Kaiser β of the `kaiser-strong` preset
pub const KAISER_STRONG_BETA: f64 = 12.0;

/// Window family with its typed parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Apodization {
    /// All-ones window
    Boxcar,
    /// Hann window (cosine-based)
    Hann,
    /// Hamming window
    Hamming,
    /// 3-term Blackman-Harris with [`B3_COEFFICIENTS`]
    BlackmanHarris3,
    /// Kaiser window with shape parameter β
    Kaiser { beta: f64 },
    /// `(1 - u²)^exponent` over `u` linearly spaced in `[-1, 1]`
    Polynomial { exponent: u32 },
}

impl Apodization {
    /// Generate the window weights for a segment of `n` samples.
    ///
    /// For `n <= 1` every family returns all ones of length `n`.
    pub fn generate(&self, n: usize) -> Vec<f64> {
        if n <= 1 {
            return vec![1.0; n];
        }

        match *self {
            Apodization::Boxcar => vec![1.0; n],
            Apodization::Hann => symmetric_cosine(n, 0.5, 0.5),
            Apodization::Hamming => symmetric_cosine(n, 0.54, 0.46),
            Apodization::BlackmanHarris3 => blackman_harris_3(n),
            Apodization::Kaiser { beta } => kaiser(n, beta),
            Apodization::Polynomial { exponent } => polynomial(n, exponent),
        }
    }
}

impl fmt::Display for Apodization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Apodization::Boxcar => write!(f, "boxcar"),
            Apodization::Hann => write!(f, "hann"),
            Apodization::Hamming => write!(f, "hamming"),
            Apodization::BlackmanHarris3 => write!(f, "b3"),
            Apodization::Kaiser { beta } => write!(f, "kaiser-b{}", beta),
            Apodization::Polynomial { exponent } => write!(f, "poly{}", exponent),
        }
    }
}

impl FromStr for Apodization {
    type Err = SpectralError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase();

        match normalized.as_str() {
            "boxcar" | "rect" | "rectangle" | "none" => return Ok(Apodization::Boxcar),
            "hann" | "hanning" => return Ok(Apodization::Hann),
            "hamming" => return Ok(Apodization::Hamming),
            "b3" | "bh3" | "blackmanharris" | "blackman-harris" | "blackmanharris3"
            | "blackman-harris3" => return Ok(Apodization::BlackmanHarris3),
            _ => {}
        }

        if let Some(rest) = normalized.strip_prefix("kaiser") {
            return parse_kaiser(name, rest);
        }

        if let Some(rest) = normalized
            .strip_prefix("polynomial")
            .or_else(|| normalized.strip_prefix("poly"))
        {
            return parse_polynomial(name, rest);
        }

        Err(SpectralError::UnknownWindow(name.to_string()))
    }
}

/// Generate the window named `name` for `n` samples.
///
/// Fails with [`SpectralError::UnknownWindow`] when the name matches no
/// family; there is no fallback window.
pub fn window_by_name(name: &str, n: usize) -> Result<Vec<f64>, SpectralError> {
    Ok(name.parse::<Apodization>()?.generate(n))
}

fn strip_separator(s: &str) -> &str {
    s.trim_start_matches(|c| matches!(c, '-' | '_' | ':' | '='))
}

fn parse_kaiser(name: &str, rest: &str) -> Result<Apodization, SpectralError> {
    let beta = match strip_separator(rest) {
        "" | "medium" | "med" => KAISER_MEDIUM_BETA,
        "weak" => KAISER_WEAK_BETA,
        "strong" => KAISER_STRONG_BETA,
        other => {
            let value = other
                .strip_prefix("beta")
                .or_else(|| other.strip_prefix('b'))
                .unwrap_or(other);
            strip_separator(value)
                .parse::<f64>()
                .map_err(|_| SpectralError::UnknownWindow(name.to_string()))?
        }
    };

    if !beta.is_finite() || beta < 0.0 {
        return Err(SpectralError::InvalidWindowParameter {
            name: name.to_string(),
            reason: format!("Kaiser beta must be finite and non-negative, got {}", beta),
        });
    }

    Ok(Apodization::Kaiser { beta })
}

fn parse_polynomial(name: &str, rest: &str) -> Result<Apodization, SpectralError> {
    let exponent = strip_separator(rest)
        .parse::<u32>()
        .map_err(|_| SpectralError::UnknownWindow(name.to_string()))?;
    Ok(Apodization::Polynomial { exponent })
}

/// Two-term symmetric cosine window written as `a + b·cos(π·m/(n-1))` with
/// `m = 1-n, 3-n, ..., n-1`, which is the usual Hann/Hamming form.
fn symmetric_cosine(n: usize, a: f64, b: f64) -> Vec<f64> {
    let last = (n - 1) as f64;
    (0..n)
        .map(|k| {
            let m = (2 * k) as f64 - last;
            a + b * (PI * m / last).cos()
        })
        .collect()
}

fn blackman_harris_3(n: usize) -> Vec<f64> {
    let [a0, a1, a2] = B3_COEFFICIENTS;
    let last = (n - 1) as f64;
    (0..n)
        .map(|k| {
            let k = k as f64;
            a0 - a1 * (2.0 * PI * k / last).cos() + a2 * (4.0 * PI * k / last).cos()
        })
        .collect()
}

fn kaiser(n: usize, beta: f64) -> Vec<f64> {
    let alpha = (n - 1) as f64 / 2.0;
    let i0_beta = bessel_i0(beta);
    (0..n)
        .map(|k| {
            let r = (k as f64 - alpha) / alpha;
            bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / i0_beta
        })
        .collect()
}

fn polynomial(n: usize, exponent: u32) -> Vec<f64> {
    let step = 2.0 / (n - 1) as f64;
    (0..n)
        .map(|k| {
            // Last point pinned to +1 like a linspace endpoint
            let u = if k == n - 1 { 1.0 } else { k as f64 * step - 1.0 };
            let base = 1.0 - u * u;
            if base < 0.0 {
                0.0
            } else {
                base.powf(f64::from(exponent))
            }
        })
        .collect()
}

/// Modified Bessel function of the first kind, order 0.
///
/// Power series `Σ ((x/2)^k / k!)²`, summed until the terms stop contributing.
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..1000 {
        let ratio = half / k as f64;
        term *= ratio * ratio;
        sum += term;
        if term <= sum * 1e-17 {
            break;
        }
    }
    sum
}
