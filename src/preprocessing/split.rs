// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//! Bidirectional interferogram split
//!
//! A bidirectional scan records the forward sweep followed by the backward
//! sweep. The split happens at the midpoint and the backward half is
//! reversed so that both segments run in the same optical direction.

/// Split an interferogram into `(forward, backward)` segments.
///
/// `forward` is `x[..len/2]`, `backward` is `x[len/2..]` reversed; both are
/// truncated to the shorter length so they always match.
///
/// # Example
///
/// ```
/// use ftir_reprocess::preprocessing::split_bidirectional;
///
/// let (forward, backward) = split_bidirectional(&[1.0, 2.0, 3.0, 4.0, 5.0]);
/// assert_eq!(forward, vec![1.0, 2.0]);
/// assert_eq!(backward, vec![5.0, 4.0]);
/// ```
pub fn split_bidirectional(x: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mid = x.len() / 2;
    let (head, tail) = x.split_at(mid);
    let len = head.len().min(tail.len());

    let forward = head[..len].to_vec();
    let backward = tail.iter().rev().take(len).copied().collect();
    (forward, backward)
}
