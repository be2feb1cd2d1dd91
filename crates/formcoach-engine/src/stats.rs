// ABOUTME: Robust statistics used by calibration windows
// ABOUTME: Median over sample collections, tolerant of a few glitched frames
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Median of `values`, averaging the two middle elements for even lengths
///
/// Returns `None` for an empty slice. NaN samples sort last via `total_cmp`.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
