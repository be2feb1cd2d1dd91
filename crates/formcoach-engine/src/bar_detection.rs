// ABOUTME: Heuristic horizontal bar detection for pull-up and chin-up exercises
// ABOUTME: Row edge-strength peak in the upper frame, exponential smoothing, and a staleness window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Bar Detection
//!
//! A horizontal bar shows up as one row whose pixels differ sharply from the
//! row above it. Each row in the upper part of the frame is scored by the sum
//! of absolute luma differences against its predecessor; the strongest row is
//! accepted when it clearly dominates the average.
//!
//! Accepted rows are blended with the previous position to damp jitter. When a
//! frame yields no candidate, the last position survives for a short window
//! so that brief occlusion (a head passing the bar) does not drop the bar.

use crate::errors::{EngineError, EngineResult};
use formcoach_core::SharedClock;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bar detector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarDetectorConfig {
    /// Fraction of the frame height (from the top) that is searched
    pub roi_fraction: f64,
    /// Peak row score must exceed this multiple of the mean row score
    pub confidence_ratio: f64,
    /// Weight of the previous position when blending in a new candidate
    pub smoothing: f64,
    /// Seconds a position stays usable without a fresh detection
    pub max_age_seconds: f64,
}

impl Default for BarDetectorConfig {
    fn default() -> Self {
        Self {
            roi_fraction: 0.65,
            confidence_ratio: 1.6,
            smoothing: 0.7,
            max_age_seconds: 0.6,
        }
    }
}

impl BarDetectorConfig {
    /// Check ranges
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidConfig` when a field is outside its range.
    pub fn validate(&self) -> EngineResult<()> {
        if self.roi_fraction.is_nan() || self.roi_fraction <= 0.0 || self.roi_fraction > 1.0 {
            return Err(EngineError::invalid_config(
                "bar.roi_fraction",
                format!("must be in (0, 1], got {}", self.roi_fraction),
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(EngineError::invalid_config(
                "bar.smoothing",
                format!("must be in [0, 1), got {}", self.smoothing),
            ));
        }
        if self.confidence_ratio.is_nan() || self.confidence_ratio < 1.0 {
            return Err(EngineError::invalid_config(
                "bar.confidence_ratio",
                format!("must be at least 1, got {}", self.confidence_ratio),
            ));
        }
        if self.max_age_seconds.is_nan() || self.max_age_seconds < 0.0 {
            return Err(EngineError::invalid_config(
                "bar.max_age_seconds",
                format!("must not be negative, got {}", self.max_age_seconds),
            ));
        }
        Ok(())
    }
}

/// Stateful bar tracker
#[derive(Debug)]
pub struct BarDetector {
    config: BarDetectorConfig,
    clock: SharedClock,
    last_y: Option<f64>,
    last_seen: Option<f64>,
}

impl BarDetector {
    /// Create a detector reading time from `clock`
    #[must_use]
    pub fn new(config: BarDetectorConfig, clock: SharedClock) -> Self {
        Self {
            config,
            clock,
            last_y: None,
            last_seen: None,
        }
    }

    /// Process one frame and return the bar height as a fraction of frame height
    ///
    /// Returns `None` when nothing has been detected within the staleness window.
    pub fn update(&mut self, frame: &GrayImage) -> Option<f64> {
        let now = self.clock.now_seconds();

        if let Some(candidate) =
            detect_bar_row(frame, self.config.roi_fraction, self.config.confidence_ratio)
        {
            let smoothed = self.last_y.map_or(candidate, |prev| {
                prev.mul_add(self.config.smoothing, candidate * (1.0 - self.config.smoothing))
            });
            self.last_y = Some(smoothed);
            self.last_seen = Some(now);
            return Some(smoothed);
        }

        match (self.last_y, self.last_seen) {
            (Some(y), Some(seen)) if now - seen <= self.config.max_age_seconds => Some(y),
            (Some(_), Some(seen)) => {
                debug!(age = now - seen, "Bar position expired");
                None
            }
            _ => None,
        }
    }

    /// Last accepted position, regardless of age
    #[must_use]
    pub const fn last_position(&self) -> Option<f64> {
        self.last_y
    }

    /// Forget the tracked bar
    pub fn reset(&mut self) {
        self.last_y = None;
        self.last_seen = None;
    }
}

/// Stateless single-frame detection
///
/// Scores rows `1..roi` of the frame, where `roi = floor(height * roi_fraction)`,
/// and returns `row / height` for the strongest row if its score exceeds
/// `confidence_ratio` times the mean score.
#[must_use]
pub fn detect_bar_row(frame: &GrayImage, roi_fraction: f64, confidence_ratio: f64) -> Option<f64> {
    let (width, height) = (frame.width() as usize, frame.height() as usize);
    let roi = ((height as f64) * roi_fraction).floor() as usize;
    let roi = roi.min(height);
    if width == 0 || roi < 2 {
        return None;
    }

    let rows: Vec<&[u8]> = frame.as_raw().chunks_exact(width).take(roi).collect();
    let scores: Vec<(usize, u64)> = rows
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let [above, row] = pair else {
                return None;
            };
            let score = row
                .iter()
                .zip(*above)
                .map(|(a, b)| u64::from(a.abs_diff(*b)))
                .sum();
            Some((i + 1, score))
        })
        .collect();

    let (best_row, best_score) = scores
        .iter()
        .copied()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))?;
    let mean = scores.iter().map(|(_, s)| *s as f64).sum::<f64>() / scores.len() as f64;

    if best_score == 0 || (best_score as f64) <= confidence_ratio * mean {
        return None;
    }
    Some(best_row as f64 / height as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn step_frame(width: u32, height: u32, edge_row: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |_, y| Luma([if y >= edge_row { 220 } else { 20 }]))
    }

    #[test]
    fn test_single_edge_is_found() {
        let frame = step_frame(64, 100, 30);
        let y = detect_bar_row(&frame, 0.65, 1.6);
        assert_eq!(y, Some(0.30));
    }

    #[test]
    fn test_edge_below_roi_is_ignored() {
        let frame = step_frame(64, 100, 80);
        assert_eq!(detect_bar_row(&frame, 0.65, 1.6), None);
    }

    #[test]
    fn test_flat_and_empty_frames_have_no_bar() {
        let flat = GrayImage::from_pixel(8, 8, Luma([128]));
        assert_eq!(detect_bar_row(&flat, 0.65, 1.6), None);
        assert_eq!(detect_bar_row(&GrayImage::new(0, 0), 0.65, 1.6), None);
    }
}
