// ABOUTME: Numeric constants for pose filtering, normalization, geometry, and buffering
// ABOUTME: Grouped by domain so thresholds are not scattered as magic numbers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Defaults and numeric floors shared by the core model and the engine.

/// Pose frame construction defaults
pub mod pose {
    /// Landmarks below this visibility are treated as absent
    pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.5;
    /// Normalization scale below this is replaced by `FALLBACK_SCALE`
    pub const MIN_NORMALIZATION_SCALE: f64 = 1e-5;
    /// Scale used when shoulder and hip widths are degenerate
    pub const FALLBACK_SCALE: f64 = 1.0;
}

/// Geometry numeric guards
pub mod geometry {
    /// Rays shorter than this make a joint angle undefined
    pub const DEGENERATE_RAY_LENGTH: f64 = 1e-6;
    /// Time deltas at or below this make a velocity unavailable
    pub const MIN_TIME_DELTA: f64 = 1e-6;
    /// Floor for body-scale reference lengths used as divisors
    pub const MIN_REFERENCE_LENGTH: f64 = 1e-5;
}

/// Pose history defaults
pub mod history {
    /// Default number of frames retained (about three seconds at 30 fps)
    pub const DEFAULT_CAPACITY: usize = 90;
}
