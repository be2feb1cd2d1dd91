// ABOUTME: Core pose types and geometry for the formcoach workout engine
// ABOUTME: Foundation crate with landmark schema, pose frames, history, raster input, and clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Formcoach Core
//!
//! Foundation crate providing the data model consumed by the exercise engine.
//! Everything in here is pure and synchronous: no I/O, no global state.
//!
//! ## Modules
//!
//! - **landmarks**: The fixed 33-point body landmark schema and per-frame landmark sets
//! - **pose**: `PoseFrame` construction, visibility filtering, and body-relative normalization
//! - **geometry**: Distance, joint angle, and finite-difference velocity helpers
//! - **history**: Fixed-capacity rolling window of pose frames
//! - **raster**: Camera buffers converted to grayscale for the bar detector
//! - **clock**: Injectable time source for calibration windows, holds, and staleness

/// Core error types
pub mod errors;

/// Numeric constants organized by domain
pub mod constants;

/// Body landmark schema and landmark sets
pub mod landmarks;

/// Pose frame construction and normalization
pub mod pose;

/// Pure geometric helpers
pub mod geometry;

/// Rolling pose history buffer
pub mod history;

/// Grayscale raster frames
pub mod raster;

/// Time source abstraction
pub mod clock;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use errors::{CoreError, CoreResult};
pub use history::PoseHistory;
pub use landmarks::{Landmark, LandmarkName, LandmarkSet};
pub use pose::{ImageSize, PoseConfig, PoseFrame};
pub use image::GrayImage;
pub use raster::{gray_from_bgr, gray_from_luma, gray_from_rgb};
