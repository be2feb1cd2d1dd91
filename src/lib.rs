// ABOUTME: Main library entry point for the formcoach workout session layer
// ABOUTME: Wires pose frames, calibration, bar detection, and exercise counters into sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Formcoach
//!
//! Turns a stream of body-landmark detections into exercise rep counts and
//! real-time form feedback.
//!
//! ## Architecture
//!
//! - **formcoach-core**: landmark schema, pose frames, geometry, history, clock
//! - **formcoach-engine**: calibration, bar detection, exercise state machines, catalog
//! - **this crate**: session controller, environment configuration, logging,
//!   and JSON-lines replay used by the `formcoach-cli` binary
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use formcoach::config::SessionConfig;
//! use formcoach::session::{BarSource, Detection, WorkoutSession};
//! use formcoach_core::{ImageSize, SystemClock};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = SessionConfig::from_env()?;
//!     let mut session = WorkoutSession::new(config, "squat", SystemClock::shared())?;
//!
//!     let state = session.process(&Detection {
//!         landmarks: None,
//!         timestamp: 0.0,
//!         image_size: ImageSize::new(640, 480),
//!         bar: BarSource::None,
//!     });
//!     println!("{} reps, phase {}", state.rep_count, state.phase);
//!
//!     let log = session.finish();
//!     println!("{}", serde_json::to_string_pretty(&log)?);
//!     Ok(())
//! }
//! ```

/// Environment-driven session configuration
pub mod config;

/// Structured logging setup
pub mod logging;

/// Workout session controller and session log
pub mod session;

/// JSON-lines detection replay
pub mod replay;
