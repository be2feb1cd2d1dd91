// ABOUTME: Workout session controller owning history, calibrator, bar detector, and active counter
// ABOUTME: Processes one detection per frame and accumulates per-exercise rep totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Sessions
//!
//! A session holds exactly one active exercise counter plus one calibrator
//! and one bar detector, all mutated serially by [`WorkoutSession::process`].
//! Switching exercises discards the previous counter and its thresholds.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use formcoach_core::{GrayImage, ImageSize, Landmark, PoseFrame, PoseHistory, SharedClock};
use formcoach_engine::{
    BarDetector, CalibrationResult, EngineResult, ExerciseCatalog, ExerciseCounter, ExerciseState,
    PassiveCalibrator,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{ConfigError, SessionConfig};

/// Where the bar position for this frame comes from
#[derive(Debug, Clone, Copy)]
pub enum BarSource<'a> {
    /// No bar information this frame
    None,
    /// Run the bar detector on this grayscale frame
    Raster(&'a GrayImage),
    /// Externally supplied bar height as a fraction of frame height
    Position(f64),
}

/// One detector result
#[derive(Debug, Clone, Copy)]
pub struct Detection<'a> {
    /// Landmarks in schema order, or `None` when no pose was found
    pub landmarks: Option<&'a [Landmark]>,
    /// Capture time in seconds
    pub timestamp: f64,
    /// Source image dimensions
    pub image_size: ImageSize,
    /// Bar information for bar-relative exercises
    pub bar: BarSource<'a>,
}

/// Summary record produced when a session ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    /// Session identifier
    pub id: Uuid,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall-clock end
    pub ended_at: DateTime<Utc>,
    /// Elapsed session time in seconds, from the session clock
    pub duration_sec: f64,
    /// Reps per exercise id
    pub exercise_totals: BTreeMap<String, u32>,
}

/// Per-user workout session
#[derive(Debug)]
pub struct WorkoutSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    started_clock: f64,
    config: SessionConfig,
    clock: SharedClock,
    catalog: ExerciseCatalog,
    history: PoseHistory,
    calibrator: PassiveCalibrator,
    bar_detector: BarDetector,
    exercise_id: String,
    counter: Box<dyn ExerciseCounter>,
    last_rep_count: u32,
    exercise_totals: BTreeMap<String, u32>,
}

impl WorkoutSession {
    /// Start a session on `exercise_id`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid configuration or an exercise id
    /// missing from the catalog.
    pub fn new(
        config: SessionConfig,
        exercise_id: &str,
        clock: SharedClock,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = ExerciseCatalog::standard();
        let counter = catalog.build(exercise_id, clock.clone())?;
        let id = Uuid::new_v4();
        info!(session_id = %id, exercise = exercise_id, "Workout session started");

        Ok(Self {
            id,
            started_at: Utc::now(),
            started_clock: clock.now_seconds(),
            history: PoseHistory::new(config.history_capacity),
            calibrator: PassiveCalibrator::new(config.calibration.clone(), clock.clone()),
            bar_detector: BarDetector::new(config.bar.clone(), clock.clone()),
            config,
            clock,
            catalog,
            exercise_id: exercise_id.to_owned(),
            counter,
            last_rep_count: 0,
            exercise_totals: BTreeMap::new(),
        })
    }

    /// Process one detection and return the counter's snapshot
    pub fn process(&mut self, detection: &Detection<'_>) -> ExerciseState {
        let pose = PoseFrame::from_detection(
            detection.landmarks,
            detection.timestamp,
            detection.image_size,
            &self.config.pose,
        );

        if self.counter.requires_calibration() && !self.calibrator.is_complete() {
            if let Some(calibration) = self.calibrator.update(&pose) {
                self.counter.apply_calibration(&calibration);
            }
        }

        let bar_y = if self.counter.uses_bar() {
            match detection.bar {
                BarSource::None => None,
                BarSource::Raster(frame) => self.bar_detector.update(frame),
                BarSource::Position(y) => Some(y),
            }
        } else {
            None
        };

        let state = self.counter.update(&pose, bar_y);
        self.history.push(pose);

        let delta = state.rep_count.saturating_sub(self.last_rep_count);
        if delta > 0 {
            *self
                .exercise_totals
                .entry(self.exercise_id.clone())
                .or_insert(0) += delta;
        }
        self.last_rep_count = state.rep_count;
        state
    }

    /// Replace the active exercise with a fresh counter
    ///
    /// Calibration and bar tracking restart; totals already earned are kept.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownExercise` when `exercise_id` is not in the
    /// catalog. The current exercise stays active in that case.
    pub fn switch_exercise(&mut self, exercise_id: &str) -> EngineResult<()> {
        let counter = self.catalog.build(exercise_id, self.clock.clone())?;
        info!(from = %self.exercise_id, to = exercise_id, "Switching exercise");
        self.counter = counter;
        self.exercise_id = exercise_id.to_owned();
        self.restart_tracking();
        Ok(())
    }

    /// Reset the active counter to zero, keeping session totals
    pub fn reset_exercise(&mut self) {
        debug!(exercise = %self.exercise_id, "Resetting exercise");
        self.counter.reset();
        self.restart_tracking();
    }

    fn restart_tracking(&mut self) {
        self.last_rep_count = 0;
        self.calibrator.reset();
        self.bar_detector.reset();
        self.history.clear();
    }

    /// End the session and produce its log record
    #[must_use]
    pub fn finish(self) -> SessionLog {
        let duration_sec = (self.clock.now_seconds() - self.started_clock).max(0.0);
        let log = SessionLog {
            id: self.id,
            started_at: self.started_at,
            ended_at: Utc::now(),
            duration_sec,
            exercise_totals: self.exercise_totals,
        };
        info!(
            session_id = %log.id,
            duration_sec,
            totals = ?log.exercise_totals,
            "Workout session finished"
        );
        log
    }

    /// Session identifier
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Active exercise id
    #[must_use]
    pub fn exercise_id(&self) -> &str {
        &self.exercise_id
    }

    /// Active counter
    #[must_use]
    pub fn counter(&self) -> &dyn ExerciseCounter {
        self.counter.as_ref()
    }

    /// Recent pose frames
    #[must_use]
    pub const fn history(&self) -> &PoseHistory {
        &self.history
    }

    /// Calibration result for the active exercise, once available
    #[must_use]
    pub const fn calibration(&self) -> Option<CalibrationResult> {
        self.calibrator.result()
    }

    /// Reps per exercise id so far
    #[must_use]
    pub const fn exercise_totals(&self) -> &BTreeMap<String, u32> {
        &self.exercise_totals
    }

    /// Exercise catalog used by this session
    #[must_use]
    pub const fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }
}
