// ABOUTME: Session configuration loaded from FORMCOACH_* environment variables
// ABOUTME: Parse-or-default overrides on component defaults, followed by range validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration for workout sessions

use std::env;
use std::str::FromStr;

use formcoach_core::constants::history::DEFAULT_CAPACITY;
use formcoach_core::PoseConfig;
use formcoach_engine::{BarDetectorConfig, CalibrationConfig, EngineError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Environment variable names
pub mod env_vars {
    /// Minimum landmark visibility kept by pose frames
    pub const VISIBILITY_THRESHOLD: &str = "FORMCOACH_VISIBILITY_THRESHOLD";
    /// Frames retained by the pose history
    pub const HISTORY_CAPACITY: &str = "FORMCOACH_HISTORY_CAPACITY";
    /// Calibration window in seconds
    pub const CALIBRATION_SECONDS: &str = "FORMCOACH_CALIBRATION_SECONDS";
    /// Fewest calibration samples accepted
    pub const CALIBRATION_MIN_SAMPLES: &str = "FORMCOACH_CALIBRATION_MIN_SAMPLES";
    /// Fraction of the frame searched for a bar
    pub const BAR_ROI_FRACTION: &str = "FORMCOACH_BAR_ROI_FRACTION";
    /// Peak-to-mean ratio a bar row must exceed
    pub const BAR_CONFIDENCE_RATIO: &str = "FORMCOACH_BAR_CONFIDENCE_RATIO";
    /// Bar position smoothing weight
    pub const BAR_SMOOTHING: &str = "FORMCOACH_BAR_SMOOTHING";
    /// Seconds a bar position survives without detection
    pub const BAR_MAX_AGE_SECONDS: &str = "FORMCOACH_BAR_MAX_AGE_SECONDS";
}

/// Configuration errors
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Value outside its valid range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Engine component rejected its configuration
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Everything a [`crate::session::WorkoutSession`] needs besides the exercise id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Pose frame construction
    pub pose: PoseConfig,
    /// Frames retained by the pose history
    pub history_capacity: usize,
    /// Passive calibration window
    pub calibration: CalibrationConfig,
    /// Bar detector tuning
    pub bar: BarDetectorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pose: PoseConfig::default(),
            history_capacity: DEFAULT_CAPACITY,
            calibration: CalibrationConfig::default(),
            bar: BarDetectorConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load defaults overridden by `FORMCOACH_*` environment variables
    ///
    /// Unset variables keep their default. Unparsable values are logged and
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the resulting configuration fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            pose: PoseConfig {
                visibility_threshold: env_or(
                    env_vars::VISIBILITY_THRESHOLD,
                    defaults.pose.visibility_threshold,
                ),
            },
            history_capacity: env_or(env_vars::HISTORY_CAPACITY, defaults.history_capacity),
            calibration: CalibrationConfig {
                duration_seconds: env_or(
                    env_vars::CALIBRATION_SECONDS,
                    defaults.calibration.duration_seconds,
                ),
                min_samples: env_or(
                    env_vars::CALIBRATION_MIN_SAMPLES,
                    defaults.calibration.min_samples,
                ),
            },
            bar: BarDetectorConfig {
                roi_fraction: env_or(env_vars::BAR_ROI_FRACTION, defaults.bar.roi_fraction),
                confidence_ratio: env_or(
                    env_vars::BAR_CONFIDENCE_RATIO,
                    defaults.bar.confidence_ratio,
                ),
                smoothing: env_or(env_vars::BAR_SMOOTHING, defaults.bar.smoothing),
                max_age_seconds: env_or(
                    env_vars::BAR_MAX_AGE_SECONDS,
                    defaults.bar.max_age_seconds,
                ),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a visibility threshold outside [0, 1], a zero
    /// history capacity, or an invalid calibration or bar configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.pose.visibility_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "pose.visibility_threshold",
                reason: format!("must be in [0, 1], got {}", self.pose.visibility_threshold),
            });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history_capacity",
                reason: "must be at least 1".into(),
            });
        }
        self.calibration.validate()?;
        self.bar.validate()?;
        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparsable environment value");
            default
        }),
        Err(_) => default,
    }
}
