// ABOUTME: Engine error types for catalog lookups and configuration validation
// ABOUTME: Signal conditions (no pose, no bar, calibrating) are states, never errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Engine-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Exercise id not present in the catalog
    #[error("unknown exercise: {0}")]
    UnknownExercise(String),

    /// Configuration value outside its valid range
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl EngineError {
    /// Build an `InvalidConfig` error
    #[must_use]
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
