// ABOUTME: Error types for pose model and raster input validation
// ABOUTME: Only malformed external input is an error; missing detections are regular states
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Errors raised while validating inputs handed to the core model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// Pixel buffer too short for the declared frame dimensions
    #[error("raster buffer of {len} bytes is too short for {width}x{height}x{channels}")]
    InvalidRaster {
        /// Declared width in pixels
        width: u32,
        /// Declared height in pixels
        height: u32,
        /// Bytes per pixel
        channels: u8,
        /// Bytes actually supplied
        len: usize,
    },

    /// Landmark name outside the fixed schema
    #[error("unknown landmark name: {0}")]
    UnknownLandmark(String),
}

/// Result alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
