// ABOUTME: JSON-lines replay of recorded detector output through a workout session
// ABOUTME: One detection per line with optional landmarks and an optional bar height
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Detection Replay
//!
//! Each non-empty line is a JSON object:
//!
//! ```json
//! {"timestamp": 0.033, "width": 640, "height": 480,
//!  "landmarks": [[0.5, 0.2, -0.1, 0.99], ...], "bar_y": 0.31}
//! ```
//!
//! `landmarks` is `null` (or absent) when no pose was detected; otherwise it
//! holds `[x, y, z, visibility]` entries in schema order. `bar_y` stands in for
//! the bar detector when no raster is available.
//!
//! Replays drive the session through a [`ManualClock`] set to each frame's
//! timestamp, so time-gated behavior matches the recording rather than the
//! speed of the replay.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use formcoach_core::{ImageSize, Landmark, ManualClock};
use formcoach_engine::ExerciseState;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::session::{BarSource, Detection, WorkoutSession};

/// One recorded detector result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Capture time in seconds
    pub timestamp: f64,
    /// Source image width in pixels
    pub width: u32,
    /// Source image height in pixels
    pub height: u32,
    /// `[x, y, z, visibility]` per landmark, or `None` when no pose was found
    #[serde(default)]
    pub landmarks: Option<Vec<[f64; 4]>>,
    /// Bar height as a fraction of frame height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_y: Option<f64>,
}

impl ReplayFrame {
    /// Landmarks converted to the core type
    #[must_use]
    pub fn to_landmarks(&self) -> Option<Vec<Landmark>> {
        self.landmarks.as_ref().map(|points| {
            points
                .iter()
                .map(|[x, y, z, visibility]| Landmark::new(*x, *y, *z, *visibility))
                .collect()
        })
    }
}

/// Parsed replay file
#[derive(Debug, Clone, Default)]
pub struct Replay {
    /// Frames in file order
    pub frames: Vec<ReplayFrame>,
    /// Non-empty lines that failed to parse
    pub skipped_lines: usize,
}

/// Parse replay lines from any buffered reader
///
/// Malformed lines are logged and skipped.
///
/// # Errors
///
/// Returns an error if reading from `reader` fails.
pub fn parse_replay(reader: impl BufRead) -> Result<Replay> {
    let mut replay = Replay::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read replay line {}", index + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<ReplayFrame>(trimmed) {
            Ok(frame) => replay.frames.push(frame),
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping malformed replay line");
                replay.skipped_lines += 1;
            }
        }
    }
    debug!(
        frames = replay.frames.len(),
        skipped = replay.skipped_lines,
        "Replay parsed"
    );
    Ok(replay)
}

/// Load a replay file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn load_replay(path: &Path) -> Result<Replay> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open replay file {}", path.display()))?;
    parse_replay(BufReader::new(file))
        .with_context(|| format!("Failed to read replay file {}", path.display()))
}

/// Feed every frame through `session`, calling `on_state` after each one
///
/// `clock` must be the clock the session was created with.
pub fn run_replay(
    frames: &[ReplayFrame],
    session: &mut WorkoutSession,
    clock: &ManualClock,
    mut on_state: impl FnMut(&ReplayFrame, &ExerciseState),
) {
    for frame in frames {
        clock.set(frame.timestamp);
        let landmarks = frame.to_landmarks();
        let detection = Detection {
            landmarks: landmarks.as_deref(),
            timestamp: frame.timestamp,
            image_size: ImageSize::new(frame.width, frame.height),
            bar: frame.bar_y.map_or(BarSource::None, BarSource::Position),
        };
        let state = session.process(&detection);
        on_state(frame, &state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_landmarks_and_blank_lines() -> Result<()> {
        let input = concat!(
            "\n",
            r#"{"timestamp": 1.5, "width": 640, "height": 480, "landmarks": null}"#,
            "\n\nnot json\n",
        );
        let replay = parse_replay(input.as_bytes())?;
        assert_eq!(replay.frames.len(), 1);
        assert_eq!(replay.skipped_lines, 1);
        assert!(replay.frames[0].to_landmarks().is_none());
        assert_eq!(replay.frames[0].bar_y, None);
        Ok(())
    }
}
