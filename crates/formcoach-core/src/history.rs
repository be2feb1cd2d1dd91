// ABOUTME: Fixed-capacity rolling window of pose frames with FIFO eviction
// ABOUTME: Supports latest, latest-valid, last-N, and trailing time-window queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::history::DEFAULT_CAPACITY;
use crate::pose::PoseFrame;
use std::collections::VecDeque;

/// Rolling pose history, oldest frame first
#[derive(Debug, Clone)]
pub struct PoseHistory {
    frames: VecDeque<PoseFrame>,
    capacity: usize,
}

impl Default for PoseHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PoseHistory {
    /// Create an empty history holding at most `capacity` frames (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a frame, evicting the oldest once capacity is exceeded
    pub fn push(&mut self, frame: PoseFrame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Newest frame
    #[must_use]
    pub fn latest(&self) -> Option<&PoseFrame> {
        self.frames.back()
    }

    /// Newest frame with `is_valid() == true`
    #[must_use]
    pub fn latest_valid(&self) -> Option<&PoseFrame> {
        self.frames.iter().rev().find(|frame| frame.is_valid())
    }

    /// Up to `count` newest frames, oldest first
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&PoseFrame> {
        let skip = self.frames.len().saturating_sub(count);
        self.frames.iter().skip(skip).collect()
    }

    /// Frames no more than `seconds` older than the newest frame, inclusive
    #[must_use]
    pub fn within(&self, seconds: f64) -> Vec<&PoseFrame> {
        let Some(newest) = self.frames.back() else {
            return Vec::new();
        };
        let end = newest.timestamp();
        self.frames
            .iter()
            .filter(|frame| end - frame.timestamp() <= seconds)
            .collect()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &PoseFrame> {
        self.frames.iter()
    }

    /// Number of stored frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frames are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Maximum number of stored frames
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every stored frame
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
