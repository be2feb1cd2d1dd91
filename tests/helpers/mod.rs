// ABOUTME: Shared test helpers for formcoach integration tests
// ABOUTME: Exports synthetic pose builders and clock fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod synthetic_pose;
