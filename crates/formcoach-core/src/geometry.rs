// ABOUTME: Pure geometric helpers for landmark measurements
// ABOUTME: Euclidean distance, joint angle via dot product, and finite-difference velocity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::geometry::{DEGENERATE_RAY_LENGTH, MIN_REFERENCE_LENGTH, MIN_TIME_DELTA};
use crate::landmarks::Landmark;

/// Euclidean distance between two landmarks in the x/y plane
#[must_use]
pub fn distance(a: Landmark, b: Landmark) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Angle at vertex `b` between the rays `b->a` and `b->c`, in degrees
///
/// Returns 0 when either ray is shorter than 1e-6. The cosine is clamped to
/// [-1, 1] before `acos`, so the result always lies in [0, 180].
#[must_use]
pub fn angle_degrees(a: Landmark, b: Landmark, c: Landmark) -> f64 {
    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);

    let mag_ba = bax.hypot(bay);
    let mag_bc = bcx.hypot(bcy);
    if mag_ba < DEGENERATE_RAY_LENGTH || mag_bc < DEGENERATE_RAY_LENGTH {
        return 0.0;
    }

    let cos_theta = ((bax * bcx + bay * bcy) / (mag_ba * mag_bc)).clamp(-1.0, 1.0);
    cos_theta.acos().to_degrees()
}

/// First-order rate of change, or `None` when the time delta is not positive
///
/// A missing velocity is not the same as zero velocity; callers must not
/// substitute one for the other.
#[must_use]
pub fn velocity(prev_value: f64, prev_time: f64, curr_value: f64, curr_time: f64) -> Option<f64> {
    let dt = curr_time - prev_time;
    if dt <= MIN_TIME_DELTA {
        return None;
    }
    Some((curr_value - prev_value) / dt)
}

/// Midpoint of two landmarks, keeping the lower of the two visibilities
#[must_use]
pub fn midpoint(a: Landmark, b: Landmark) -> Landmark {
    Landmark::new(
        (a.x + b.x) / 2.0,
        (a.y + b.y) / 2.0,
        (a.z + b.z) / 2.0,
        a.visibility.min(b.visibility),
    )
}

/// Floor a body-scale reference length so it is safe to divide by
#[must_use]
pub fn floor_reference(length: f64) -> f64 {
    length.max(MIN_REFERENCE_LENGTH)
}
