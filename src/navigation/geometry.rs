//! Planar geometry helpers for bearing, angle and arrival computations
//!
//! All angles are in degrees. Bearings are measured from the world +x axis
//! and increase counter-clockwise, so a positive signed difference means the
//! target lies to the left of the current heading.

use crate::common::types::{Angle, Point2D};
use nalgebra::Vector2;
use serde::Deserialize;

/// Bearing from `from` to `to`, in [0, 360)
///
/// The direction is undefined when both points coincide; callers check
/// arrival first.
pub fn bearing_to(from: Point2D, to: Point2D) -> Angle {
    let d = displacement(from, to);
    normalize_unsigned(d.y.atan2(d.x).to_degrees())
}

/// Reduce any angle to [0, 360)
pub fn normalize_unsigned(angle: f64) -> f64 {
    if (0.0..360.0).contains(&angle) {
        return angle;
    }
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Reduce any angle to [-180, 180) with a single modulo
pub fn normalize_signed(angle: f64) -> f64 {
    if (-180.0..180.0).contains(&angle) {
        return angle;
    }
    let a = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if a >= 180.0 {
        -180.0
    } else {
        a
    }
}

/// Signed shortest rotation from heading `b` to bearing `a`
///
/// Positive values mean turning left (counter-clockwise).
pub fn angular_difference(a: Angle, b: Angle) -> f64 {
    normalize_signed(a - b)
}

/// Vector from `from` to `to`
pub fn displacement(from: Point2D, to: Point2D) -> Point2D {
    (Vector2::from(to) - Vector2::from(from)).into()
}

/// Euclidean distance between two points
pub fn distance(from: Point2D, to: Point2D) -> f64 {
    (Vector2::from(to) - Vector2::from(from)).norm()
}

/// Axis-aligned arrival test
///
/// True when both per-axis offsets are strictly below `tol`. The accepted
/// region is a square, so a diagonal approach can be declared arrived up to
/// `tol * sqrt(2)` away from the target.
pub fn has_arrived(current: Point2D, target: Point2D, tol: f64) -> bool {
    (current.x - target.x).abs() < tol && (current.y - target.y).abs() < tol
}

/// Shape of the region around the target that counts as arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalTest {
    /// Square box, both axis offsets below the tolerance
    #[default]
    AxisAligned,
    /// Disc, straight-line distance below the tolerance
    Euclidean,
}

impl ArrivalTest {
    pub fn has_arrived(&self, current: Point2D, target: Point2D, tol: f64) -> bool {
        match self {
            ArrivalTest::AxisAligned => has_arrived(current, target, tol),
            ArrivalTest::Euclidean => distance(current, target) < tol,
        }
    }
}
