//! Navigation goal definition

use super::geometry::ArrivalTest;
use crate::common::types::Point2D;
use crate::error::{NavError, Result};

/// Default per-axis arrival tolerance (world units)
pub const DEFAULT_POSITION_TOLERANCE: f64 = 0.5;

/// Default heading tolerance in degrees
pub const DEFAULT_ANGLE_TOLERANCE: f64 = 3.0;

/// Configuration for one navigation attempt
///
/// Immutable once built; tolerances are validated at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationGoal {
    target: Point2D,
    position_tolerance: f64,
    angle_tolerance: f64,
    arrival_test: ArrivalTest,
}

impl NavigationGoal {
    /// Create a goal, rejecting non-positive (or NaN) tolerances
    pub fn new(target: Point2D, position_tolerance: f64, angle_tolerance: f64) -> Result<Self> {
        if !target.x.is_finite() || !target.y.is_finite() {
            return Err(NavError::InvalidGoal(format!(
                "target ({}, {}) must be finite",
                target.x, target.y
            )));
        }
        if !(position_tolerance > 0.0) {
            return Err(NavError::InvalidGoal(format!(
                "position tolerance must be positive, got {}",
                position_tolerance
            )));
        }
        if !(angle_tolerance > 0.0) {
            return Err(NavError::InvalidGoal(format!(
                "angle tolerance must be positive, got {}",
                angle_tolerance
            )));
        }

        Ok(NavigationGoal {
            target,
            position_tolerance,
            angle_tolerance,
            arrival_test: ArrivalTest::default(),
        })
    }

    /// Goal with the default tolerances
    pub fn with_defaults(target: Point2D) -> Result<Self> {
        Self::new(target, DEFAULT_POSITION_TOLERANCE, DEFAULT_ANGLE_TOLERANCE)
    }

    /// Replace the arrival region shape
    pub fn with_arrival_test(mut self, arrival_test: ArrivalTest) -> Self {
        self.arrival_test = arrival_test;
        self
    }

    pub fn target(&self) -> Point2D {
        self.target
    }

    pub fn position_tolerance(&self) -> f64 {
        self.position_tolerance
    }

    pub fn angle_tolerance(&self) -> f64 {
        self.angle_tolerance
    }

    pub fn arrival_test(&self) -> ArrivalTest {
        self.arrival_test
    }

    /// Whether `current` is inside the arrival region
    pub fn is_reached_by(&self, current: Point2D) -> bool {
        self.arrival_test
            .has_arrived(current, self.target, self.position_tolerance)
    }
}
