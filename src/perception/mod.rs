//! Perception module: sensor access and heading estimation
pub mod heading;
pub mod sensors;

use self::heading::HeadingEstimator;
use self::sensors::SensorSource;
use crate::common::types::{Angle, Point2D};
use crate::error::{NavError, Result};

/// Perception stack for the robot
pub struct PerceptionStack {
    sensors: Box<dyn SensorSource>,
    estimator: HeadingEstimator,
}

impl PerceptionStack {
    /// Create a new perception stack over a sensor source
    pub fn new(sensors: Box<dyn SensorSource>, estimator: HeadingEstimator) -> Self {
        PerceptionStack { sensors, estimator }
    }

    /// Read the current position
    ///
    /// A NaN or infinite coordinate is reported as an unavailable sensor.
    pub fn position(&self) -> Result<Point2D> {
        let p = self.sensors.current_position()?;
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Err(NavError::CollaboratorUnavailable(format!(
                "position sensor reported ({}, {})",
                p.x, p.y
            )));
        }
        Ok(p)
    }

    /// Read and estimate the current heading
    pub fn heading(&self) -> Result<Angle> {
        let sample = self.sensors.current_heading_sample()?;
        self.estimator.estimate(sample)
    }
}
