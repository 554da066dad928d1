//! Sensor interfaces for the navigation core

use crate::common::types::{HeadingSample, Point2D};
use crate::error::Result;

/// Source of the robot's position and raw heading readings
///
/// Both reads are point-in-time; the core re-reads them every tick. A device
/// that cannot be read reports [`crate::error::NavError::CollaboratorUnavailable`]
/// rather than a substitute value.
pub trait SensorSource: Send + Sync {
    /// Current position in the world frame
    fn current_position(&self) -> Result<Point2D>;

    /// Current raw orientation-sensor vector
    fn current_heading_sample(&self) -> Result<HeadingSample>;
}
