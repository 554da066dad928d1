//! Heading estimation from raw magnetic-sensor readings
//!
//! The compass reports the direction of magnetic north in the robot frame
//! (x forward, y left). For a robot facing world bearing `h` (counter-clockwise
//! from world +x, with north along world +y) that vector is `(sin h, cos h)`,
//! so `atan2(x, y)` recovers `h` directly. A mounting offset absorbs any other
//! sensor orientation.

use crate::common::types::{Angle, HeadingSample};
use crate::error::{NavError, Result};
use crate::navigation::geometry::normalize_unsigned;

/// Planar field magnitudes below this are treated as no reading
const MIN_FIELD_NORM: f64 = 1e-9;

/// Converts heading samples into headings in the bearing convention
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadingEstimator {
    offset_deg: f64,
}

impl HeadingEstimator {
    /// Create an estimator for a sensor mounted `offset_deg` away from the
    /// reference mounting
    pub fn new(offset_deg: f64) -> Self {
        HeadingEstimator { offset_deg }
    }

    pub fn offset_deg(&self) -> f64 {
        self.offset_deg
    }

    /// Estimate the robot heading in [0, 360)
    ///
    /// Returns [`NavError::HeadingUnavailable`] for a zero or non-finite
    /// planar reading instead of letting `atan2(0, 0)` report 0°, and when a
    /// non-finite offset would turn the estimate into NaN.
    pub fn estimate(&self, sample: HeadingSample) -> Result<Angle> {
        let planar = sample.planar();
        if !planar.iter().all(|c| c.is_finite()) || planar.norm() < MIN_FIELD_NORM {
            return Err(NavError::HeadingUnavailable);
        }
        let heading = sample.x.atan2(sample.y).to_degrees() + self.offset_deg;
        if !heading.is_finite() {
            return Err(NavError::HeadingUnavailable);
        }
        Ok(normalize_unsigned(heading))
    }
}

/// Heading for a sensor in the reference mounting
pub fn heading_from_sample(sample: HeadingSample) -> Result<Angle> {
    HeadingEstimator::default().estimate(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_for(heading_deg: f64) -> HeadingSample {
        let h = heading_deg.to_radians();
        HeadingSample::new(h.sin(), h.cos(), 0.0)
    }

    #[test]
    fn test_cardinal_headings() {
        assert_relative_eq!(heading_from_sample(HeadingSample::new(0.0, 1.0, 0.0)).unwrap(), 0.0);
        assert_relative_eq!(heading_from_sample(HeadingSample::new(1.0, 0.0, 0.0)).unwrap(), 90.0);
        assert_relative_eq!(heading_from_sample(HeadingSample::new(0.0, -1.0, 0.0)).unwrap(), 180.0);
        assert_relative_eq!(heading_from_sample(HeadingSample::new(-1.0, 0.0, 0.0)).unwrap(), 270.0);
    }

    #[test]
    fn test_recovers_simulated_heading() {
        for i in 0..36 {
            let expected = i as f64 * 10.0 + 3.0;
            let got = heading_from_sample(sample_for(expected)).unwrap();
            assert!((0.0..360.0).contains(&got));
            assert_relative_eq!(got, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_magnitude_and_z_are_ignored() {
        let a = heading_from_sample(HeadingSample::new(0.2, 0.2, 0.0)).unwrap();
        let b = heading_from_sample(HeadingSample::new(40.0, 40.0, -17.0)).unwrap();
        assert_relative_eq!(a, 45.0, epsilon = 1e-12);
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn test_mounting_offset_wraps() {
        let estimator = HeadingEstimator::new(-90.0);
        let got = estimator.estimate(sample_for(45.0)).unwrap();
        assert_relative_eq!(got, 315.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_sample_is_unavailable() {
        assert_eq!(
            heading_from_sample(HeadingSample::new(0.0, 0.0, 0.0)),
            Err(NavError::HeadingUnavailable)
        );
        // z alone carries no planar heading
        assert_eq!(
            heading_from_sample(HeadingSample::new(0.0, 0.0, 1.0)),
            Err(NavError::HeadingUnavailable)
        );
        assert_eq!(
            heading_from_sample(HeadingSample::new(f64::NAN, 1.0, 0.0)),
            Err(NavError::HeadingUnavailable)
        );
    }

    #[test]
    fn test_non_finite_offset_is_unavailable() {
        for offset in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                HeadingEstimator::new(offset).estimate(sample_for(45.0)),
                Err(NavError::HeadingUnavailable)
            );
        }
    }
}
