//! Common utilities and types for the navigation core

/// Common types used across the codebase
pub mod types {
    use nalgebra::Vector2;

    /// An angle in degrees
    ///
    /// Bearings and headings share one convention: measured from the world
    /// +x axis, increasing counter-clockwise, in [0, 360).
    pub type Angle = f64;

    /// A planar coordinate in the robot's world frame
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Point2D {
        pub x: f64,
        pub y: f64,
    }

    impl Point2D {
        pub const fn new(x: f64, y: f64) -> Self {
            Point2D { x, y }
        }
    }

    impl From<Point2D> for Vector2<f64> {
        fn from(p: Point2D) -> Self {
            Vector2::new(p.x, p.y)
        }
    }

    impl From<Vector2<f64>> for Point2D {
        fn from(v: Vector2<f64>) -> Self {
            Point2D::new(v.x, v.y)
        }
    }

    /// Raw orientation-sensor reading for one tick
    ///
    /// `z` is carried along but ignored by the planar heading estimator.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct HeadingSample {
        pub x: f64,
        pub y: f64,
        pub z: f64,
    }

    impl HeadingSample {
        pub const fn new(x: f64, y: f64, z: f64) -> Self {
            HeadingSample { x, y, z }
        }

        /// Planar part of the reading
        pub fn planar(&self) -> Vector2<f64> {
            Vector2::new(self.x, self.y)
        }
    }
}
