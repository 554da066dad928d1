//! Kinematic tracked-robot simulation
//!
//! Stands in for the host simulator: a shared body holds the pose and the
//! current motor setpoints, a sensor handle reads it like a GPS and compass,
//! and a motor handle writes setpoints through a [`TrackedDriveController`].

use crate::common::types::{HeadingSample, Point2D};
use crate::config::SimConfig;
use crate::control::controllers::{TrackedDriveController, WheelVelocities};
use crate::control::MotionActuator;
use crate::error::{NavError, Result};
use crate::navigation::state_machine::MotionCommand;
use crate::perception::sensors::SensorSource;
use log::trace;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct Body {
    position: Point2D,
    /// Radians, counter-clockwise from world +x
    heading: f64,
    motors: WheelVelocities,
    mount_sign: f64,
    last_command: Option<MotionCommand>,
}

/// A simulated tracked robot
#[derive(Debug, Clone)]
pub struct SimulatedRobot {
    body: Arc<Mutex<Body>>,
    wheel_radius: f64,
    track_width: f64,
    heading_dropout_every: Option<u32>,
}

impl SimulatedRobot {
    /// Create a robot at `start` facing `heading_deg`
    pub fn new(start: Point2D, heading_deg: f64, wheel_radius: f64, track_width: f64) -> Self {
        SimulatedRobot {
            body: Arc::new(Mutex::new(Body {
                position: start,
                heading: heading_deg.to_radians(),
                motors: WheelVelocities::default(),
                mount_sign: 1.0,
                last_command: None,
            })),
            wheel_radius,
            track_width,
            heading_dropout_every: None,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            Point2D::new(config.start_x, config.start_y),
            config.start_heading_deg,
            config.wheel_radius,
            config.track_width,
        )
        .with_heading_dropout(config.heading_dropout_every)
    }

    /// Make every n-th compass read return the zero vector
    pub fn with_heading_dropout(mut self, every: Option<u32>) -> Self {
        self.heading_dropout_every = every.filter(|n| *n > 0);
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Body>> {
        self.body
            .lock()
            .map_err(|_| NavError::CollaboratorUnavailable("simulated robot body poisoned".to_string()))
    }

    /// Sensor handle reading this robot
    pub fn sensors(&self) -> SimSensors {
        SimSensors {
            robot: self.clone(),
            reads: AtomicU32::new(0),
        }
    }

    /// Motor handle driving this robot through `controller`
    pub fn motors(&self, controller: TrackedDriveController) -> Result<SimMotors> {
        self.lock()?.mount_sign = controller.mount_sign();
        Ok(SimMotors {
            robot: self.clone(),
            controller,
        })
    }

    /// Integrate the current setpoints over `dt` seconds
    pub fn advance(&self, dt: f64) -> Result<()> {
        let mut body = self.lock()?;
        let left = body.motors.left * body.mount_sign * self.wheel_radius;
        let right = body.motors.right * body.mount_sign * self.wheel_radius;
        let v = (left + right) / 2.0;
        let omega = (right - left) / self.track_width;

        let heading = body.heading;
        body.position.x += v * heading.cos() * dt;
        body.position.y += v * heading.sin() * dt;
        body.heading = (heading + omega * dt).rem_euclid(std::f64::consts::TAU);
        trace!(
            "sim pose ({:.4}, {:.4}, {:.2} deg)",
            body.position.x,
            body.position.y,
            body.heading.to_degrees()
        );
        Ok(())
    }

    /// True position
    pub fn position(&self) -> Result<Point2D> {
        Ok(self.lock()?.position)
    }

    /// True heading in degrees
    pub fn heading_deg(&self) -> Result<f64> {
        Ok(self.lock()?.heading.to_degrees())
    }

    /// Current motor setpoints
    pub fn motor_setpoints(&self) -> Result<WheelVelocities> {
        Ok(self.lock()?.motors)
    }

    /// Last command written by a motor handle
    pub fn last_command(&self) -> Result<Option<MotionCommand>> {
        Ok(self.lock()?.last_command)
    }
}

/// GPS and compass for a [`SimulatedRobot`]
#[derive(Debug)]
pub struct SimSensors {
    robot: SimulatedRobot,
    reads: AtomicU32,
}

impl SensorSource for SimSensors {
    fn current_position(&self) -> Result<Point2D> {
        self.robot.position()
    }

    fn current_heading_sample(&self) -> Result<HeadingSample> {
        let n = self.reads.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(every) = self.robot.heading_dropout_every {
            if n % every == 0 {
                return Ok(HeadingSample::default());
            }
        }
        // North (world +y) seen from the robot frame
        let h = self.robot.lock()?.heading;
        Ok(HeadingSample::new(h.sin(), h.cos(), 0.0))
    }
}

/// Track motors for a [`SimulatedRobot`]
#[derive(Debug)]
pub struct SimMotors {
    robot: SimulatedRobot,
    controller: TrackedDriveController,
}

impl SimMotors {
    fn set(&mut self, command: MotionCommand) -> Result<()> {
        let setpoints = self.controller.wheel_velocities(command);
        let mut body = self.robot.lock()?;
        body.motors = setpoints;
        body.last_command = Some(command);
        Ok(())
    }
}

impl MotionActuator for SimMotors {
    fn stop(&mut self) -> Result<()> {
        self.set(MotionCommand::Stop)
    }

    fn forward(&mut self) -> Result<()> {
        self.set(MotionCommand::Forward)
    }

    fn rotate_left(&mut self) -> Result<()> {
        self.set(MotionCommand::RotateLeft)
    }

    fn rotate_right(&mut self) -> Result<()> {
        self.set(MotionCommand::RotateRight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::heading::heading_from_sample;
    use approx::assert_relative_eq;

    fn robot() -> SimulatedRobot {
        SimulatedRobot::new(Point2D::new(0.0, 0.0), 90.0, 0.05, 0.2)
    }

    #[test]
    fn test_forward_moves_along_heading() {
        let robot = robot();
        let mut motors = robot.motors(TrackedDriveController::new(2.0, false)).unwrap();
        motors.forward().unwrap();
        robot.advance(1.0).unwrap();
        let p = robot.position().unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_left_is_counter_clockwise_in_place() {
        let robot = robot();
        let mut motors = robot.motors(TrackedDriveController::new(2.0, true)).unwrap();
        motors.rotate_left().unwrap();
        robot.advance(0.1).unwrap();
        // omega = 0.05 * 4 / 0.2 = 1 rad/s
        assert_relative_eq!(robot.heading_deg().unwrap(), 90.0 + 0.1f64.to_degrees(), epsilon = 1e-9);
        assert_eq!(robot.position().unwrap(), Point2D::new(0.0, 0.0));
        assert_eq!(robot.last_command().unwrap(), Some(MotionCommand::RotateLeft));
    }

    #[test]
    fn test_compass_matches_estimator() {
        let robot = SimulatedRobot::new(Point2D::new(1.0, 1.0), 123.0, 0.04, 0.3);
        let sample = robot.sensors().current_heading_sample().unwrap();
        assert_relative_eq!(heading_from_sample(sample).unwrap(), 123.0, epsilon = 1e-9);
    }

    #[test]
    fn test_heading_dropout() {
        let robot = robot().with_heading_dropout(Some(3));
        let sensors = robot.sensors();
        let samples: Vec<_> = (0..6)
            .map(|_| sensors.current_heading_sample().unwrap())
            .collect();
        assert_eq!(samples[2], HeadingSample::default());
        assert_eq!(samples[5], HeadingSample::default());
        assert_ne!(samples[0], HeadingSample::default());
    }
}
