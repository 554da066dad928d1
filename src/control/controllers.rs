//! Controllers for the robot

use crate::navigation::state_machine::MotionCommand;

/// Default track motor speed in rad/s
pub const DEFAULT_MAX_SPEED: f64 = 6.28;

/// Left/right track motor velocity setpoints in rad/s
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelVelocities {
    pub left: f64,
    pub right: f64,
}

/// Maps motion commands to track motor setpoints for a tracked robot
///
/// Rotation is in place: the two tracks run at `turn_speed` in opposite
/// directions. `turn_speed` defaults to `max_speed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedDriveController {
    max_speed: f64,
    turn_speed: f64,
    reversed: bool,
}

impl Default for TrackedDriveController {
    fn default() -> Self {
        TrackedDriveController::new(DEFAULT_MAX_SPEED, false)
    }
}

impl TrackedDriveController {
    /// Create a new controller
    ///
    /// `reversed` is for motors mounted so that a positive setpoint drives
    /// the track backwards.
    pub fn new(max_speed: f64, reversed: bool) -> Self {
        TrackedDriveController {
            max_speed: max_speed.abs(),
            turn_speed: max_speed.abs(),
            reversed,
        }
    }

    /// Use a separate, usually slower, setpoint for in-place rotation
    pub fn with_turn_speed(mut self, turn_speed: f64) -> Self {
        self.turn_speed = turn_speed.abs();
        self
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn turn_speed(&self) -> f64 {
        self.turn_speed
    }

    /// +1.0 for normally mounted motors, -1.0 for reversed ones
    pub fn mount_sign(&self) -> f64 {
        if self.reversed {
            -1.0
        } else {
            1.0
        }
    }

    /// Compute motor setpoints for a command
    pub fn wheel_velocities(&self, command: MotionCommand) -> WheelVelocities {
        let s = self.max_speed * self.mount_sign();
        let t = self.turn_speed * self.mount_sign();
        let (left, right) = match command {
            MotionCommand::Stop => (0.0, 0.0),
            MotionCommand::Forward => (s, s),
            MotionCommand::RotateLeft => (-t, t),
            MotionCommand::RotateRight => (t, -t),
        };
        WheelVelocities { left, right }
    }
}
