//! Rotate-then-advance decision for a single control tick

use super::geometry::{angular_difference, bearing_to};
use super::goal::NavigationGoal;
use crate::common::types::{Angle, Point2D};
use std::fmt;

/// Phase of a navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    Rotating,
    Advancing,
    Arrived,
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NavigationState::Rotating => "ROTATING",
            NavigationState::Advancing => "ADVANCING",
            NavigationState::Arrived => "ARRIVED",
        };
        f.write_str(s)
    }
}

/// Command for the motion actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    Stop,
    Forward,
    RotateLeft,
    RotateRight,
}

/// Outcome of one tick: the phase and the command to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub state: NavigationState,
    pub command: MotionCommand,
}

impl Decision {
    pub const fn new(state: NavigationState, command: MotionCommand) -> Self {
        Decision { state, command }
    }

    pub const ARRIVED: Decision = Decision::new(NavigationState::Arrived, MotionCommand::Stop);
}

/// Decide the command for this tick from fresh position and heading
///
/// Arrival is tested first on every tick, so a goal already inside the
/// tolerance never rotates. Otherwise the robot turns toward the target until
/// the heading error is below the angle tolerance, then drives forward.
pub fn step(current: Point2D, heading: Angle, goal: &NavigationGoal) -> Decision {
    if goal.is_reached_by(current) {
        return Decision::ARRIVED;
    }

    let bearing = bearing_to(current, goal.target());
    let diff = angular_difference(bearing, heading);

    if diff.abs() >= goal.angle_tolerance() {
        let command = if diff > 0.0 {
            MotionCommand::RotateLeft
        } else {
            MotionCommand::RotateRight
        };
        Decision::new(NavigationState::Rotating, command)
    } else {
        Decision::new(NavigationState::Advancing, MotionCommand::Forward)
    }
}
