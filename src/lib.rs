//! Go-to-coordinate navigation core for a tracked ground robot
//!
//! Each control tick the robot either rotates in place toward the target or
//! drives forward, until it is within tolerance of the target:
//!
//! - [`navigation::geometry`]: bearing, angle normalization and arrival tests
//! - [`perception::heading`]: compass sample to heading
//! - [`navigation::state_machine::step`]: the per-tick decision
//! - [`control::ControlLoop`]: reads sensors, decides, drives the actuator
//! - [`control::path::WaypointFollower`]: visits several targets in order
pub mod common;
pub mod config;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod navigation;
pub mod perception;
pub mod sim;

pub use crate::common::types::{Angle, HeadingSample, Point2D};
pub use crate::config::GotoConfig;
pub use crate::control::path::{PathOutcome, WaypointFollower};
pub use crate::control::{ControlLoop, MotionActuator, TickOutcome};
pub use crate::error::{NavError, Result};
pub use crate::navigation::goal::NavigationGoal;
pub use crate::navigation::state_machine::{step, Decision, MotionCommand, NavigationState};
pub use crate::navigation::Navigator;
pub use crate::perception::sensors::SensorSource;
pub use crate::perception::PerceptionStack;

use crate::lifecycle::LifecycleNode;
use crate::sim::SimulatedRobot;

/// Build a configured, active control loop driving a simulated robot
pub fn simulated_control_loop(config: &GotoConfig) -> Result<(ControlLoop, SimulatedRobot)> {
    let robot = SimulatedRobot::from_config(&config.sim);
    let perception = PerceptionStack::new(Box::new(robot.sensors()), config.heading_estimator());
    let motors = robot.motors(config.drive_controller())?;
    let navigator =
        Navigator::new(config.goal()?).with_heading_loss_policy(config.heading.on_heading_loss);

    let mut control = ControlLoop::new(perception, Box::new(motors), navigator)
        .with_max_ticks(config.control.max_ticks);
    control.on_configure()?;
    control.on_activate()?;
    Ok((control, robot))
}

/// Build an active follower for the configured `[[path]]`, or for the single
/// `[goal]` when no path is given
pub fn simulated_path_follower(config: &GotoConfig) -> Result<(WaypointFollower, SimulatedRobot)> {
    let (control, robot) = simulated_control_loop(config)?;
    let follower = WaypointFollower::new(control, config.goals()?)?;
    Ok((follower, robot))
}
