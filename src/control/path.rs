//! Waypoint following on top of the single-goal control loop

use super::{ControlLoop, TickOutcome};
use crate::common::types::Point2D;
use crate::error::{NavError, Result};
use crate::lifecycle::{LifecycleNode, State};
use crate::navigation::goal::NavigationGoal;
use crate::navigation::state_machine::Decision;
use log::info;
use std::collections::VecDeque;

/// Result of a successful path tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOutcome {
    /// Still heading for the current waypoint
    Continue(Decision),
    /// A waypoint other than the last was reached; the next one is now active
    WaypointReached { index: usize, target: Point2D },
    /// The last waypoint was reached and the robot is stopped
    Completed,
}

/// Visits a list of goals in order
///
/// Each arrival stops the robot for one tick before the next goal is set,
/// and the tick budget of the control loop restarts per waypoint.
pub struct WaypointFollower {
    control: ControlLoop,
    remaining: VecDeque<NavigationGoal>,
    index: usize,
    total: usize,
}

impl WaypointFollower {
    /// Take over `control`, replacing its goal with the first waypoint
    pub fn new(mut control: ControlLoop, goals: Vec<NavigationGoal>) -> Result<Self> {
        let mut remaining = VecDeque::from(goals);
        let first = remaining
            .pop_front()
            .ok_or_else(|| NavError::InvalidGoal("path has no waypoints".to_string()))?;
        control.set_goal(first);
        let total = remaining.len() + 1;
        Ok(WaypointFollower {
            control,
            remaining,
            index: 0,
            total,
        })
    }

    pub fn control(&self) -> &ControlLoop {
        &self.control
    }

    /// Index of the waypoint currently being approached
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Run one control tick, moving on to the next waypoint on arrival
    pub fn tick(&mut self) -> Result<PathOutcome> {
        match self.control.tick()? {
            TickOutcome::Continue(decision) => Ok(PathOutcome::Continue(decision)),
            TickOutcome::Arrived => {
                let target = self.control.navigator().goal().target();
                match self.remaining.pop_front() {
                    Some(next) => {
                        let reached = self.index;
                        info!(
                            "Waypoint {}/{} ({:.3}, {:.3}) reached",
                            reached + 1,
                            self.total,
                            target.x,
                            target.y
                        );
                        self.index += 1;
                        self.control.set_goal(next);
                        Ok(PathOutcome::WaypointReached {
                            index: reached,
                            target,
                        })
                    }
                    None => {
                        info!("Path of {} waypoints completed", self.total);
                        Ok(PathOutcome::Completed)
                    }
                }
            }
        }
    }

    pub fn state(&self) -> State {
        self.control.state()
    }

    /// Stop the robot and abandon the remaining waypoints
    pub fn cancel(&mut self) -> Result<()> {
        self.remaining.clear();
        self.control.cancel()
    }

    /// Stop the robot and return to unconfigured, whatever state the run ended in
    pub fn shutdown(&mut self) -> Result<()> {
        if self.state() == State::Active {
            self.cancel()?;
        }
        if self.state() == State::Inactive {
            self.on_cleanup()?;
        }
        Ok(())
    }
}

impl LifecycleNode for WaypointFollower {
    fn on_configure(&mut self) -> Result<()> {
        self.control.on_configure()
    }

    fn on_activate(&mut self) -> Result<()> {
        self.control.on_activate()
    }

    fn on_deactivate(&mut self) -> Result<()> {
        self.control.on_deactivate()
    }

    fn on_cleanup(&mut self) -> Result<()> {
        self.control.on_cleanup()
    }
}
