//! Control module: motion actuation and the per-tick control loop
pub mod controllers;
pub mod path;

pub use crate::navigation::state_machine::MotionCommand;

use crate::error::{NavError, Result};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use crate::navigation::goal::NavigationGoal;
use crate::navigation::state_machine::Decision;
use crate::navigation::Navigator;
use crate::perception::PerceptionStack;
use log::{debug, info, warn};

/// Sink for the four motion commands
///
/// Each call sets a velocity setpoint that stays in effect until the next
/// call.
pub trait MotionActuator: Send + Sync {
    fn stop(&mut self) -> Result<()>;

    fn forward(&mut self) -> Result<()>;

    fn rotate_left(&mut self) -> Result<()>;

    fn rotate_right(&mut self) -> Result<()>;

    /// Dispatch a command to the matching setpoint call
    fn apply(&mut self, command: MotionCommand) -> Result<()> {
        match command {
            MotionCommand::Stop => self.stop(),
            MotionCommand::Forward => self.forward(),
            MotionCommand::RotateLeft => self.rotate_left(),
            MotionCommand::RotateRight => self.rotate_right(),
        }
    }
}

/// Result of a successful tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still navigating; the decision has been applied
    Continue(Decision),
    /// Goal reached and the robot stopped; stop ticking
    Arrived,
}

/// Drives one navigation attempt, one tick at a time
pub struct ControlLoop {
    base: LifecycleNodeBase,
    perception: PerceptionStack,
    actuator: Box<dyn MotionActuator>,
    navigator: Navigator,
    max_ticks: Option<u64>,
    ticks: u64,
}

impl ControlLoop {
    /// Create a new control loop
    pub fn new(
        perception: PerceptionStack,
        actuator: Box<dyn MotionActuator>,
        navigator: Navigator,
    ) -> Self {
        ControlLoop {
            base: LifecycleNodeBase::new("control_loop"),
            perception,
            actuator,
            navigator,
            max_ticks: None,
            ticks: 0,
        }
    }

    /// Abort with [`NavError::Timeout`] after this many ticks
    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Ticks run for the current goal
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Replace the goal and restart the attempt
    pub fn set_goal(&mut self, goal: NavigationGoal) {
        self.navigator.reset(goal);
        self.ticks = 0;
    }

    /// Run one control tick
    ///
    /// Reads fresh sensor values, decides, and makes exactly one actuator
    /// call. An unavailable heading is absorbed for this tick; sensor and
    /// actuator failures are returned to the caller.
    ///
    /// Once the tick budget is spent, a tick that still finds the robot
    /// inside tolerance reports arrival; any other decision stops the robot
    /// and fails with [`NavError::Timeout`].
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.base.require_active()?;

        let over_budget = self.max_ticks.is_some_and(|max| self.ticks >= max);
        if !over_budget {
            self.ticks += 1;
        }

        let position = self.perception.position()?;
        let decision = match self.perception.heading() {
            Ok(heading) => self.navigator.update(position, heading),
            Err(NavError::HeadingUnavailable) => {
                warn!("Tick {}: heading unavailable", self.ticks);
                self.navigator.update_without_heading(position)
            }
            Err(e) => return Err(e),
        };

        if over_budget && decision != Decision::ARRIVED {
            warn!("No arrival after {} ticks, stopping", self.ticks);
            self.actuator.stop()?;
            return Err(NavError::Timeout(self.ticks));
        }

        self.actuator.apply(decision.command)?;

        if decision == Decision::ARRIVED {
            info!(
                "Target reached at ({:.3}, {:.3}) after {} ticks",
                position.x, position.y, self.ticks
            );
            Ok(TickOutcome::Arrived)
        } else {
            Ok(TickOutcome::Continue(decision))
        }
    }

    /// Stop the attempt and leave no setpoint active
    pub fn cancel(&mut self) -> Result<()> {
        info!("Navigation cancelled after {} ticks", self.ticks);
        self.on_deactivate()
    }
}

impl LifecycleNode for ControlLoop {
    fn on_configure(&mut self) -> Result<()> {
        let target = self.navigator.goal().target();
        info!("Configuring control loop for ({:.3}, {:.3})", target.x, target.y);
        self.base.transition(State::Unconfigured, State::Inactive)
    }

    fn on_activate(&mut self) -> Result<()> {
        info!("Activating control loop");
        self.base.transition(State::Inactive, State::Active)
    }

    fn on_deactivate(&mut self) -> Result<()> {
        debug!("Deactivating control loop");
        self.base.transition(State::Active, State::Inactive)?;
        self.actuator.stop()
    }

    fn on_cleanup(&mut self) -> Result<()> {
        debug!("Cleaning up control loop");
        self.base.transition(State::Inactive, State::Unconfigured)
    }
}
