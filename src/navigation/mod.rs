//! Navigation module: geometry, goals and the rotate-then-advance controller
pub mod geometry;
pub mod goal;
pub mod state_machine;

use self::goal::NavigationGoal;
use self::state_machine::{step, Decision, MotionCommand, NavigationState};
use crate::common::types::{Angle, Point2D};
use log::{debug, info};
use serde::Deserialize;

/// What to do on a tick where no heading could be estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLossPolicy {
    /// Repeat the previous command
    #[default]
    Hold,
    /// Stop until a heading is available again
    Stop,
}

/// Stateful wrapper around [`step`] for one navigation attempt
///
/// Latches [`NavigationState::Arrived`]: once the goal is reached every
/// further update returns `(ARRIVED, STOP)` even if the sensed position
/// drifts back outside the tolerance.
#[derive(Debug, Clone)]
pub struct Navigator {
    goal: NavigationGoal,
    heading_loss: HeadingLossPolicy,
    last: Option<Decision>,
}

impl Navigator {
    /// Create a navigator for `goal`
    pub fn new(goal: NavigationGoal) -> Self {
        Navigator {
            goal,
            heading_loss: HeadingLossPolicy::default(),
            last: None,
        }
    }

    pub fn with_heading_loss_policy(mut self, policy: HeadingLossPolicy) -> Self {
        self.heading_loss = policy;
        self
    }

    pub fn goal(&self) -> &NavigationGoal {
        &self.goal
    }

    /// State decided on the most recent tick, if any
    pub fn state(&self) -> Option<NavigationState> {
        self.last.map(|d| d.state)
    }

    pub fn is_arrived(&self) -> bool {
        self.state() == Some(NavigationState::Arrived)
    }

    /// Start a new attempt
    pub fn reset(&mut self, goal: NavigationGoal) {
        info!(
            "New goal ({:.3}, {:.3}), position tolerance {}, angle tolerance {}",
            goal.target().x,
            goal.target().y,
            goal.position_tolerance(),
            goal.angle_tolerance()
        );
        self.goal = goal;
        self.last = None;
    }

    /// Decide this tick's command from fresh sensor readings
    pub fn update(&mut self, position: Point2D, heading: Angle) -> Decision {
        let decision = if self.is_arrived() {
            Decision::ARRIVED
        } else {
            step(position, heading, &self.goal)
        };
        debug!(
            "pos=({:.3}, {:.3}) heading={:.2} -> {} {:?}",
            position.x, position.y, heading, decision.state, decision.command
        );
        self.record(decision)
    }

    /// Decide this tick's command when the heading is unavailable
    ///
    /// Arrival needs no heading and is still evaluated; otherwise the
    /// configured [`HeadingLossPolicy`] applies.
    pub fn update_without_heading(&mut self, position: Point2D) -> Decision {
        if self.is_arrived() || self.goal.is_reached_by(position) {
            return self.record(Decision::ARRIVED);
        }

        let state = self.state().unwrap_or(NavigationState::Rotating);
        let command = match (self.heading_loss, self.last) {
            (HeadingLossPolicy::Hold, Some(last)) => last.command,
            _ => MotionCommand::Stop,
        };
        self.record(Decision::new(state, command))
    }

    fn record(&mut self, decision: Decision) -> Decision {
        let previous = self.state();
        if previous != Some(decision.state) {
            match previous {
                Some(prev) => info!("Navigation state {} -> {}", prev, decision.state),
                None => info!("Navigation state {}", decision.state),
            }
        }
        self.last = Some(decision);
        decision
    }
}
