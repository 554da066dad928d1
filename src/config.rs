//! Configuration loading for go-to-coordinate runs

use crate::common::types::Point2D;
use crate::control::controllers::{TrackedDriveController, DEFAULT_MAX_SPEED};
use crate::error::{NavError, Result};
use crate::navigation::geometry::ArrivalTest;
use crate::navigation::goal::{NavigationGoal, DEFAULT_ANGLE_TOLERANCE, DEFAULT_POSITION_TOLERANCE};
use crate::navigation::HeadingLossPolicy;
use crate::perception::heading::HeadingEstimator;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GotoConfig {
    pub goal: GoalConfig,
    pub heading: HeadingConfig,
    pub drive: DriveConfig,
    pub control: ControlConfig,
    pub sim: SimConfig,

    /// Waypoints visited in order; when empty, `[goal]` is the only target
    pub path: Vec<WaypointConfig>,
}

/// One `[[path]]` entry
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct WaypointConfig {
    pub x: f64,
    pub y: f64,
}

/// Target and tolerances
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    pub target_x: f64,
    pub target_y: f64,

    /// Arrival tolerance in world units (default: 0.5)
    pub position_tolerance: f64,

    /// Heading tolerance in degrees (default: 3.0)
    pub angle_tolerance: f64,

    /// "axis_aligned" (default) or "euclidean"
    pub arrival_test: ArrivalTest,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            target_x: 2.0,
            target_y: 2.0,
            position_tolerance: DEFAULT_POSITION_TOLERANCE,
            angle_tolerance: DEFAULT_ANGLE_TOLERANCE,
            arrival_test: ArrivalTest::default(),
        }
    }
}

/// Heading sensor settings
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct HeadingConfig {
    /// Compass mounting offset in degrees
    pub offset_deg: f64,

    /// "hold" (default) or "stop"
    pub on_heading_loss: HeadingLossPolicy,
}

/// Track motor settings
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Motor setpoint magnitude in rad/s (default: 6.28)
    pub max_speed: f64,

    /// Rotation setpoint in rad/s; derived from the angle tolerance when unset
    pub turn_speed: Option<f64>,

    /// Motors drive backwards on a positive setpoint
    pub reversed: bool,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            max_speed: DEFAULT_MAX_SPEED,
            turn_speed: None,
            reversed: false,
        }
    }
}

/// Largest share of the angle tolerance one rotate tick may cover
///
/// The dead band is twice the tolerance wide, so a step up to the tolerance
/// always lands inside it; the margin absorbs rounding.
const MAX_TURN_STEP_FRACTION: f64 = 0.9;

/// Control loop timing
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Tick period in milliseconds (default: 32)
    pub tick_ms: u64,

    /// Give up after this many ticks
    pub max_ticks: Option<u64>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_ms: 32,
            max_ticks: Some(5000),
        }
    }
}

/// Simulated robot parameters
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub start_x: f64,
    pub start_y: f64,

    /// Initial heading in degrees
    pub start_heading_deg: f64,

    /// Track sprocket radius in meters (default: 0.04)
    pub wheel_radius: f64,

    /// Distance between track centerlines in meters (default: 0.3)
    pub track_width: f64,

    /// Report a zero compass vector on every n-th read
    pub heading_dropout_every: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_x: 0.0,
            start_y: 0.0,
            start_heading_deg: 0.0,
            wheel_radius: 0.04,
            track_width: 0.3,
            heading_dropout_every: None,
        }
    }
}

impl GotoConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GotoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.control.tick_ms == 0 {
            return Err(NavError::Config("control.tick_ms must be positive".to_string()));
        }
        if !(self.drive.max_speed > 0.0) || !self.drive.max_speed.is_finite() {
            return Err(NavError::Config("drive.max_speed must be positive".to_string()));
        }
        if !self.heading.offset_deg.is_finite() {
            return Err(NavError::Config(format!(
                "heading.offset_deg must be finite, got {}",
                self.heading.offset_deg
            )));
        }
        if let Some(turn_speed) = self.drive.turn_speed {
            if !(turn_speed > 0.0) || !turn_speed.is_finite() {
                return Err(NavError::Config("drive.turn_speed must be positive".to_string()));
            }
            let step = self.turn_step_deg(turn_speed);
            if step > self.goal.angle_tolerance {
                return Err(NavError::Config(format!(
                    "drive.turn_speed {} turns {:.2} deg per tick, more than the {} deg angle tolerance; \
                     rotation would overshoot the aligned band",
                    turn_speed, step, self.goal.angle_tolerance
                )));
            }
        }
        if !(self.sim.wheel_radius > 0.0) || !(self.sim.track_width > 0.0) {
            return Err(NavError::Config(
                "sim.wheel_radius and sim.track_width must be positive".to_string(),
            ));
        }
        if self.sim.heading_dropout_every == Some(0) {
            return Err(NavError::Config(
                "sim.heading_dropout_every must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the navigation goal, validating its tolerances
    pub fn goal(&self) -> Result<NavigationGoal> {
        self.goal_at(Point2D::new(self.goal.target_x, self.goal.target_y))
    }

    fn goal_at(&self, target: Point2D) -> Result<NavigationGoal> {
        let g = &self.goal;
        Ok(NavigationGoal::new(target, g.position_tolerance, g.angle_tolerance)?
            .with_arrival_test(g.arrival_test))
    }

    /// Goals to visit in order: the `[[path]]` waypoints, or the single `[goal]`
    ///
    /// Waypoints share the tolerances and arrival test of `[goal]`.
    pub fn goals(&self) -> Result<Vec<NavigationGoal>> {
        if self.path.is_empty() {
            return Ok(vec![self.goal()?]);
        }
        self.path
            .iter()
            .map(|w| self.goal_at(Point2D::new(w.x, w.y)))
            .collect()
    }

    /// Degrees turned in one tick of in-place rotation at `turn_speed`
    fn turn_step_deg(&self, turn_speed: f64) -> f64 {
        let omega = 2.0 * turn_speed * self.sim.wheel_radius / self.sim.track_width;
        (omega * self.tick_period().as_secs_f64()).to_degrees()
    }

    /// Rotation setpoint: the configured one, or the fastest that cannot step
    /// across the aligned band in a single tick
    pub fn turn_speed(&self) -> f64 {
        self.drive.turn_speed.unwrap_or_else(|| {
            let per_tick = self.turn_step_deg(1.0);
            let limit = MAX_TURN_STEP_FRACTION * self.goal.angle_tolerance / per_tick;
            if limit.is_finite() && limit > 0.0 {
                self.drive.max_speed.min(limit)
            } else {
                self.drive.max_speed
            }
        })
    }

    pub fn heading_estimator(&self) -> HeadingEstimator {
        HeadingEstimator::new(self.heading.offset_deg)
    }

    pub fn drive_controller(&self) -> TrackedDriveController {
        TrackedDriveController::new(self.drive.max_speed, self.drive.reversed)
            .with_turn_speed(self.turn_speed())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.control.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = GotoConfig::from_toml("").unwrap();
        let goal = config.goal().unwrap();
        assert_eq!(goal.target(), Point2D::new(2.0, 2.0));
        assert_eq!(goal.position_tolerance(), 0.5);
        assert_eq!(goal.angle_tolerance(), 3.0);
        assert_eq!(config.control.tick_ms, 32);
        assert_eq!(config.heading.on_heading_loss, HeadingLossPolicy::Hold);
    }

    #[test]
    fn test_partial_sections() {
        let config = GotoConfig::from_toml(
            r#"
            [goal]
            target_x = -1.5
            arrival_test = "euclidean"

            [heading]
            offset_deg = 90.0
            on_heading_loss = "stop"

            [drive]
            reversed = true
            "#,
        )
        .unwrap();
        let goal = config.goal().unwrap();
        assert_eq!(goal.target(), Point2D::new(-1.5, 2.0));
        assert_eq!(goal.arrival_test(), ArrivalTest::Euclidean);
        assert_eq!(config.heading.on_heading_loss, HeadingLossPolicy::Stop);
        assert_eq!(config.heading_estimator().offset_deg(), 90.0);
        assert_eq!(config.drive_controller().mount_sign(), -1.0);
        assert_eq!(config.drive.max_speed, DEFAULT_MAX_SPEED);
    }

    #[test]
    fn test_invalid_goal_is_reported_by_goal() {
        let config = GotoConfig::from_toml("[goal]\nposition_tolerance = 0.0\n").unwrap();
        assert!(matches!(config.goal(), Err(NavError::InvalidGoal(_))));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GotoConfig::from_toml("[control]\ntick_ms = 0\n"),
            Err(NavError::Config(_))
        ));
        assert!(matches!(
            GotoConfig::from_toml("[goal]\narrival_test = \"circle\"\n"),
            Err(NavError::Config(_))
        ));
        assert!(matches!(
            GotoConfig::from_toml("[sim]\nheading_dropout_every = 0\n"),
            Err(NavError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_heading_offset() {
        assert!(matches!(
            GotoConfig::from_toml("[heading]\noffset_deg = nan\n"),
            Err(NavError::Config(_))
        ));
        assert!(matches!(
            GotoConfig::from_toml("[heading]\noffset_deg = inf\n"),
            Err(NavError::Config(_))
        ));
    }

    #[test]
    fn test_derived_turn_speed_stays_inside_tolerance() {
        for tolerance in [0.5, 1.0, 3.0, 10.0] {
            let mut config = GotoConfig::default();
            config.goal.angle_tolerance = tolerance;
            let turn_speed = config.turn_speed();
            assert!(turn_speed <= config.drive.max_speed);
            assert!(config.turn_step_deg(turn_speed) < tolerance);
        }
        // Wide tolerance leaves the motors at full speed
        let mut config = GotoConfig::default();
        config.goal.angle_tolerance = 10.0;
        assert_eq!(config.turn_speed(), DEFAULT_MAX_SPEED);
        assert_eq!(config.drive_controller().turn_speed(), DEFAULT_MAX_SPEED);
    }

    #[test]
    fn test_rejects_turn_speed_that_overshoots() {
        // 6.28 rad/s on the default geometry turns ~3.07 deg per 32 ms tick
        let err = GotoConfig::from_toml("[goal]\nangle_tolerance = 1.0\n[drive]\nturn_speed = 6.28\n");
        assert!(matches!(err, Err(NavError::Config(_))));
        let ok = GotoConfig::from_toml("[goal]\nangle_tolerance = 1.0\n[drive]\nturn_speed = 1.5\n")
            .unwrap();
        assert_eq!(ok.drive_controller().turn_speed(), 1.5);
    }

    #[test]
    fn test_path_waypoints() {
        let config = GotoConfig::from_toml(
            r#"
            [goal]
            position_tolerance = 0.25

            [[path]]
            x = 1.0
            y = 0.0

            [[path]]
            x = -2.0
            y = 3.0
            "#,
        )
        .unwrap();
        let goals = config.goals().unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].target(), Point2D::new(1.0, 0.0));
        assert_eq!(goals[1].target(), Point2D::new(-2.0, 3.0));
        assert!(goals.iter().all(|g| g.position_tolerance() == 0.25));

        let single = GotoConfig::default().goals().unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].target(), Point2D::new(2.0, 2.0));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[goal]\ntarget_x = 4.0\ntarget_y = -3.0").unwrap();
        let config = GotoConfig::load(file.path()).unwrap();
        assert_eq!(config.goal().unwrap().target(), Point2D::new(4.0, -3.0));

        let missing = GotoConfig::load(Path::new("/nonexistent/goto.toml"));
        assert!(matches!(missing, Err(NavError::Config(_))));
    }
}
