use anyhow::{Context, Result};
use clap::Parser;
use goto_core::sim::SimulatedRobot;
use goto_core::{simulated_path_follower, GotoConfig, NavError, PathOutcome, WaypointFollower};
use log::{error, info, LevelFilter};
use std::path::PathBuf;

/// Drive a simulated tracked robot to a target coordinate
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the target x coordinate
    #[arg(long, allow_hyphen_values = true)]
    target_x: Option<f64>,

    /// Override the target y coordinate
    #[arg(long, allow_hyphen_values = true)]
    target_y: Option<f64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut config = match &args.config {
        Some(path) => GotoConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GotoConfig::default(),
    };
    if let Some(x) = args.target_x {
        config.goal.target_x = x;
        config.path.clear();
    }
    if let Some(y) = args.target_y {
        config.goal.target_y = y;
        config.path.clear();
    }

    info!("goto_coordinate_node v{}", env!("CARGO_PKG_VERSION"));
    let (mut follower, robot) = simulated_path_follower(&config)?;

    let period = config.tick_period();
    let dt = period.as_secs_f64();
    let mut interval = tokio::time::interval(period);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted");
                break Ok(());
            }
            _ = interval.tick() => {
                match step(&mut follower, &robot, dt) {
                    Ok(false) => {}
                    Ok(true) => break Ok(()),
                    Err(e @ NavError::Timeout(_)) => break Err(e),
                    Err(e) => {
                        error!("Control loop failed: {}", e);
                        break Err(e);
                    }
                }
            }
        }
    };

    // Leave no setpoint active, whatever ended the loop
    let stopped = follower.shutdown();
    result?;
    stopped.map_err(Into::into)
}

/// One tick of the path; `Ok(true)` once the last waypoint is reached
fn step(follower: &mut WaypointFollower, robot: &SimulatedRobot, dt: f64) -> goto_core::Result<bool> {
    match follower.tick()? {
        PathOutcome::Continue(_) => {
            robot.advance(dt)?;
            Ok(false)
        }
        PathOutcome::WaypointReached { .. } => Ok(false),
        PathOutcome::Completed => {
            let p = robot.position()?;
            info!("Target position reached at ({:.3}, {:.3})", p.x, p.y);
            Ok(true)
        }
    }
}
