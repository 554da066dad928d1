use anyhow::Result;
use goto_core::sim::SimulatedRobot;
use goto_core::{simulated_path_follower, GotoConfig, NavigationState, PathOutcome, WaypointFollower};
use std::path::Path;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => GotoConfig::load(Path::new(&path))?,
        None => GotoConfig::default(),
    };
    let dt = config.tick_period().as_secs_f64();

    println!("Initializing go-to-coordinate core...");
    let (mut follower, robot) = simulated_path_follower(&config)?;

    let mut last_state = None;
    let result = loop {
        match run_tick(&mut follower, &robot, &mut last_state, dt) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }
    };

    // Stop the motors even when a tick failed
    let stopped = follower.shutdown();
    result?;
    stopped?;
    println!("Core shutdown successfully!");
    Ok(())
}

/// Tick once and print state changes; `Ok(true)` when the path is done
fn run_tick(
    follower: &mut WaypointFollower,
    robot: &SimulatedRobot,
    last_state: &mut Option<NavigationState>,
    dt: f64,
) -> goto_core::Result<bool> {
    match follower.tick()? {
        PathOutcome::Continue(decision) => {
            if *last_state != Some(decision.state) {
                let p = robot.position()?;
                println!(
                    "tick {:>5}  ({:>7.3}, {:>7.3})  heading {:>6.1}  {}",
                    follower.control().ticks(),
                    p.x,
                    p.y,
                    robot.heading_deg()?,
                    decision.state
                );
                *last_state = Some(decision.state);
            }
            robot.advance(dt)?;
            Ok(false)
        }
        PathOutcome::WaypointReached { index, target } => {
            println!(
                "waypoint {:>2}  ({:>7.3}, {:>7.3})  ARRIVED",
                index, target.x, target.y
            );
            *last_state = None;
            Ok(false)
        }
        PathOutcome::Completed => {
            let p = robot.position()?;
            println!(
                "tick {:>5}  ({:>7.3}, {:>7.3})  ARRIVED",
                follower.control().ticks(),
                p.x,
                p.y
            );
            Ok(true)
        }
    }
}
