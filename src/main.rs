use std::{io::BufRead, sync::Arc, time::Duration};

use clap::Parser;
use log::{info, LevelFilter};
use sonar_mcl::{
    devices::simulated::{SimulatedDrivetrain, SimulationParameters},
    draw::{DrawSink, NullSink, TextSink},
    logger::TerminalLogger,
    map::ARENA_TOUR,
    LocalizationError, Map, Pose, Result, Robot, RobotSettings,
};

static LOGGER: TerminalLogger = TerminalLogger::new();

/// Drives a simulated sonar robot around the arena, localizing as it goes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the filter and the simulated rig
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of particles in the belief
    #[arg(short, long, default_value_t = 100)]
    particles: usize,

    /// Longest straight leg before re-orienting
    #[arg(short, long, default_value_t = 10.0)]
    max_step: f64,

    /// Wait after each motion, in milliseconds
    #[arg(long, default_value_t = 0)]
    settle_ms: u64,

    /// Drive the fixed course instead of reading waypoints from stdin
    #[arg(short, long)]
    tour: bool,

    /// Suppress the draw protocol on stdout
    #[arg(short, long)]
    quiet: bool,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Reads a waypoint as two numbers separated by spaces or a comma.
fn parse_waypoint(line: &str) -> Result<(f64, f64)> {
    let invalid = || LocalizationError::ParseWaypoint(line.trim().to_string());
    let numbers = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;

    match numbers[..] {
        [x, y] => Ok((x, y)),
        _ => Err(invalid()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if LOGGER.init(args.log_level).is_err() {
        eprintln!("a logger was already installed");
    }

    let map = Arc::new(Map::arena());
    let start = Pose::new(84, 30, 0);
    let settings = RobotSettings::builder()
        .particle_count(args.particles)
        .start(start)
        .settle(Duration::from_millis(args.settle_ms))
        .maybe_seed(args.seed)
        .build();
    let rig = SimulatedDrivetrain::new(
        map.clone(),
        start,
        settings.scale,
        settings.sonar,
        SimulationParameters::default(),
        args.seed.map_or_else(rand::random, |seed| seed.wrapping_add(1)),
    )?;
    let sink: Box<dyn DrawSink> = if args.quiet {
        Box::new(NullSink)
    } else {
        Box::new(TextSink::stdout())
    };
    let mut robot = Robot::new(map, rig, sink, settings)?;

    if args.tour {
        robot.follow(&ARENA_TOUR, args.max_step)?;
        info!(
            "tour done, estimate {:?}, true pose {:?}",
            robot.pose(),
            robot.drivetrain().true_pose()
        );
        return Ok(());
    }

    let stdin = std::io::stdin();
    eprintln!("Enter x and y coordinates:");
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_waypoint(&line).and_then(|(x, y)| robot.navigate_to(x, y, args.max_step)) {
            Ok(()) => info!("true pose {:?}", robot.drivetrain().true_pose()),
            Err(
                error @ (LocalizationError::ParseWaypoint(_)
                | LocalizationError::InvalidWaypoint { .. }),
            ) => eprintln!("{error}, please enter valid numbers for coordinates"),
            Err(error) => return Err(error),
        }
        eprintln!("Enter x and y coordinates:");
    }
    Ok(())
}
