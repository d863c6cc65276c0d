//! Monte Carlo localization for a differential robot with a single sonar,
//! and a waypoint controller driving from the belief.

pub mod devices;
#[macro_use]
pub mod differential;
pub mod draw;
pub mod error;
pub mod logger;
pub mod map;
pub mod particle_filter;
pub mod utils;

pub use differential::{pose::Pose, robot::Robot, robot::RobotSettings};
pub use error::{LocalizationError, Result};
pub use map::{Map, Wall};
