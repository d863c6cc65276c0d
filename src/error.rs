//! Error types for the localization core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocalizationError {
    #[error("noise sigma for {channel} must be finite and non-negative, got {sigma}")]
    InvalidNoise { channel: &'static str, sigma: f64 },

    #[error("sonar parameters rejected: {0}")]
    InvalidSonar(String),

    #[error("waypoint ({x}, {y}) is not a finite coordinate")]
    InvalidWaypoint { x: f64, y: f64 },

    #[error("max step {max_step} must exceed the overshoot margin {overshoot}")]
    InvalidStep { max_step: f64, overshoot: f64 },

    #[error("motion command {value} is not finite")]
    InvalidMotion { value: f64 },

    #[error("collected {valid} of {required} valid sonar readings in {attempts} attempts")]
    SensorQuorum {
        valid: usize,
        required: usize,
        attempts: usize,
    },

    #[error("a particle cloud needs at least one particle")]
    EmptyCloud,

    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("expected two numbers, got {0:?}")]
    ParseWaypoint(String),
}

pub type Result<T> = core::result::Result<T, LocalizationError>;
