//! The physical side of the robot: motors and the range sensor.

use bon::Builder;

pub mod simulated;

/// Blocking access to the drive motors and the sonar.
///
/// Motion commands are in actuator units (wheel rotations) and return once the
/// motion has physically finished. The robot never retries a motion itself.
pub trait Drivetrain {
    fn move_forward(&mut self, rotations: f64);

    /// Positive rotations turn counter-clockwise.
    fn rotate(&mut self, rotations: f64);

    /// One raw sonar reading, `None` when the sensor faulted.
    fn read_range(&mut self) -> Option<f64>;
}

/// Calibration from world units to actuator units.
#[derive(Clone, Copy, PartialEq, Debug, Builder)]
pub struct DriveScale {
    /// Wheel rotations per world unit driven.
    #[builder(default = 1.0)]
    pub rotations_per_unit: f64,

    /// Wheel rotations per radian turned on the spot.
    #[builder(default = 1.0)]
    pub rotations_per_radian: f64,
}

impl Default for DriveScale {
    fn default() -> Self {
        Self::builder().build()
    }
}
