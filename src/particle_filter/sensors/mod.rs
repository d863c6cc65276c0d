use crate::differential::pose::Pose;

pub mod sonar;

/// A sensor that can score a pose hypothesis against a measurement.
pub trait ParticleFilterSensor {
    /// Likelihood of `measured` had the robot been at `pose`, before the floor
    /// is added. Non-finite or negative values are treated as zero.
    fn likelihood(&self, pose: &Pose, measured: f64) -> f64;

    /// Probability added to every particle before normalisation so no
    /// hypothesis is ever driven to exactly zero.
    fn floor(&self) -> f64;
}
