//! A ground-truth stand-in for the real motors and sonar.

use std::sync::Arc;

use bon::Builder;
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{DriveScale, Drivetrain};
use crate::{
    differential::pose::Pose,
    error::Result,
    map::Map,
    particle_filter::sensors::sonar::{Sonar, SonarParameters},
    utils::samplers::{gaussian_sampler::GaussianSampler, Sampler},
};

#[derive(Clone, Copy, PartialEq, Debug, Builder)]
pub struct SimulationParameters {
    /// Distance error per forward command, in world units.
    #[builder(default = 0.1)]
    pub forward_sigma: f64,

    /// Heading drift per forward command, in radians.
    #[builder(default = 0.005)]
    pub drift_sigma: f64,

    #[builder(default = 0.01)]
    pub rotation_sigma: f64,

    /// Range noise per sonar reading, in world units.
    #[builder(default = 1.0)]
    pub range_sigma: f64,

    /// Probability that a reading faults and returns nothing.
    #[builder(default = 0.05)]
    pub dropout: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Commands as the drivetrain received them, in actuator units.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DriveCommand {
    Forward(f64),
    Rotate(f64),
}

/// Simulated rig with a hidden true pose.
///
/// Motion is applied to the true pose with its own noise; readings ray cast
/// the map from the true pose, add gaussian noise and saturate at the sonar's
/// maximum range.
pub struct SimulatedDrivetrain<R: Rng = StdRng> {
    pose: Pose,
    sonar: Sonar,
    scale: DriveScale,
    forward: GaussianSampler,
    drift: GaussianSampler,
    rotation: GaussianSampler,
    range: GaussianSampler,
    dropout: f64,
    commands: Vec<DriveCommand>,
    rng: R,
}

impl SimulatedDrivetrain<StdRng> {
    pub fn new(
        map: Arc<Map>,
        start: Pose,
        scale: DriveScale,
        sonar: SonarParameters,
        params: SimulationParameters,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(map, start, scale, sonar, params, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SimulatedDrivetrain<R> {
    pub fn with_rng(
        map: Arc<Map>,
        start: Pose,
        scale: DriveScale,
        sonar: SonarParameters,
        params: SimulationParameters,
        rng: R,
    ) -> Result<Self> {
        Ok(Self {
            pose: start,
            sonar: Sonar::new(map, sonar)?,
            scale,
            forward: GaussianSampler::new("simulated forward", params.forward_sigma)?,
            drift: GaussianSampler::new("simulated drift", params.drift_sigma)?,
            rotation: GaussianSampler::new("simulated rotation", params.rotation_sigma)?,
            range: GaussianSampler::new("simulated range", params.range_sigma)?,
            dropout: if params.dropout.is_nan() {
                0.0
            } else {
                params.dropout.clamp(0.0, 1.0)
            },
            commands: Vec::new(),
            rng,
        })
    }

    /// Where the robot really is.
    pub fn true_pose(&self) -> Pose {
        self.pose
    }

    pub fn commands(&self) -> &[DriveCommand] {
        &self.commands
    }
}

impl<R: Rng> Drivetrain for SimulatedDrivetrain<R> {
    fn move_forward(&mut self, rotations: f64) {
        self.commands.push(DriveCommand::Forward(rotations));
        let distance = rotations / self.scale.rotations_per_unit;
        self.pose
            .move_forward(distance + self.forward.sample(&mut self.rng));
        self.pose.rotate(self.drift.sample(&mut self.rng));
        trace!("simulated pose {:?}", self.pose);
    }

    fn rotate(&mut self, rotations: f64) {
        self.commands.push(DriveCommand::Rotate(rotations));
        let angle = rotations / self.scale.rotations_per_radian;
        self.pose
            .rotate(angle + self.rotation.sample(&mut self.rng));
        trace!("simulated pose {:?}", self.pose);
    }

    fn read_range(&mut self) -> Option<f64> {
        if self.rng.random_bool(self.dropout) {
            return None;
        }
        let max_range = self.sonar.params().max_range;
        let expected = self.sonar.expected_distance(&self.pose).min(max_range);
        let reading = expected + self.range.sample(&mut self.rng);
        Some(reading.clamp(0.0, max_range))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn quiet() -> SimulationParameters {
        SimulationParameters::builder()
            .forward_sigma(0.0)
            .drift_sigma(0.0)
            .rotation_sigma(0.0)
            .range_sigma(0.0)
            .dropout(0.0)
            .build()
    }

    #[test]
    fn scale_converts_back_to_world_units() {
        let scale = DriveScale::builder()
            .rotations_per_unit(0.5)
            .rotations_per_radian(2.0)
            .build();
        let mut rig = SimulatedDrivetrain::new(
            Arc::new(Map::square(168.0)),
            Pose::new(20, 84, 0),
            scale,
            SonarParameters::default(),
            quiet(),
            0,
        )
        .unwrap();

        rig.move_forward(5.0);
        assert_abs_diff_eq!(rig.true_pose().x(), 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rig.read_range().unwrap(), 138.0, epsilon = 1e-9);

        rig.rotate(core::f64::consts::PI);
        assert_abs_diff_eq!(
            rig.true_pose().orientation(),
            core::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
        assert_eq!(
            rig.commands(),
            &[DriveCommand::Forward(5.0), DriveCommand::Rotate(core::f64::consts::PI)]
        );
    }

    #[test]
    fn readings_fault_and_saturate() {
        let params = SimulationParameters::builder()
            .dropout(1.0)
            .build();
        let mut faulty = SimulatedDrivetrain::new(
            Arc::new(Map::square(168.0)),
            Pose::new(84, 84, 0),
            DriveScale::default(),
            SonarParameters::default(),
            params,
            1,
        )
        .unwrap();
        assert_eq!(faulty.read_range(), None);

        let mut outside = SimulatedDrivetrain::new(
            Arc::new(Map::square(168.0)),
            Pose::new(-50, -50, core::f64::consts::PI),
            DriveScale::default(),
            SonarParameters::default(),
            quiet(),
            1,
        )
        .unwrap();
        assert_eq!(outside.read_range(), Some(255.0));
    }
}
