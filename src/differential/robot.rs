use std::{sync::Arc, thread, time::Duration};

use bon::Builder;
use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{motions::linear::NavigationParameters, pose::Pose};
use crate::{
    devices::{DriveScale, Drivetrain},
    draw::DrawSink,
    error::{LocalizationError, Result},
    map::Map,
    particle_filter::{
        motion::{MotionModel, NoiseParameters},
        sensors::sonar::{Sonar, SonarParameters},
        ParticleCloud,
    },
};

#[derive(Clone, Copy, PartialEq, Debug, Builder)]
pub struct RobotSettings {
    #[builder(default = 100)]
    pub particle_count: usize,

    /// Where every particle starts.
    #[builder(default)]
    pub start: Pose,

    /// Wait after each motion before the sonar is read.
    #[builder(default = Duration::ZERO)]
    pub settle: Duration,

    #[builder(default)]
    pub noise: NoiseParameters,

    #[builder(default)]
    pub sonar: SonarParameters,

    #[builder(default)]
    pub navigation: NavigationParameters,

    #[builder(default)]
    pub scale: DriveScale,

    /// Seed for the filter's noise. Drawn from the OS when unset.
    pub seed: Option<u64>,
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The localizing robot: belief, noise models and the hardware it drives.
///
/// Every public motion runs the full belief update on its way out, see
/// [`MotionScope`](super::motions::MotionScope).
pub struct Robot<D: Drivetrain, S: DrawSink, R: Rng = StdRng> {
    pub(crate) drivetrain: D,
    pub(crate) sink: S,
    pub(crate) rng: R,
    pub(crate) cloud: ParticleCloud,
    pub(crate) motion_model: MotionModel,
    pub(crate) sonar: Sonar,
    pub(crate) settings: RobotSettings,
    estimate: Pose,
}

impl<D: Drivetrain, S: DrawSink> Robot<D, S, StdRng> {
    pub fn new(map: Arc<Map>, drivetrain: D, sink: S, settings: RobotSettings) -> Result<Self> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(map, drivetrain, sink, settings, rng)
    }
}

impl<D: Drivetrain, S: DrawSink, R: Rng> Robot<D, S, R> {
    /// Builds the robot with all particles on `settings.start` and draws the
    /// map and the initial cloud.
    pub fn with_rng(
        map: Arc<Map>,
        drivetrain: D,
        sink: S,
        settings: RobotSettings,
        rng: R,
    ) -> Result<Self> {
        let cloud = ParticleCloud::new(settings.particle_count, settings.start)?;
        let mut robot = Self {
            drivetrain,
            sink,
            rng,
            estimate: cloud.mean_pose(),
            cloud,
            motion_model: MotionModel::new(&settings.noise)?,
            sonar: Sonar::new(map, settings.sonar)?,
            settings,
        };

        for (_, wall) in robot.sonar.map().walls() {
            robot.sink.draw_line(&wall.start, &wall.end)?;
        }
        robot.draw()?;
        Ok(robot)
    }

    /// The current best estimate, refreshed after every belief update.
    pub fn pose(&self) -> Pose {
        self.estimate
    }

    /// Weighted mean of the cloud as it stands right now.
    pub fn mean_pose(&self) -> Pose {
        self.cloud.mean_pose()
    }

    pub fn cloud(&self) -> &ParticleCloud {
        &self.cloud
    }

    pub fn sonar(&self) -> &Sonar {
        &self.sonar
    }

    pub fn map(&self) -> &Arc<Map> {
        self.sonar.map()
    }

    pub fn settings(&self) -> &RobotSettings {
        &self.settings
    }

    pub fn drivetrain(&self) -> &D {
        &self.drivetrain
    }

    pub fn drivetrain_mut(&mut self) -> &mut D {
        &mut self.drivetrain
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Reads the sonar until a full window of valid readings is collected and
    /// returns the de-noised measurement.
    pub fn measure(&mut self) -> Result<f64> {
        let params = *self.sonar.params();
        let mut readings = Vec::with_capacity(params.samples);
        let mut attempts = 0;

        while readings.len() < params.samples {
            if params.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(LocalizationError::SensorQuorum {
                    valid: readings.len(),
                    required: params.samples,
                    attempts,
                });
            }
            attempts += 1;
            match self.drivetrain.read_range() {
                Some(reading) if reading.is_finite() => readings.push(reading),
                _ => warn!("sonar gave no reading, retrying ({attempts} attempts so far)"),
            }
        }

        self.sonar
            .denoise(&mut readings)
            .ok_or(LocalizationError::SensorQuorum {
                valid: 0,
                required: params.samples,
                attempts,
            })
    }

    /// Scores the cloud against `measured` and redraws it.
    pub fn resample(&mut self, measured: f64) {
        self.cloud.resample(&self.sonar, measured, &mut self.rng);
    }

    /// Settle, measure, resample, re-estimate and draw.
    pub fn update_belief(&mut self) -> Result<()> {
        if !self.settings.settle.is_zero() {
            thread::sleep(self.settings.settle);
        }
        let measured = self.measure()?;
        self.resample(measured);
        self.estimate = self.cloud.mean_pose();
        debug!("sonar {measured:.1}, estimate {:?}", self.estimate);
        self.draw()
    }

    /// Sends the cloud and the estimate to the draw sink.
    pub fn draw(&mut self) -> Result<()> {
        self.sink.draw_particles(&self.cloud.poses())?;
        self.sink.draw_estimate(&self.estimate)?;
        Ok(())
    }
}
