use std::{f64::consts::FRAC_PI_4, sync::Arc};

use bon::Builder;

use super::ParticleFilterSensor;
use crate::{
    differential::pose::Pose,
    error::{LocalizationError, Result},
    map::{Map, Wall},
    utils::math::gaussian_kernel,
};

/// Denominators below this are treated as a beam parallel to the wall.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Slack for intersection points landing exactly on a wall end.
const SEGMENT_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, PartialEq, Debug, Builder)]
pub struct SonarParameters {
    /// Standard deviation of a range reading, in world units.
    #[builder(default = 2.5)]
    pub sigma: f64,

    /// Likelihood added to every particle before normalisation.
    #[builder(default = 0.01)]
    pub floor: f64,

    /// The reading the sensor saturates at.
    #[builder(default = 255.0)]
    pub max_range: f64,

    /// Beams meeting a wall at less than this angle (radians, measured from the
    /// wall surface) do not echo back and read as `max_range`.
    #[builder(default = FRAC_PI_4)]
    pub grazing_angle: f64,

    /// Added to every de-noised reading. Accounts for the sensor not sitting on
    /// the tracking centre.
    #[builder(default = 0.0)]
    pub offset: f64,

    /// Valid readings collected per measurement.
    #[builder(default = 20)]
    pub samples: usize,

    /// Index into the sorted readings used as the measurement.
    #[builder(default = 9)]
    pub rank: usize,

    /// Reads allowed before giving up on a quorum. Retries forever when unset.
    pub max_attempts: Option<usize>,
}

impl Default for SonarParameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[macro_export]
macro_rules! params_sonar {
    (
        $($key:ident : $value:expr),* $(,)?
    ) => {
        $crate::particle_filter::sensors::sonar::SonarParameters::builder()
            $(.$key($value))*
            .build()
    };
}
pub use params_sonar;

/// Single-beam range sensor scored by ray casting against the map.
#[derive(Clone, Debug)]
pub struct Sonar {
    map: Arc<Map>,
    params: SonarParameters,
}

impl Sonar {
    pub fn new(map: Arc<Map>, params: SonarParameters) -> Result<Self> {
        let reject = |reason: &str| -> Result<Self> {
            Err(LocalizationError::InvalidSonar(reason.into()))
        };
        if !(params.sigma.is_finite() && params.sigma > 0.0) {
            return reject("sigma must be positive");
        }
        if !(params.floor.is_finite() && params.floor >= 0.0) {
            return reject("floor must be non-negative");
        }
        if !(params.max_range.is_finite() && params.max_range > 0.0) {
            return reject("max range must be positive");
        }
        if !(0.0..=core::f64::consts::FRAC_PI_2).contains(&params.grazing_angle) {
            return reject("grazing angle must lie in [0, pi/2]");
        }
        if params.samples == 0 || params.rank >= params.samples {
            return reject("rank must index into a non-empty sample window");
        }
        if !params.offset.is_finite() {
            return reject("offset must be finite");
        }

        Ok(Self { map, params })
    }

    pub fn map(&self) -> &Arc<Map> {
        &self.map
    }

    pub fn params(&self) -> &SonarParameters {
        &self.params
    }

    /// Distance along the beam from `pose` to `wall`.
    ///
    /// Returns infinity when the beam runs parallel to the wall, meets its line
    /// behind the robot, or meets it outside the segment. A hit shallower than
    /// the grazing angle returns `max_range`, the way the real sensor saturates,
    /// and so does any hit further away than `max_range`.
    pub fn distance_to_wall(&self, pose: &Pose, wall: &Wall) -> f64 {
        let (ax, ay) = (wall.start.x, wall.start.y);
        let (bx, by) = (wall.end.x, wall.end.y);
        let (cos, sin) = (pose.orientation().cos(), pose.orientation().sin());

        let denominator = (by - ay) * cos - (bx - ax) * sin;
        if denominator.abs() < PARALLEL_EPSILON {
            return f64::INFINITY;
        }
        let distance = ((by - ay) * (ax - pose.x()) - (bx - ax) * (ay - pose.y())) / denominator;
        if !distance.is_finite() || distance < 0.0 {
            return f64::INFINITY;
        }

        let hit_x = pose.x() + distance * cos;
        let hit_y = pose.y() + distance * sin;
        if (hit_x - ax) * (hit_x - bx) > SEGMENT_EPSILON
            || (hit_y - ay) * (hit_y - by) > SEGMENT_EPSILON
        {
            return f64::INFINITY;
        }

        // Angle between the beam and the wall surface, in [0, pi/2].
        let along_wall = (cos * (bx - ax) + sin * (by - ay)).abs() / wall.length();
        let angle_to_wall = along_wall.min(1.0).acos();
        if angle_to_wall < self.params.grazing_angle {
            return self.params.max_range;
        }

        distance.min(self.params.max_range)
    }

    /// Nearest wall the beam actually meets, or infinity if it meets none.
    pub fn expected_distance(&self, pose: &Pose) -> f64 {
        self.map
            .walls()
            .map(|(_, wall)| self.distance_to_wall(pose, wall))
            .fold(f64::INFINITY, f64::min)
    }

    /// Returns `(expected_distance, likelihood)` of reading `measured` at `pose`.
    pub fn calculate_likelihood(&self, pose: &Pose, measured: f64) -> (f64, f64) {
        let expected = self.expected_distance(pose);
        (
            expected,
            gaussian_kernel(measured, expected, self.params.sigma),
        )
    }

    /// Collapses a window of raw readings into one measurement.
    ///
    /// The raw sensor throws occasional spurious short echoes, so a low order
    /// statistic of the sorted window is used rather than the mean.
    pub fn denoise(&self, readings: &mut [f64]) -> Option<f64> {
        readings.sort_by(f64::total_cmp);
        let rank = self.params.rank.min(readings.len().checked_sub(1)?);
        Some(readings[rank] + self.params.offset)
    }
}

impl ParticleFilterSensor for Sonar {
    fn likelihood(&self, pose: &Pose, measured: f64) -> f64 {
        self.calculate_likelihood(pose, measured).1
    }

    fn floor(&self) -> f64 {
        self.params.floor
    }
}
