use bon::Builder;
use rand::Rng;

use super::ParticleCloud;
use crate::{
    error::Result,
    utils::samplers::{gaussian_sampler::GaussianSampler, Sampler},
};

/// Standard deviations of the three independent odometry error channels.
#[derive(Clone, Copy, PartialEq, Debug, Builder)]
pub struct NoiseParameters {
    /// Error in distance travelled per forward command, in world units.
    #[builder(default = 0.2)]
    pub forward_distance: f64,

    /// Heading drift picked up per forward command, in radians.
    #[builder(default = 0.01)]
    pub forward_drift: f64,

    /// Error per pure rotation, in radians.
    #[builder(default = 0.02)]
    pub rotation: f64,
}

impl NoiseParameters {
    /// All channels zero. Particles then follow the commands exactly.
    pub fn noiseless() -> Self {
        Self::builder()
            .forward_distance(0.0)
            .forward_drift(0.0)
            .rotation(0.0)
            .build()
    }
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[macro_export]
macro_rules! params_noise {
    (
        $($key:ident : $value:expr),* $(,)?
    ) => {
        $crate::particle_filter::motion::NoiseParameters::builder()
            $(.$key($value))*
            .build()
    };
}
pub use params_noise;

/// Odometry motion model. Every particle draws its own noise on every
/// command, which is what lets the cloud spread with travelled distance.
#[derive(Clone, Copy, Debug)]
pub struct MotionModel {
    forward_distance: GaussianSampler,
    forward_drift: GaussianSampler,
    rotation: GaussianSampler,
}

impl MotionModel {
    pub fn new(noise: &NoiseParameters) -> Result<Self> {
        Ok(Self {
            forward_distance: GaussianSampler::new("forward distance", noise.forward_distance)?,
            forward_drift: GaussianSampler::new("forward drift", noise.forward_drift)?,
            rotation: GaussianSampler::new("rotation", noise.rotation)?,
        })
    }

    pub fn move_forward<R: Rng + ?Sized>(
        &self,
        cloud: &mut ParticleCloud,
        distance: f64,
        rng: &mut R,
    ) {
        for particle in cloud.particles.iter_mut() {
            particle
                .pose
                .move_forward(distance + self.forward_distance.sample(rng));
            particle.pose.rotate(self.forward_drift.sample(rng));
        }
    }

    pub fn rotate<R: Rng + ?Sized>(&self, cloud: &mut ParticleCloud, angle: f64, rng: &mut R) {
        for particle in cloud.particles.iter_mut() {
            particle.pose.rotate(angle + self.rotation.sample(rng));
        }
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::differential::pose::Pose;

    #[test]
    fn noiseless_motion_is_exact() {
        let model = MotionModel::new(&NoiseParameters::noiseless()).unwrap();
        let mut cloud = ParticleCloud::new(10, Pose::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        model.move_forward(&mut cloud, 10.0, &mut rng);
        model.rotate(&mut cloud, FRAC_PI_2, &mut rng);
        model.move_forward(&mut cloud, 5.0, &mut rng);

        for particle in cloud.particles() {
            assert_abs_diff_eq!(particle.pose.x(), 10.0, epsilon = 1e-12);
            assert_abs_diff_eq!(particle.pose.y(), 5.0, epsilon = 1e-12);
            assert_abs_diff_eq!(particle.pose.orientation(), FRAC_PI_2);
        }
    }

    #[test]
    fn each_particle_draws_its_own_noise() {
        let model = MotionModel::new(&params_noise!(forward_distance: 0.5, forward_drift: 0.05))
            .unwrap();
        let mut cloud = ParticleCloud::new(100, Pose::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        model.move_forward(&mut cloud, 20.0, &mut rng);

        let mut xs: Vec<f64> = cloud.particles().iter().map(|p| p.pose.x()).collect();
        let mut headings: Vec<f64> = cloud.particles().iter().map(|p| p.pose.orientation()).collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();
        headings.sort_by(f64::total_cmp);
        headings.dedup();
        assert_eq!(xs.len(), 100);
        assert_eq!(headings.len(), 100);
    }

    #[test]
    fn spread_grows_with_repeated_motion() {
        let model = MotionModel::new(&params_noise!(rotation: 0.1)).unwrap();
        let mut cloud = ParticleCloud::new(200, Pose::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let spread = |cloud: &ParticleCloud| {
            let headings: Vec<f64> = cloud.particles().iter().map(|p| p.pose.orientation()).collect();
            let mean = headings.iter().sum::<f64>() / headings.len() as f64;
            headings.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / headings.len() as f64
        };

        model.rotate(&mut cloud, 0.0, &mut rng);
        let after_one = spread(&cloud);
        for _ in 0..8 {
            model.rotate(&mut cloud, 0.0, &mut rng);
        }
        assert!(spread(&cloud) > 3.0 * after_one);
    }

    #[test]
    fn rotation_wraps_heading() {
        let model = MotionModel::new(&NoiseParameters::noiseless()).unwrap();
        let mut cloud = ParticleCloud::new(3, Pose::new(0, 0, 3.0)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        model.rotate(&mut cloud, 1.0, &mut rng);
        for particle in cloud.particles() {
            assert_abs_diff_eq!(particle.pose.orientation(), 4.0 - 2.0 * PI, epsilon = 1e-12);
        }
    }
}
