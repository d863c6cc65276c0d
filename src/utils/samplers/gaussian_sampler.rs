use rand::{distr::Distribution, Rng};
use rand_distr::Normal;

use super::Sampler;
use crate::error::{LocalizationError, Result};

/// Zero-mean gaussian noise for one channel of the motion or sensor model.
///
/// A standard deviation of zero is allowed and yields exact, noiseless samples.
#[derive(Clone, Copy, Debug)]
pub struct GaussianSampler {
    channel: &'static str,
    distribution: Normal<f64>,
}

impl GaussianSampler {
    pub fn new(channel: &'static str, std_dev: f64) -> Result<Self> {
        let invalid = LocalizationError::InvalidNoise {
            channel,
            sigma: std_dev,
        };
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(invalid);
        }
        let distribution = Normal::new(0.0, std_dev).map_err(|_| invalid)?;

        Ok(Self {
            channel,
            distribution,
        })
    }

    pub fn channel(&self) -> &'static str {
        self.channel
    }

    pub fn std_dev(&self) -> f64 {
        self.distribution.std_dev()
    }
}

impl Sampler for GaussianSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.distribution.sample(rng)
    }
}
