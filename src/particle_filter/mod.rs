pub mod motion;
pub mod sensors;

use log::{trace, warn};
use rand::{
    distr::{weighted::WeightedIndex, Distribution},
    Rng,
};
use sensors::ParticleFilterSensor;

use crate::{
    differential::pose::Pose,
    error::{LocalizationError, Result},
};

/// Weights must sum to one within this after every resample.
pub const WEIGHT_TOLERANCE: f64 = 1e-3;

/// One pose hypothesis and its probability mass.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WeightedParticle {
    pub pose: Pose,
    pub weight: f64,
}

impl WeightedParticle {
    pub fn new(pose: Pose, weight: f64) -> Self {
        Self { pose, weight }
    }

    pub fn clone_with_weight(&self, weight: f64) -> Self {
        Self {
            pose: self.pose,
            weight,
        }
    }
}

/// Fixed-size particle approximation of the belief over the robot pose.
#[derive(Clone, Debug)]
pub struct ParticleCloud {
    particles: Vec<WeightedParticle>,
}

impl ParticleCloud {
    /// `particle_count` copies of `start`, uniformly weighted.
    pub fn new(particle_count: usize, start: Pose) -> Result<Self> {
        if particle_count == 0 {
            return Err(LocalizationError::EmptyCloud);
        }
        let weight = 1.0 / particle_count as f64;
        Ok(Self {
            particles: vec![WeightedParticle::new(start, weight); particle_count],
        })
    }

    pub fn from_particles(particles: Vec<WeightedParticle>) -> Result<Self> {
        if particles.is_empty() {
            return Err(LocalizationError::EmptyCloud);
        }
        Ok(Self { particles })
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[WeightedParticle] {
        &self.particles
    }

    pub fn poses(&self) -> Vec<Pose> {
        self.particles.iter().map(|particle| particle.pose).collect()
    }

    pub fn total_weight(&self) -> f64 {
        self.particles.iter().map(|particle| particle.weight).sum()
    }

    fn reset_weights(&mut self) {
        let weight = 1.0 / self.particles.len() as f64;
        for particle in self.particles.iter_mut() {
            particle.weight = weight;
        }
    }

    /// Scores every particle against `measured` and redraws the cloud.
    ///
    /// Each particle's likelihood has the sensor floor added, the scores are
    /// normalised into a probability mass function, and `len()` particles are
    /// drawn from it with replacement. A drawn particle carries its normalised
    /// score as weight; the drawn weights are then renormalised so they sum
    /// to one.
    pub fn resample<S: ParticleFilterSensor + ?Sized, R: Rng + ?Sized>(
        &mut self,
        sensor: &S,
        measured: f64,
        rng: &mut R,
    ) {
        let floor = sensor.floor();
        let scores: Vec<f64> = self
            .particles
            .iter()
            .map(|particle| {
                let likelihood = sensor.likelihood(&particle.pose, measured);
                let likelihood = if likelihood.is_finite() && likelihood > 0.0 {
                    likelihood
                } else {
                    0.0
                };
                likelihood + floor
            })
            .collect();

        let total: f64 = scores.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            warn!("every particle scored zero against {measured}, keeping the cloud");
            self.reset_weights();
            return;
        }
        let probabilities: Vec<f64> = scores.iter().map(|score| score / total).collect();

        let index = match WeightedIndex::new(&probabilities) {
            Ok(index) => index,
            Err(error) => {
                warn!("could not build sampling distribution: {error}");
                self.reset_weights();
                return;
            }
        };

        let mut drawn: Vec<WeightedParticle> = (0..self.particles.len())
            .map(|_| {
                let source = index.sample(rng);
                self.particles[source].clone_with_weight(probabilities[source])
            })
            .collect();

        let drawn_total: f64 = drawn.iter().map(|particle| particle.weight).sum();
        for particle in drawn.iter_mut() {
            particle.weight /= drawn_total;
        }
        self.particles = drawn;

        debug_assert!(
            (self.total_weight() - 1.0).abs() < WEIGHT_TOLERANCE,
            "weights sum to {} after resampling",
            self.total_weight()
        );
        trace!("resampled {} particles against {measured}", self.particles.len());
    }

    /// Weighted mean of the cloud.
    ///
    /// Positions are averaged with pose arithmetic. Headings are averaged on
    /// the unit circle so a cloud straddling ±π does not collapse to zero.
    pub fn mean_pose(&self) -> Pose {
        let total = self.total_weight();
        let sum = self
            .particles
            .iter()
            .fold(Pose::default(), |acc, particle| acc + particle.pose * particle.weight);
        let mean = if total > 0.0 { sum / total } else { sum };

        let (sin, cos) = self.particles.iter().fold((0.0, 0.0), |(sin, cos), particle| {
            let heading = particle.pose.orientation();
            (
                sin + particle.weight * heading.sin(),
                cos + particle.weight * heading.cos(),
            )
        });
        if sin == 0.0 && cos == 0.0 {
            return mean.with_orientation(0.0);
        }
        mean.with_orientation(sin.atan2(cos))
    }
}
