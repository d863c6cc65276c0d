use rand::Rng;

pub mod gaussian_sampler;

/// A scalar noise source drawing from a caller-supplied generator.
///
/// The generator is passed in on every call so one seeded source can feed every
/// sampler in a filter step, which keeps runs reproducible.
pub trait Sampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;

    fn sample_batch<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}
