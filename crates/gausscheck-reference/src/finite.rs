use gausscheck_core::{FiniteDistribution, GpError, Matrix, Process};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::bounds;
use crate::gp::ExactGp;
use crate::kernel::Kernel;

/// Restriction of an [`ExactGp`] to a finite index set with homoscedastic
/// observation noise.
#[derive(Debug, Clone)]
pub struct FiniteGp<K: Kernel> {
    process: ExactGp<K>,
    x: Vec<f64>,
    noise_variance: f64,
}

impl<K: Kernel> FiniteGp<K> {
    pub(crate) fn new(process: ExactGp<K>, x: Vec<f64>, noise_variance: f64) -> Self {
        FiniteGp {
            process,
            x,
            noise_variance,
        }
    }

    pub fn index_set(&self) -> &[f64] {
        &self.x
    }

    pub fn noise_variance(&self) -> f64 {
        self.noise_variance
    }

    pub fn process(&self) -> &ExactGp<K> {
        &self.process
    }
}

impl<K: Kernel> FiniteDistribution for FiniteGp<K> {
    type Posterior = ExactGp<K>;

    fn len(&self) -> usize {
        self.x.len()
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>, GpError> {
        let mean = self.process.mean(&self.x);
        let chol = bounds::cholesky_with_jitter(&self.cov())?;
        let white: Vec<f64> = (0..self.x.len())
            .map(|_| rng.sample::<f64, _>(StandardNormal))
            .collect();
        Ok((0..self.x.len())
            .map(|i| {
                let colored: f64 = (0..=i).map(|k| chol[(i, k)] * white[k]).sum();
                mean[i] + colored
            })
            .collect())
    }

    fn mean(&self) -> Vec<f64> {
        self.process.mean(&self.x)
    }

    fn var(&self) -> Vec<f64> {
        self.process
            .var(&self.x)
            .into_iter()
            .map(|v| v + self.noise_variance)
            .collect()
    }

    fn cov(&self) -> Matrix {
        self.process
            .cov(&self.x)
            .with_added_diagonal(self.noise_variance)
    }

    fn logpdf(&self, y: &[f64]) -> Result<f64, GpError> {
        bounds::mvn_logpdf(&self.mean(), &self.cov(), y)
    }

    fn condition(&self, y: &[f64]) -> Result<ExactGp<K>, GpError> {
        self.process.condition_at(&self.x, self.noise_variance, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::SquaredExponential;
    use gausscheck_core::approx::approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn restriction() -> FiniteGp<SquaredExponential> {
        let p = ExactGp::new(0.0, SquaredExponential::new(1.0, 0.5).unwrap());
        p.at(&[0.1, 0.5, 0.9], 1e-4).unwrap()
    }

    #[test]
    fn samples_have_matching_length_and_are_finite() {
        let fx = restriction();
        let mut rng = StdRng::seed_from_u64(11);
        let draw = fx.sample(&mut rng).unwrap();
        assert_eq!(draw.len(), 3);
        assert!(draw.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn seeded_sampling_is_deterministic() {
        let fx = restriction();
        let a = fx.sample(&mut StdRng::seed_from_u64(5)).unwrap();
        let b = fx.sample(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn batched_sampling_has_requested_shape() {
        let fx = restriction();
        let mut rng = StdRng::seed_from_u64(3);
        let block = fx.sample_n(&mut rng, 7).unwrap();
        assert_eq!(block.shape(), (3, 7));
        assert!(block.is_finite());
    }

    #[test]
    fn logpdf_of_univariate_restriction_matches_closed_form() {
        let p = ExactGp::new(2.0, SquaredExponential::new(4.0, 1.0).unwrap());
        let fx = p.at(&[0.0], 1.0).unwrap();
        // One point: N(2, 4 + 1).
        let expected = gausscheck_core::Normal::new(2.0, 5.0).logpdf(3.5);
        assert!(approx_eq(fx.logpdf(&[3.5]).unwrap(), expected, 1e-10));
    }

    #[test]
    fn logpdf_peaks_at_the_mean() {
        let fx = restriction();
        let mean = fx.mean();
        let at_mean = fx.logpdf(&mean).unwrap();
        let off: Vec<f64> = mean.iter().map(|m| m + 1.0).collect();
        assert!(at_mean > fx.logpdf(&off).unwrap());
    }

    #[test]
    fn logpdf_rejects_wrong_length() {
        let fx = restriction();
        assert!(matches!(
            fx.logpdf(&[0.0]),
            Err(GpError::DimensionMismatch { expected: 3, got: 1 })
        ));
    }

    #[test]
    fn variance_includes_observation_noise() {
        let p = ExactGp::new(0.0, SquaredExponential::new(1.0, 0.5).unwrap());
        let fx = p.at(&[0.0], 0.25).unwrap();
        assert!(approx_eq(fx.var()[0], 1.25, 1e-12));
    }
}
