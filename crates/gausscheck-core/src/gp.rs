//! The layered Gaussian-process interface the conformance harness verifies.
//!
//! Implementations live elsewhere; this crate only fixes the capability
//! surface. [`Process`] is the infinite-index object (mean and covariance
//! over arbitrary finite index sets, restriction, approximate-inference
//! bounds); [`FiniteDistribution`] is what restriction produces (sampling,
//! marginals, exact log-density, posterior conditioning).
//!
//! Index sets are ordered slices of 1-D input locations. Randomness is
//! always injected: every sampling operation takes a caller-supplied
//! [`rand::Rng`], with `*_default` companions drawing from the thread RNG.

use rand::Rng;

use crate::error::GpError;
use crate::matrix::Matrix;
use crate::normal::Normal;

/// A distribution over a finite real vector, tied to an index set and an
/// observation-noise level.
///
/// Only the primitive operations are required; the batched, in-place, and
/// default-source sampling variants have provided implementations in terms
/// of [`FiniteDistribution::sample`], which implementations are free to
/// override.
pub trait FiniteDistribution {
    /// Process type produced by conditioning on an observed outcome.
    type Posterior: Process;

    /// Dimensionality (length of the generating index set).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draw one sample using the supplied random source.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>, GpError>;

    /// Draw one sample from the thread-local random source.
    fn sample_default(&self) -> Result<Vec<f64>, GpError> {
        self.sample(&mut rand::thread_rng())
    }

    /// Draw one sample into caller-provided storage of matching length.
    fn sample_into<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) -> Result<(), GpError> {
        if out.len() != self.len() {
            return Err(GpError::DimensionMismatch {
                expected: self.len(),
                got: out.len(),
            });
        }
        out.copy_from_slice(&self.sample(rng)?);
        Ok(())
    }

    fn sample_into_default(&self, out: &mut [f64]) -> Result<(), GpError> {
        self.sample_into(&mut rand::thread_rng(), out)
    }

    /// Draw `count` independent samples as the columns of a
    /// `(len, count)` matrix.
    fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Result<Matrix, GpError> {
        let mut block = Matrix::zeros(self.len(), count);
        for j in 0..count {
            let draw = self.sample(rng)?;
            for (i, value) in draw.iter().enumerate() {
                block[(i, j)] = *value;
            }
        }
        Ok(block)
    }

    fn sample_n_default(&self, count: usize) -> Result<Matrix, GpError> {
        self.sample_n(&mut rand::thread_rng(), count)
    }

    /// Batched draw into caller-provided storage; the column count of `out`
    /// selects the number of samples.
    fn sample_n_into<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut Matrix) -> Result<(), GpError> {
        if out.rows() != self.len() {
            return Err(GpError::DimensionMismatch {
                expected: self.len(),
                got: out.rows(),
            });
        }
        let block = self.sample_n(rng, out.cols())?;
        out.copy_from(&block)?;
        Ok(())
    }

    fn sample_n_into_default(&self, out: &mut Matrix) -> Result<(), GpError> {
        self.sample_n_into(&mut rand::thread_rng(), out)
    }

    /// Per-coordinate marginal summaries, one per dimension.
    fn marginals(&self) -> Vec<Normal> {
        let (mean, var) = self.mean_and_var();
        mean.into_iter()
            .zip(var)
            .map(|(m, v)| Normal::new(m, v))
            .collect()
    }

    fn mean(&self) -> Vec<f64>;

    fn var(&self) -> Vec<f64>;

    fn cov(&self) -> Matrix;

    fn mean_and_var(&self) -> (Vec<f64>, Vec<f64>) {
        (self.mean(), self.var())
    }

    fn mean_and_cov(&self) -> (Vec<f64>, Matrix) {
        (self.mean(), self.cov())
    }

    /// Exact log-density of an observed outcome.
    fn logpdf(&self, y: &[f64]) -> Result<f64, GpError>;

    /// Posterior update: condition on an observed outcome, yielding a new
    /// process.
    fn condition(&self, y: &[f64]) -> Result<Self::Posterior, GpError>;
}

/// An abstract random function over a 1-D index set.
pub trait Process: Sized {
    /// Distribution type produced by restriction to a finite index set.
    type Finite: FiniteDistribution;

    /// Restrict to a finite index set with per-index observation-noise
    /// variance.
    fn at(&self, x: &[f64], noise_variance: f64) -> Result<Self::Finite, GpError>;

    fn mean(&self, x: &[f64]) -> Vec<f64>;

    /// Covariance between two index sets, shape `(x.len(), z.len())`.
    fn cov_between(&self, x: &[f64], z: &[f64]) -> Matrix;

    /// Auto-covariance of one index set.
    fn cov(&self, x: &[f64]) -> Matrix {
        self.cov_between(x, x)
    }

    fn var(&self, x: &[f64]) -> Vec<f64> {
        self.cov(x).diagonal()
    }

    fn mean_and_cov(&self, x: &[f64]) -> (Vec<f64>, Matrix) {
        (self.mean(x), self.cov(x))
    }

    fn mean_and_var(&self, x: &[f64]) -> (Vec<f64>, Vec<f64>) {
        (self.mean(x), self.var(x))
    }

    /// Variational (collapsed) evidence lower bound on `fx.logpdf(y)`,
    /// using `inducing` as the reference restriction.
    ///
    /// Equals the exact log-density when `inducing` is the noiseless
    /// restriction at `fx`'s own index set; never exceeds it otherwise.
    fn elbo(&self, fx: &Self::Finite, y: &[f64], inducing: &Self::Finite)
        -> Result<f64, GpError>;

    /// Deterministic-training-conditional approximation to `fx.logpdf(y)`.
    ///
    /// Not a bound in general, but exact when `inducing` is the noiseless
    /// restriction at `fx`'s own index set.
    fn dtc(&self, fx: &Self::Finite, y: &[f64], inducing: &Self::Finite) -> Result<f64, GpError>;
}
