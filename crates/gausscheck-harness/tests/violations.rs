//! Non-conforming subjects must fail with the property that names the
//! defect, and failures inside the subject must propagate unmodified.

use gausscheck_core::{FiniteDistribution, GpError, Matrix, Normal};
use gausscheck_harness::{verify_finite_full, verify_finite_primary, ConformanceError};
use gausscheck_reference::{ExactGp, FiniteGp, SquaredExponential};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn restriction() -> FiniteGp<SquaredExponential> {
    use gausscheck_core::Process as _;
    let p = ExactGp::new(0.0, SquaredExponential::new(1.0, 0.5).unwrap());
    p.at(&[0.1, 0.5, 0.9], 1e-4).unwrap()
}

/// Reports variances twice as large as its covariance diagonal.
struct InflatedVariance(FiniteGp<SquaredExponential>);

impl FiniteDistribution for InflatedVariance {
    type Posterior = ExactGp<SquaredExponential>;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>, GpError> {
        self.0.sample(rng)
    }

    fn mean(&self) -> Vec<f64> {
        self.0.mean()
    }

    fn var(&self) -> Vec<f64> {
        self.0.var().into_iter().map(|v| v * 2.0).collect()
    }

    fn cov(&self) -> Matrix {
        self.0.cov()
    }

    fn logpdf(&self, y: &[f64]) -> Result<f64, GpError> {
        self.0.logpdf(y)
    }

    fn condition(&self, y: &[f64]) -> Result<ExactGp<SquaredExponential>, GpError> {
        self.0.condition(y)
    }
}

/// Covariance with one off-diagonal entry nudged, breaking symmetry.
struct SkewedCovariance(FiniteGp<SquaredExponential>);

impl FiniteDistribution for SkewedCovariance {
    type Posterior = ExactGp<SquaredExponential>;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>, GpError> {
        self.0.sample(rng)
    }

    fn mean(&self) -> Vec<f64> {
        self.0.mean()
    }

    fn var(&self) -> Vec<f64> {
        self.0.var()
    }

    fn cov(&self) -> Matrix {
        let mut cov = self.0.cov();
        cov[(0, 1)] += 1e-3;
        cov
    }

    fn logpdf(&self, y: &[f64]) -> Result<f64, GpError> {
        self.0.logpdf(y)
    }

    fn condition(&self, y: &[f64]) -> Result<ExactGp<SquaredExponential>, GpError> {
        self.0.condition(y)
    }
}

/// Marginal summaries shifted away from the mean accessor.
struct ShiftedMarginals(FiniteGp<SquaredExponential>);

impl FiniteDistribution for ShiftedMarginals {
    type Posterior = ExactGp<SquaredExponential>;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>, GpError> {
        self.0.sample(rng)
    }

    fn marginals(&self) -> Vec<Normal> {
        self.0
            .marginals()
            .into_iter()
            .map(|m| Normal::new(m.mean + 0.1, m.variance))
            .collect()
    }

    fn mean(&self) -> Vec<f64> {
        self.0.mean()
    }

    fn var(&self) -> Vec<f64> {
        self.0.var()
    }

    fn cov(&self) -> Matrix {
        self.0.cov()
    }

    fn logpdf(&self, y: &[f64]) -> Result<f64, GpError> {
        self.0.logpdf(y)
    }

    fn condition(&self, y: &[f64]) -> Result<ExactGp<SquaredExponential>, GpError> {
        self.0.condition(y)
    }
}

/// Log-density computation that always errors out.
struct FailingLogpdf(FiniteGp<SquaredExponential>);

impl FiniteDistribution for FailingLogpdf {
    type Posterior = ExactGp<SquaredExponential>;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>, GpError> {
        self.0.sample(rng)
    }

    fn mean(&self) -> Vec<f64> {
        self.0.mean()
    }

    fn var(&self) -> Vec<f64> {
        self.0.var()
    }

    fn cov(&self) -> Matrix {
        self.0.cov()
    }

    fn logpdf(&self, _y: &[f64]) -> Result<f64, GpError> {
        Err(GpError::EmptyIndexSet)
    }

    fn condition(&self, y: &[f64]) -> Result<ExactGp<SquaredExponential>, GpError> {
        self.0.condition(y)
    }
}

#[test]
fn inflated_variance_passes_tier_one_but_fails_the_diagonal_check() {
    let subject = InflatedVariance(restriction());
    let mut rng = StdRng::seed_from_u64(1);
    // Tier 1 only sees the (self-consistent) variance accessor.
    verify_finite_primary(&mut rng, &subject, 1e-12).unwrap();

    let err = verify_finite_full(&mut rng, &subject, 1e-12).unwrap_err();
    assert_eq!(
        err.property(),
        Some("covariance diagonal matches variance accessor"),
        "unexpected failure: {err}"
    );
}

#[test]
fn skewed_covariance_fails_the_symmetry_check() {
    let subject = SkewedCovariance(restriction());
    let mut rng = StdRng::seed_from_u64(2);
    let err = verify_finite_full(&mut rng, &subject, 1e-12).unwrap_err();
    assert_eq!(err.property(), Some("covariance symmetry"), "unexpected failure: {err}");
}

#[test]
fn shifted_marginals_fail_the_mean_consistency_check() {
    let subject = ShiftedMarginals(restriction());
    let mut rng = StdRng::seed_from_u64(3);
    let err = verify_finite_primary(&mut rng, &subject, 1e-12).unwrap_err();
    assert_eq!(
        err.property(),
        Some("marginal means match mean accessor"),
        "unexpected failure: {err}"
    );
}

#[test]
fn subject_errors_propagate_unwrapped() {
    let subject = FailingLogpdf(restriction());
    let mut rng = StdRng::seed_from_u64(4);
    let err = verify_finite_primary(&mut rng, &subject, 1e-12).unwrap_err();
    assert!(matches!(err, ConformanceError::Gp(GpError::EmptyIndexSet)));
}
