//! Tiers 1 and 2: finite-distribution contract checks.

use gausscheck_core::approx::{approx_eq_matrix, approx_eq_slice};
use gausscheck_core::linalg::min_symmetric_eigenvalue;
use gausscheck_core::{FiniteDistribution, Matrix, Process};
use rand::Rng;

use crate::error::{ensure, ConformanceError};

/// Fixed sample count used by the batched-sampling checks.
pub const BATCH_SAMPLE_COUNT: usize = 3;

/// Index at which the conditioned posterior process is probed.
const POSTERIOR_PROBE: [f64; 1] = [0.0];

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn check_draw(property: &'static str, draw: &[f64], dim: usize) -> Result<(), ConformanceError> {
    ensure(property, draw.len() == dim, || {
        format!("expected a vector of length {dim}, got {}", draw.len())
    })?;
    ensure(property, all_finite(draw), || {
        format!("draw contains non-finite entries: {draw:?}")
    })
}

fn check_block(
    property: &'static str,
    block: &Matrix,
    dim: usize,
) -> Result<(), ConformanceError> {
    ensure(property, block.shape() == (dim, BATCH_SAMPLE_COUNT), || {
        format!(
            "expected shape ({dim}, {BATCH_SAMPLE_COUNT}), got {:?}",
            block.shape()
        )
    })?;
    ensure(property, block.is_finite(), || {
        "sample block contains non-finite entries".to_owned()
    })
}

/// Tier 1: verify the primary finite-distribution contract.
///
/// Checks every sampling variant (explicit and default random source,
/// in-place and allocating, single and batched), the marginal summaries and
/// their consistency with the mean/variance accessors, variance
/// non-negativity, the log-density of a drawn sample, and that conditioning
/// yields a working process. Returns the first violation.
pub fn verify_finite_primary<R, D>(
    rng: &mut R,
    dist: &D,
    tolerance: f64,
) -> Result<(), ConformanceError>
where
    R: Rng + ?Sized,
    D: FiniteDistribution,
{
    let dim = dist.len();
    ensure("nonempty", dim > 0, || {
        "finite distribution has zero dimensions".to_owned()
    })?;

    // Single draws, explicit and default random source.
    let draw = dist.sample(rng)?;
    check_draw("sample length", &draw, dim)?;
    let default_draw = dist.sample_default()?;
    check_draw("default-source sample length", &default_draw, dim)?;

    // In-place draws into caller-provided storage.
    let mut buf = vec![0.0; dim];
    dist.sample_into(rng, &mut buf)?;
    check_draw("in-place sample", &buf, dim)?;
    dist.sample_into_default(&mut buf)?;
    check_draw("default-source in-place sample", &buf, dim)?;

    // Batched draws, all four variants.
    let block = dist.sample_n(rng, BATCH_SAMPLE_COUNT)?;
    check_block("batched sample shape", &block, dim)?;
    let default_block = dist.sample_n_default(BATCH_SAMPLE_COUNT)?;
    check_block("default-source batched sample shape", &default_block, dim)?;
    let mut block_buf = Matrix::zeros(dim, BATCH_SAMPLE_COUNT);
    dist.sample_n_into(rng, &mut block_buf)?;
    check_block("in-place batched sample shape", &block_buf, dim)?;
    dist.sample_n_into_default(&mut block_buf)?;
    check_block("default-source in-place batched sample shape", &block_buf, dim)?;

    // Marginal summaries against the mean/variance accessors.
    let marginals = dist.marginals();
    ensure("marginal count", marginals.len() == dim, || {
        format!("expected {dim} marginals, got {}", marginals.len())
    })?;
    let mean = dist.mean();
    let var = dist.var();
    ensure("mean length", mean.len() == dim, || {
        format!("expected mean of length {dim}, got {}", mean.len())
    })?;
    ensure("variance length", var.len() == dim, || {
        format!("expected variance of length {dim}, got {}", var.len())
    })?;
    let marginal_means: Vec<f64> = marginals.iter().map(|m| m.mean).collect();
    let marginal_vars: Vec<f64> = marginals.iter().map(|m| m.variance).collect();
    ensure(
        "marginal means match mean accessor",
        approx_eq_slice(&marginal_means, &mean, tolerance),
        || format!("marginal means {marginal_means:?} vs mean {mean:?}"),
    )?;
    ensure(
        "marginal variances match variance accessor",
        approx_eq_slice(&marginal_vars, &var, tolerance),
        || format!("marginal variances {marginal_vars:?} vs variance {var:?}"),
    )?;

    // Joint accessor agrees with the separately computed pieces.
    let (joint_mean, joint_var) = dist.mean_and_var();
    ensure(
        "joint mean matches mean accessor",
        approx_eq_slice(&joint_mean, &mean, tolerance),
        || format!("joint mean {joint_mean:?} vs mean {mean:?}"),
    )?;
    ensure(
        "joint variance matches variance accessor",
        approx_eq_slice(&joint_var, &var, tolerance),
        || format!("joint variance {joint_var:?} vs variance {var:?}"),
    )?;

    // Variances may only dip below zero by numerical noise.
    ensure(
        "variance non-negativity",
        var.iter().all(|v| *v > -tolerance),
        || format!("variance vector has negative entries: {var:?}"),
    )?;

    // Log-density of a drawn sample is a finite scalar.
    let logp = dist.logpdf(&draw)?;
    ensure("logpdf is finite", logp.is_finite(), || {
        format!("logpdf of a drawn sample is {logp}")
    })?;

    // Conditioning yields an object with process capabilities.
    let posterior = dist.condition(&draw)?;
    let probe = posterior.mean(&POSTERIOR_PROBE);
    ensure(
        "posterior process responds to mean queries",
        probe.len() == 1 && all_finite(&probe),
        || format!("posterior mean probe returned {probe:?}"),
    )?;

    tracing::debug!(dim, "finite-distribution primary contract verified");
    Ok(())
}

/// Tier 2: verify the full finite-distribution contract.
///
/// Runs [`verify_finite_primary`], then checks the full covariance matrix:
/// diagonal against the variance vector, the joint mean+covariance
/// accessor, symmetry, and positive semi-definiteness.
pub fn verify_finite_full<R, D>(
    rng: &mut R,
    dist: &D,
    tolerance: f64,
) -> Result<(), ConformanceError>
where
    R: Rng + ?Sized,
    D: FiniteDistribution,
{
    verify_finite_primary(rng, dist, tolerance)?;

    let dim = dist.len();
    let cov = dist.cov();
    ensure("covariance shape", cov.shape() == (dim, dim), || {
        format!("expected shape ({dim}, {dim}), got {:?}", cov.shape())
    })?;

    let var = dist.var();
    let diag = cov.diagonal();
    ensure(
        "covariance diagonal matches variance accessor",
        approx_eq_slice(&diag, &var, tolerance),
        || format!("diagonal {diag:?} vs variance {var:?}"),
    )?;

    let mean = dist.mean();
    let (joint_mean, joint_cov) = dist.mean_and_cov();
    ensure(
        "joint mean matches mean accessor",
        approx_eq_slice(&joint_mean, &mean, tolerance),
        || format!("joint mean {joint_mean:?} vs mean {mean:?}"),
    )?;
    ensure(
        "joint covariance matches covariance accessor",
        approx_eq_matrix(&joint_cov, &cov, tolerance),
        || "joint covariance differs from covariance accessor".to_owned(),
    )?;

    ensure(
        "covariance symmetry",
        cov.max_abs_diff(&cov.transpose()).is_some_and(|d| d <= tolerance),
        || "covariance differs from its transpose".to_owned(),
    )?;

    let lambda_min = min_symmetric_eigenvalue(&cov)?;
    ensure(
        "covariance positive semi-definiteness",
        lambda_min > -tolerance,
        || format!("smallest covariance eigenvalue is {lambda_min}"),
    )?;

    tracing::debug!(dim, "finite-distribution full contract verified");
    Ok(())
}
