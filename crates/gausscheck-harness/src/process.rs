//! Tier 3: process-level contract checks.

use gausscheck_core::approx::{approx_eq, approx_eq_matrix, approx_eq_slice};
use gausscheck_core::linalg::min_symmetric_eigenvalue;
use gausscheck_core::{FiniteDistribution, Process};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ensure, ConformanceError};
use crate::finite::verify_finite_full;
use crate::{DEFAULT_BOUND_TOLERANCE, DEFAULT_NOISE_VARIANCE, DEFAULT_TOLERANCE};

/// Knobs for [`verify_process_with_options`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProcessCheckOptions {
    /// Tolerance for the consistency checks.
    pub tolerance: f64,
    /// Observation-noise variance applied when restricting the process.
    pub noise_variance: f64,
    /// Tolerance for comparing the approximate-inference bounds against the
    /// exact log-density.
    pub bound_tolerance: f64,
}

impl Default for ProcessCheckOptions {
    fn default() -> Self {
        ProcessCheckOptions {
            tolerance: DEFAULT_TOLERANCE,
            noise_variance: DEFAULT_NOISE_VARIANCE,
            bound_tolerance: DEFAULT_BOUND_TOLERANCE,
        }
    }
}

/// Tier 3 with default options; see [`verify_process_with_options`].
pub fn verify_process<R, P>(
    rng: &mut R,
    process: &P,
    xa: &[f64],
    xb: &[f64],
) -> Result<(), ConformanceError>
where
    R: Rng + ?Sized,
    P: Process,
{
    verify_process_with_options(rng, process, xa, xb, ProcessCheckOptions::default())
}

/// Tier 3: verify the process-level contract.
///
/// `xa` and `xb` must differ in length so the cross-covariance checks
/// exercise asymmetric shapes; equal lengths are rejected up front as
/// harness misuse. Note only the lengths are compared: two distinct index
/// sets of equal length are rejected too, and identical content of
/// differing length is not.
///
/// Verifies process-level mean/covariance/variance consistency over the two
/// index sets, runs the full tier-2 suite on the restriction to `xa`, and
/// checks the two approximate-inference bounds against the exact
/// log-density of a drawn outcome.
pub fn verify_process_with_options<R, P>(
    rng: &mut R,
    process: &P,
    xa: &[f64],
    xb: &[f64],
    options: ProcessCheckOptions,
) -> Result<(), ConformanceError>
where
    R: Rng + ?Sized,
    P: Process,
{
    if xa.len() == xb.len() {
        return Err(ConformanceError::EqualLengthIndexSets { len: xa.len() });
    }
    let tol = options.tolerance;
    let (na, nb) = (xa.len(), xb.len());

    // Process-level mean.
    let mean = process.mean(xa);
    ensure("process mean length", mean.len() == na, || {
        format!("expected mean of length {na}, got {}", mean.len())
    })?;
    ensure(
        "process mean finiteness",
        mean.iter().all(|v| v.is_finite()),
        || format!("process mean contains non-finite entries: {mean:?}"),
    )?;

    // Cross-covariance shape; swapping arguments transposes.
    let cov_ab = process.cov_between(xa, xb);
    ensure("cross-covariance shape", cov_ab.shape() == (na, nb), || {
        format!("expected shape ({na}, {nb}), got {:?}", cov_ab.shape())
    })?;
    let cov_ba = process.cov_between(xb, xa);
    ensure(
        "cross-covariance transposes under argument swap",
        approx_eq_matrix(&cov_ba.transpose(), &cov_ab, tol),
        || "cov(xb, xa) transposed differs from cov(xa, xb)".to_owned(),
    )?;

    // Auto-covariance: square, consistent with the two-argument form, PSD.
    let cov_aa = process.cov(xa);
    ensure("auto-covariance shape", cov_aa.shape() == (na, na), || {
        format!("expected shape ({na}, {na}), got {:?}", cov_aa.shape())
    })?;
    ensure(
        "auto-covariance matches two-argument covariance",
        approx_eq_matrix(&cov_aa, &process.cov_between(xa, xa), tol),
        || "cov(xa) differs from cov(xa, xa)".to_owned(),
    )?;
    let lambda_min = min_symmetric_eigenvalue(&cov_aa)?;
    ensure(
        "auto-covariance positive semi-definiteness",
        lambda_min > -tol,
        || format!("smallest auto-covariance eigenvalue is {lambda_min}"),
    )?;

    // Variance vector against the auto-covariance diagonal.
    let var = process.var(xa);
    ensure("process variance length", var.len() == na, || {
        format!("expected variance of length {na}, got {}", var.len())
    })?;
    let diag = cov_aa.diagonal();
    ensure(
        "process variance matches auto-covariance diagonal",
        approx_eq_slice(&var, &diag, tol),
        || format!("variance {var:?} vs diagonal {diag:?}"),
    )?;

    // Joint accessors.
    let (joint_mean, joint_cov) = process.mean_and_cov(xa);
    ensure(
        "joint process mean matches mean accessor",
        approx_eq_slice(&joint_mean, &mean, tol),
        || format!("joint mean {joint_mean:?} vs mean {mean:?}"),
    )?;
    ensure(
        "joint process covariance matches covariance accessor",
        approx_eq_matrix(&joint_cov, &cov_aa, tol),
        || "joint covariance differs from auto-covariance".to_owned(),
    )?;
    let (jv_mean, jv_var) = process.mean_and_var(xa);
    ensure(
        "joint process mean matches mean accessor",
        approx_eq_slice(&jv_mean, &mean, tol),
        || format!("joint mean {jv_mean:?} vs mean {mean:?}"),
    )?;
    ensure(
        "joint process variance matches variance accessor",
        approx_eq_slice(&jv_var, &var, tol),
        || format!("joint variance {jv_var:?} vs variance {var:?}"),
    )?;

    // The restriction passes the full finite-distribution suite.
    let fx = process.at(xa, options.noise_variance)?;
    verify_finite_full(rng, &fx, tol)?;

    // A drawn outcome and its exact log-density anchor the bound checks.
    let y = fx.sample(rng)?;
    ensure("restricted sample length", y.len() == na, || {
        format!("expected a sample of length {na}, got {}", y.len())
    })?;
    let exact = fx.logpdf(&y)?;
    ensure("restricted logpdf is finite", exact.is_finite(), || {
        format!("logpdf of a drawn outcome is {exact}")
    })?;

    // ELBO at the generating index set recovers the exact log-density.
    let inducing_same = process.at(xa, 0.0)?;
    let elbo_same = process.elbo(&fx, &y, &inducing_same)?;
    ensure(
        "elbo recovers exact logpdf at the generating index set",
        approx_eq(elbo_same, exact, options.bound_tolerance),
        || format!("elbo {elbo_same} vs logpdf {exact}"),
    )?;

    // ELBO elsewhere is a lower bound: it must never overestimate.
    let inducing_other = process.at(xb, 0.0)?;
    let elbo_other = process.elbo(&fx, &y, &inducing_other)?;
    ensure(
        "elbo never exceeds exact logpdf",
        elbo_other <= exact + options.bound_tolerance,
        || format!("elbo {elbo_other} overestimates logpdf {exact}"),
    )?;

    // DTC at the generating index set also recovers the exact log-density.
    let dtc_same = process.dtc(&fx, &y, &inducing_same)?;
    ensure(
        "dtc recovers exact logpdf at the generating index set",
        approx_eq(dtc_same, exact, options.bound_tolerance),
        || format!("dtc {dtc_same} vs logpdf {exact}"),
    )?;

    tracing::debug!(na, nb, "process-level contract verified");
    Ok(())
}
