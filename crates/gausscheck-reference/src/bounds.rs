//! Collapsed sparse-approximation objectives (Titsias ELBO and DTC) plus
//! the shared Gaussian log-density they are built from.
//!
//! Both objectives approximate `fx.logpdf(y)` through an inducing
//! restriction `u` at index set `z`:
//!
//! ```text
//! Qff  = Kfz Kzz⁻¹ Kzf
//! dtc  = log N(y; m(x), Qff + σ²I)
//! elbo = dtc - (tr(Kff) - tr(Qff)) / (2σ²)
//! ```
//!
//! With `z = x` the Nyström term `Qff` recovers `Kff`, so both collapse to
//! the exact log-density; for any other `z` the ELBO is a lower bound.

use gausscheck_core::linalg::{cholesky, solve_lower_triangular, solve_lower_triangular_matrix};
use gausscheck_core::{GpError, Matrix, Process};

use crate::finite::FiniteGp;
use crate::gp::ExactGp;
use crate::kernel::Kernel;

/// Escalating diagonal jitter applied when a covariance is positive
/// definite only up to round-off.
const JITTER_STEPS: [f64; 3] = [1e-12, 1e-10, 1e-8];

/// Cholesky factorization with escalating jitter.
///
/// Tries the matrix as given first, so a well-conditioned covariance is
/// factorized exactly; only a factorization that fails outright gets its
/// diagonal lifted.
pub(crate) fn cholesky_with_jitter(m: &Matrix) -> Result<Matrix, GpError> {
    let mut last = match cholesky(m) {
        Ok(l) => return Ok(l),
        Err(err) => err,
    };
    let scale = (m.trace() / m.rows().max(1) as f64).abs().max(1.0);
    for jitter in JITTER_STEPS {
        match cholesky(&m.with_added_diagonal(jitter * scale)) {
            Ok(l) => return Ok(l),
            Err(err) => last = err,
        }
    }
    Err(GpError::Covariance(last))
}

/// Log-density of `N(mean, cov)` at `y`.
pub(crate) fn mvn_logpdf(mean: &[f64], cov: &Matrix, y: &[f64]) -> Result<f64, GpError> {
    if y.len() != mean.len() {
        return Err(GpError::DimensionMismatch {
            expected: mean.len(),
            got: y.len(),
        });
    }
    let l = cholesky_with_jitter(cov)?;
    let resid: Vec<f64> = y.iter().zip(mean).map(|(a, b)| a - b).collect();
    let white = solve_lower_triangular(&l, &resid).map_err(GpError::Covariance)?;
    let quad: f64 = white.iter().map(|w| w * w).sum();
    let log_det: f64 = 2.0 * (0..l.rows()).map(|i| l[(i, i)].ln()).sum::<f64>();
    let n = mean.len() as f64;
    Ok(-0.5 * (n * (2.0 * std::f64::consts::PI).ln() + log_det + quad))
}

struct NystromParts {
    dtc: f64,
    trace_gap: f64,
    noise_variance: f64,
}

fn nystrom_parts<K: Kernel>(
    p: &ExactGp<K>,
    fx: &FiniteGp<K>,
    y: &[f64],
    inducing: &FiniteGp<K>,
) -> Result<NystromParts, GpError> {
    let noise_variance = fx.noise_variance();
    if noise_variance <= 0.0 {
        return Err(GpError::NoiselessBound(noise_variance));
    }
    let x = fx.index_set();
    let z = inducing.index_set();
    if y.len() != x.len() {
        return Err(GpError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }

    let lz = cholesky_with_jitter(&p.cov_between(z, z))?;
    let a = solve_lower_triangular_matrix(&lz, &p.cov_between(z, x)).map_err(GpError::Covariance)?;
    let qff = a.transpose().matmul(&a)?;

    let dtc = mvn_logpdf(&p.mean(x), &qff.with_added_diagonal(noise_variance), y)?;
    // tr(Kff - Qff) >= 0 in exact arithmetic; clamp round-off.
    let trace_gap = (p.var(x).iter().sum::<f64>() - qff.trace()).max(0.0);

    Ok(NystromParts {
        dtc,
        trace_gap,
        noise_variance,
    })
}

/// Collapsed variational evidence lower bound.
pub(crate) fn elbo<K: Kernel>(
    p: &ExactGp<K>,
    fx: &FiniteGp<K>,
    y: &[f64],
    inducing: &FiniteGp<K>,
) -> Result<f64, GpError> {
    let parts = nystrom_parts(p, fx, y, inducing)?;
    Ok(parts.dtc - parts.trace_gap / (2.0 * parts.noise_variance))
}

/// Deterministic-training-conditional objective.
pub(crate) fn dtc<K: Kernel>(
    p: &ExactGp<K>,
    fx: &FiniteGp<K>,
    y: &[f64],
    inducing: &FiniteGp<K>,
) -> Result<f64, GpError> {
    Ok(nystrom_parts(p, fx, y, inducing)?.dtc)
}
