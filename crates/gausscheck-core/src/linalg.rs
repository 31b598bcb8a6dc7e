//! Dense symmetric linear algebra used by the conformance checks.
//!
//! All routines are exact textbook implementations over [`Matrix`]; the
//! matrices involved are covariance matrices of at most a few dozen rows,
//! so clarity wins over cache behavior.

use thiserror::Error;

use crate::matrix::Matrix;

/// Maximum number of cyclic Jacobi sweeps before giving up.
const MAX_JACOBI_SWEEPS: usize = 64;

#[derive(Debug, Error)]
pub enum LinalgError {
    #[error("operation requires a square matrix, got ({rows}, {cols})")]
    NonSquare { rows: usize, cols: usize },
    #[error("dimension mismatch: matrix has {matrix} rows, right-hand side has {rhs}")]
    RhsMismatch { matrix: usize, rhs: usize },
    #[error("matrix is not positive definite (pivot {pivot} is {value})")]
    NotPositiveDefinite { pivot: usize, value: f64 },
    #[error("triangular system is singular at row {row}")]
    SingularTriangular { row: usize },
    #[error("Jacobi eigenvalue iteration did not converge in {sweeps} sweeps")]
    NoConvergence { sweeps: usize },
}

fn require_square(m: &Matrix) -> Result<usize, LinalgError> {
    if !m.is_square() {
        return Err(LinalgError::NonSquare {
            rows: m.rows(),
            cols: m.cols(),
        });
    }
    Ok(m.rows())
}

/// Lower-triangular Cholesky factor `L` with `L * Lᵗ = m`.
///
/// Only the lower triangle of `m` is read, so a slightly asymmetric input
/// (numerical noise) is factorized as if it were symmetric.
pub fn cholesky(m: &Matrix) -> Result<Matrix, LinalgError> {
    let n = require_square(m)?;
    let mut l = Matrix::zeros(n, n);
    for i in 0..n {
        for j in 0..=i {
            let mut sum = m[(i, j)];
            for k in 0..j {
                sum -= l[(i, k)] * l[(j, k)];
            }
            if i == j {
                if sum <= 0.0 {
                    return Err(LinalgError::NotPositiveDefinite {
                        pivot: i,
                        value: sum,
                    });
                }
                l[(i, j)] = sum.sqrt();
            } else {
                l[(i, j)] = sum / l[(j, j)];
            }
        }
    }
    Ok(l)
}

/// Solve `L x = b` by forward substitution, `L` lower triangular.
pub fn solve_lower_triangular(l: &Matrix, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let n = require_square(l)?;
    if b.len() != n {
        return Err(LinalgError::RhsMismatch {
            matrix: n,
            rhs: b.len(),
        });
    }
    let mut x = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[(i, k)] * x[k];
        }
        let pivot = l[(i, i)];
        if pivot == 0.0 {
            return Err(LinalgError::SingularTriangular { row: i });
        }
        x[i] = sum / pivot;
    }
    Ok(x)
}

/// Solve `U x = b` by back substitution, `U` upper triangular.
pub fn solve_upper_triangular(u: &Matrix, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let n = require_square(u)?;
    if b.len() != n {
        return Err(LinalgError::RhsMismatch {
            matrix: n,
            rhs: b.len(),
        });
    }
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for k in i + 1..n {
            sum -= u[(i, k)] * x[k];
        }
        let pivot = u[(i, i)];
        if pivot == 0.0 {
            return Err(LinalgError::SingularTriangular { row: i });
        }
        x[i] = sum / pivot;
    }
    Ok(x)
}

/// Solve `L X = B` column by column, `L` lower triangular.
pub fn solve_lower_triangular_matrix(l: &Matrix, b: &Matrix) -> Result<Matrix, LinalgError> {
    let n = require_square(l)?;
    if b.rows() != n {
        return Err(LinalgError::RhsMismatch {
            matrix: n,
            rhs: b.rows(),
        });
    }
    let mut x = Matrix::zeros(n, b.cols());
    for j in 0..b.cols() {
        let col = solve_lower_triangular(l, &b.col(j))?;
        for i in 0..n {
            x[(i, j)] = col[i];
        }
    }
    Ok(x)
}

/// Eigenvalues of a symmetric matrix via cyclic Jacobi rotations, ascending.
///
/// The input is symmetrized as `(m + mᵗ) / 2` first, so callers may pass a
/// covariance matrix carrying round-off asymmetry.
pub fn symmetric_eigenvalues(m: &Matrix) -> Result<Vec<f64>, LinalgError> {
    let n = require_square(m)?;
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut a = Matrix::from_fn(n, n, |i, j| 0.5 * (m[(i, j)] + m[(j, i)]));
    let scale: f64 = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| a[(i, j)].abs())
        .fold(0.0, f64::max)
        .max(1.0);

    for _ in 0..MAX_JACOBI_SWEEPS {
        let mut off = 0.0f64;
        for i in 0..n {
            for j in i + 1..n {
                off += a[(i, j)] * a[(i, j)];
            }
        }
        if off.sqrt() <= 1e-14 * scale {
            let mut eig = a.diagonal();
            eig.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
            return Ok(eig);
        }
        for p in 0..n - 1 {
            for q in p + 1..n {
                let apq = a[(p, q)];
                if apq.abs() <= 1e-300 {
                    continue;
                }
                let theta = (a[(q, q)] - a[(p, p)]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                for k in 0..n {
                    let akp = a[(k, p)];
                    let akq = a[(k, q)];
                    a[(k, p)] = c * akp - s * akq;
                    a[(k, q)] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[(p, k)];
                    let aqk = a[(q, k)];
                    a[(p, k)] = c * apk - s * aqk;
                    a[(q, k)] = s * apk + c * aqk;
                }
            }
        }
    }
    Err(LinalgError::NoConvergence {
        sweeps: MAX_JACOBI_SWEEPS,
    })
}

/// Smallest eigenvalue of a symmetric matrix.
pub fn min_symmetric_eigenvalue(m: &Matrix) -> Result<f64, LinalgError> {
    let eig = symmetric_eigenvalues(m)?;
    Ok(eig.first().copied().unwrap_or(0.0))
}
