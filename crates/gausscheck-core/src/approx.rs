//! Tolerance comparisons shared by the harness and its test suites.

use crate::matrix::Matrix;

/// Approximate scalar equality with combined absolute and relative slack:
/// `|a - b| <= tol + tol * |b|`.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol + tol * b.abs()
}

/// Element-wise [`approx_eq`] over two slices; false on length mismatch.
pub fn approx_eq_slice(a: &[f64], b: &[f64], tol: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| approx_eq(*x, *y, tol))
}

/// Element-wise [`approx_eq`] over two matrices; false on shape mismatch.
pub fn approx_eq_matrix(a: &Matrix, b: &Matrix, tol: f64) -> bool {
    if a.shape() != b.shape() {
        return false;
    }
    (0..a.rows()).all(|i| approx_eq_slice(a.row(i), b.row(i), tol))
}

/// Largest element-wise absolute difference; `None` on length mismatch.
pub fn max_abs_diff_slice(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    Some(
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_comparison_uses_relative_slack() {
        assert!(approx_eq(1_000_000.0, 1_000_000.5, 1e-6));
        assert!(!approx_eq(1.0, 1.5, 1e-6));
        assert!(approx_eq(0.0, 0.0, 0.0));
    }

    #[test]
    fn slice_comparison_rejects_length_mismatch() {
        assert!(!approx_eq_slice(&[1.0], &[1.0, 2.0], 1e-9));
        assert!(approx_eq_slice(&[1.0, 2.0], &[1.0, 2.0], 0.0));
    }

    #[test]
    fn matrix_comparison_rejects_shape_mismatch() {
        assert!(!approx_eq_matrix(&Matrix::zeros(2, 3), &Matrix::zeros(3, 2), 1e-9));
        assert!(approx_eq_matrix(&Matrix::identity(3), &Matrix::identity(3), 0.0));
    }

    #[test]
    fn max_abs_diff_slice_finds_worst_entry() {
        assert_eq!(max_abs_diff_slice(&[1.0, 2.0], &[1.5, 2.25]), Some(0.5));
        assert_eq!(max_abs_diff_slice(&[1.0], &[]), None);
    }
}
