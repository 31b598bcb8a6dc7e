use thiserror::Error;

use crate::linalg::LinalgError;

/// Shape errors raised by [`crate::Matrix`] operations.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("matrix rows must all have length {expected}, row {row} has {got}")]
    RaggedRows {
        expected: usize,
        row: usize,
        got: usize,
    },
    #[error("matrix shape mismatch: ({lhs_rows}, {lhs_cols}) vs ({rhs_rows}, {rhs_cols})")]
    ShapeMismatch {
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },
    #[error("operation requires a square matrix, got ({rows}, {cols})")]
    NonSquare { rows: usize, cols: usize },
}

/// Errors raised by implementations of the GP interface.
///
/// The conformance harness never wraps these: a failure inside the object
/// under test propagates to the caller unmodified.
#[derive(Debug, Error)]
pub enum GpError {
    #[error("index set must not be empty")]
    EmptyIndexSet,
    #[error("observation noise variance must be non-negative, got {0}")]
    InvalidNoiseVariance(f64),
    #[error("approximate-inference bound requires positive observation noise, got {0}")]
    NoiselessBound(f64),
    #[error("kernel parameter '{name}' must be positive, got {value}")]
    InvalidKernelParameter { name: &'static str, value: f64 },
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("matrix shape error: {0}")]
    Shape(#[from] MatrixError),
    #[error("covariance factorization failed: {0}")]
    Covariance(#[from] LinalgError),
}
