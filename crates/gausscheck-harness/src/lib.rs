//! Layered conformance-verification harness for Gaussian-process
//! implementations.
//!
//! Three entry points form a strict capability hierarchy, each delegating to
//! the tier below and adding only the checks its tier introduces:
//!
//! 1. [`verify_finite_primary`] — sampling, marginals, mean/variance
//!    consistency, log-density, and posterior conditioning of a finite
//!    distribution.
//! 2. [`verify_finite_full`] — tier 1 plus full covariance-matrix checks
//!    (diagonal, joint accessor, symmetry, positive semi-definiteness).
//! 3. [`verify_process`] — tier 2 on a restriction, plus process-level
//!    mean/covariance consistency over two index sets and the
//!    approximate-inference bound checks.
//!
//! The harness is stateless and fail-fast: each entry point borrows the
//! caller's objects, runs a fixed sequence of checks, and returns the first
//! [`ConformanceError`]. Failures raised by the object under test propagate
//! unmodified. Randomness is injected by the caller, so runs against a
//! seeded RNG are deterministic.

pub mod error;
mod finite;
mod process;

pub use error::ConformanceError;
pub use finite::{verify_finite_full, verify_finite_primary, BATCH_SAMPLE_COUNT};
pub use process::{verify_process, verify_process_with_options, ProcessCheckOptions};

/// Default tolerance for the consistency checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Default observation-noise variance used when restricting a process.
pub const DEFAULT_NOISE_VARIANCE: f64 = 1e-9;

/// Default tolerance for comparing approximate-inference bounds against the
/// exact log-density.
pub const DEFAULT_BOUND_TOLERANCE: f64 = 1e-5;
