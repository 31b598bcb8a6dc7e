//! Shared types for the gausscheck workspace.
//!
//! This crate defines the layered Gaussian-process interface that the
//! conformance harness verifies ([`Process`] and [`FiniteDistribution`]),
//! along with the dense [`Matrix`] type, the symmetric linear-algebra
//! routines the checks rely on, and the shared error taxonomy.

pub mod approx;
pub mod error;
pub mod gp;
pub mod linalg;
pub mod matrix;
pub mod normal;

pub use error::{GpError, MatrixError};
pub use gp::{FiniteDistribution, Process};
pub use linalg::LinalgError;
pub use matrix::Matrix;
pub use normal::Normal;
