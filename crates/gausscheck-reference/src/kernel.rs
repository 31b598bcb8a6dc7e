use gausscheck_core::GpError;
use serde::{Deserialize, Serialize};

/// Stationary covariance function over 1-D inputs.
pub trait Kernel: Clone {
    fn eval(&self, x: f64, z: f64) -> f64;
}

fn require_positive(name: &'static str, value: f64) -> Result<(), GpError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GpError::InvalidKernelParameter { name, value })
    }
}

/// Squared-exponential kernel `v * exp(-(x - z)² / (2 l²))`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquaredExponential {
    variance: f64,
    lengthscale: f64,
}

impl SquaredExponential {
    pub fn new(variance: f64, lengthscale: f64) -> Result<Self, GpError> {
        require_positive("variance", variance)?;
        require_positive("lengthscale", lengthscale)?;
        Ok(SquaredExponential {
            variance,
            lengthscale,
        })
    }
}

impl Kernel for SquaredExponential {
    fn eval(&self, x: f64, z: f64) -> f64 {
        let d = (x - z) / self.lengthscale;
        self.variance * (-0.5 * d * d).exp()
    }
}

/// Matérn-5/2 kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matern52 {
    variance: f64,
    lengthscale: f64,
}

impl Matern52 {
    pub fn new(variance: f64, lengthscale: f64) -> Result<Self, GpError> {
        require_positive("variance", variance)?;
        require_positive("lengthscale", lengthscale)?;
        Ok(Matern52 {
            variance,
            lengthscale,
        })
    }
}

impl Kernel for Matern52 {
    fn eval(&self, x: f64, z: f64) -> f64 {
        let r = 5.0f64.sqrt() * (x - z).abs() / self.lengthscale;
        self.variance * (1.0 + r + r * r / 3.0) * (-r).exp()
    }
}
