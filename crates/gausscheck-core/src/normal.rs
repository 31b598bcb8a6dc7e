use serde::{Deserialize, Serialize};

/// Univariate normal summary, the per-coordinate marginal of a finite
/// distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normal {
    pub mean: f64,
    pub variance: f64,
}

impl Normal {
    pub fn new(mean: f64, variance: f64) -> Self {
        Normal { mean, variance }
    }

    pub fn std_dev(&self) -> f64 {
        // Clamp so a variance that is negative by round-off does not poison
        // downstream ribbons with NaN.
        self.variance.max(0.0).sqrt()
    }

    /// Log-density at `x`; `-inf` for a degenerate (zero-variance) summary.
    pub fn logpdf(&self, x: f64) -> f64 {
        if self.variance <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let resid = x - self.mean;
        -0.5 * ((2.0 * std::f64::consts::PI * self.variance).ln() + resid * resid / self.variance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx::approx_eq;

    #[test]
    fn standard_normal_logpdf_at_zero() {
        let n = Normal::new(0.0, 1.0);
        // -0.5 * ln(2π)
        assert!(approx_eq(n.logpdf(0.0), -0.918_938_533_204_672_7, 1e-12));
    }

    #[test]
    fn logpdf_matches_closed_form_off_center() {
        let n = Normal::new(1.5, 4.0);
        let expected = -0.5 * ((2.0 * std::f64::consts::PI * 4.0).ln() + (3.0f64 - 1.5).powi(2) / 4.0);
        assert!(approx_eq(n.logpdf(3.0), expected, 1e-12));
    }

    #[test]
    fn degenerate_variance_yields_negative_infinity() {
        assert_eq!(Normal::new(0.0, 0.0).logpdf(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn std_dev_clamps_round_off_negative_variance() {
        assert_eq!(Normal::new(0.0, -1e-18).std_dev(), 0.0);
    }
}
