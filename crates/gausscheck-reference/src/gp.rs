use gausscheck_core::{GpError, Matrix, Process};

use crate::bounds;
use crate::finite::FiniteGp;
use crate::kernel::Kernel;

/// Exact Gaussian process with a constant mean function.
///
/// A freshly constructed process is the prior; conditioning a restriction on
/// observed outcomes yields the same type carrying an observation block, so
/// repeated conditioning folds new data into one factorization against the
/// prior kernel.
#[derive(Debug, Clone)]
pub struct ExactGp<K: Kernel> {
    mean: f64,
    kernel: K,
    observations: Option<ObservationBlock>,
}

/// Training data together with its cached Cholesky machinery.
#[derive(Debug, Clone)]
struct ObservationBlock {
    x: Vec<f64>,
    y: Vec<f64>,
    noise: Vec<f64>,
    /// Lower Cholesky factor of `K(x, x) + diag(noise)`.
    chol: Matrix,
    /// `(K(x, x) + diag(noise))⁻¹ (y - mean)`.
    alpha: Vec<f64>,
}

/// Forward substitution against a Cholesky factor.
///
/// The factor comes out of a successful `cholesky`, so its diagonal is
/// strictly positive and the solve cannot fail.
fn forward_solve_matrix(l: &Matrix, b: &Matrix) -> Matrix {
    let n = l.rows();
    let mut x = Matrix::zeros(n, b.cols());
    for j in 0..b.cols() {
        for i in 0..n {
            let mut sum = b[(i, j)];
            for k in 0..i {
                sum -= l[(i, k)] * x[(k, j)];
            }
            x[(i, j)] = sum / l[(i, i)];
        }
    }
    x
}

fn forward_solve_vec(l: &Matrix, b: &[f64]) -> Vec<f64> {
    let n = l.rows();
    let mut x = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[(i, k)] * x[k];
        }
        x[i] = sum / l[(i, i)];
    }
    x
}

fn backward_solve_vec(u_from_lower: &Matrix, b: &[f64]) -> Vec<f64> {
    // Treats `u_from_lower` as the transpose of a lower Cholesky factor.
    let n = u_from_lower.rows();
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for k in i + 1..n {
            sum -= u_from_lower[(k, i)] * x[k];
        }
        x[i] = sum / u_from_lower[(i, i)];
    }
    x
}

impl<K: Kernel> ExactGp<K> {
    /// Prior process with the given constant mean.
    pub fn new(mean: f64, kernel: K) -> Self {
        ExactGp {
            mean,
            kernel,
            observations: None,
        }
    }

    pub fn constant_mean(&self) -> f64 {
        self.mean
    }

    /// Number of observations folded into this process.
    pub fn observation_count(&self) -> usize {
        self.observations.as_ref().map_or(0, |obs| obs.x.len())
    }

    /// Prior-kernel Gram block between two index sets.
    fn prior_cov_between(&self, x: &[f64], z: &[f64]) -> Matrix {
        Matrix::from_fn(x.len(), z.len(), |i, j| self.kernel.eval(x[i], z[j]))
    }

    /// Condition on outcomes `y` observed at `x` under the given noise,
    /// merging with any observations already present.
    pub(crate) fn condition_at(
        &self,
        x: &[f64],
        noise_variance: f64,
        y: &[f64],
    ) -> Result<ExactGp<K>, GpError> {
        if y.len() != x.len() {
            return Err(GpError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        let (mut xs, mut ys, mut noises) = match &self.observations {
            Some(obs) => (obs.x.clone(), obs.y.clone(), obs.noise.clone()),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };
        xs.extend_from_slice(x);
        ys.extend_from_slice(y);
        noises.extend(std::iter::repeat(noise_variance).take(x.len()));

        let mut gram = self.prior_cov_between(&xs, &xs);
        for (i, n) in noises.iter().enumerate() {
            gram[(i, i)] += n;
        }
        let chol = bounds::cholesky_with_jitter(&gram)?;
        let resid: Vec<f64> = ys.iter().map(|v| v - self.mean).collect();
        let alpha = backward_solve_vec(&chol, &forward_solve_vec(&chol, &resid));

        Ok(ExactGp {
            mean: self.mean,
            kernel: self.kernel.clone(),
            observations: Some(ObservationBlock {
                x: xs,
                y: ys,
                noise: noises,
                chol,
                alpha,
            }),
        })
    }
}

impl<K: Kernel> Process for ExactGp<K> {
    type Finite = FiniteGp<K>;

    fn at(&self, x: &[f64], noise_variance: f64) -> Result<FiniteGp<K>, GpError> {
        if x.is_empty() {
            return Err(GpError::EmptyIndexSet);
        }
        if !(noise_variance >= 0.0) {
            return Err(GpError::InvalidNoiseVariance(noise_variance));
        }
        Ok(FiniteGp::new(self.clone(), x.to_vec(), noise_variance))
    }

    fn mean(&self, x: &[f64]) -> Vec<f64> {
        match &self.observations {
            None => vec![self.mean; x.len()],
            Some(obs) => {
                let k_xt = self.prior_cov_between(x, &obs.x);
                (0..x.len())
                    .map(|i| {
                        let correction: f64 = k_xt
                            .row(i)
                            .iter()
                            .zip(&obs.alpha)
                            .map(|(k, a)| k * a)
                            .sum();
                        self.mean + correction
                    })
                    .collect()
            }
        }
    }

    fn cov_between(&self, x: &[f64], z: &[f64]) -> Matrix {
        let prior = self.prior_cov_between(x, z);
        match &self.observations {
            None => prior,
            Some(obs) => {
                let a_x = forward_solve_matrix(&obs.chol, &self.prior_cov_between(&obs.x, x));
                let a_z = forward_solve_matrix(&obs.chol, &self.prior_cov_between(&obs.x, z));
                Matrix::from_fn(x.len(), z.len(), |i, j| {
                    let correction: f64 =
                        (0..obs.x.len()).map(|k| a_x[(k, i)] * a_z[(k, j)]).sum();
                    prior[(i, j)] - correction
                })
            }
        }
    }

    fn elbo(&self, fx: &FiniteGp<K>, y: &[f64], inducing: &FiniteGp<K>) -> Result<f64, GpError> {
        bounds::elbo(self, fx, y, inducing)
    }

    fn dtc(&self, fx: &FiniteGp<K>, y: &[f64], inducing: &FiniteGp<K>) -> Result<f64, GpError> {
        bounds::dtc(self, fx, y, inducing)
    }
}
