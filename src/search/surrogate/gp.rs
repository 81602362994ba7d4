//! Gaussian-process regression with a Matérn 5/2 kernel

use ndarray::{Array1, Array2, ArrayView1};

use crate::search::error::{Result, SearchError};

/// A model that can be fit to observations and queried for a posterior
pub trait Regressor {
    /// Fit to `x` (`n × d`) and targets `y` (`n`)
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Posterior mean and standard deviation at `x`
    fn predict(&self, x: ArrayView1<f64>) -> (f64, f64);
}

/// Matérn covariance with smoothness ν = 5/2
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matern52 {
    pub length_scale: f64,
    pub variance: f64,
}

impl Matern52 {
    pub fn new(length_scale: f64) -> Self {
        Self { length_scale, variance: 1.0 }
    }

    pub fn eval(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        let sq: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
        let r = sq.sqrt() / self.length_scale;
        let s5r = 5f64.sqrt() * r;
        self.variance * (1.0 + s5r + 5.0 / 3.0 * r * r) * (-s5r).exp()
    }
}

const LENGTH_SCALES: [f64; 9] = [0.05, 0.1, 0.2, 0.35, 0.5, 0.75, 1.0, 1.5, 2.5];

#[derive(Debug, Clone)]
struct Fitted {
    kernel: Matern52,
    x_train: Array2<f64>,
    chol: Array2<f64>,
    alpha: Array1<f64>,
    y_mean: f64,
    y_scale: f64,
    log_likelihood: f64,
}

/// Exact GP regression on standardized targets
///
/// The length scale is picked from a fixed grid by log marginal likelihood.
#[derive(Debug, Clone)]
pub struct GaussianProcess {
    /// Observation noise variance on the standardized scale
    pub noise: f64,
    fitted: Option<Fitted>,
}

impl Default for GaussianProcess {
    fn default() -> Self {
        Self { noise: 1e-6, fitted: None }
    }
}

impl GaussianProcess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise.max(0.0);
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Length scale chosen by the last fit
    pub fn length_scale(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.kernel.length_scale)
    }

    /// Factor the Gram matrix for `kernel`; returns (L, α, log marginal likelihood)
    fn fit_with(
        &self,
        kernel: Matern52,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Option<(Array2<f64>, Array1<f64>, f64)> {
        let n = x.nrows();
        let mut k = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in 0..=i {
                let v = kernel.eval(x.row(i), x.row(j));
                k[[i, j]] = v;
                k[[j, i]] = v;
            }
        }

        // Escalate jitter until the Gram matrix factors
        let mut jitter = self.noise.max(1e-10);
        for _ in 0..6 {
            let mut kj = k.clone();
            for i in 0..n {
                kj[[i, i]] += jitter;
            }
            if let Some(chol) = cholesky(&kj) {
                let alpha = cholesky_solve(&chol, y);
                let log_det: f64 = (0..n).map(|i| chol[[i, i]].ln()).sum();
                let ll = -0.5 * y.dot(&alpha)
                    - log_det
                    - 0.5 * n as f64 * (2.0 * std::f64::consts::PI).ln();
                return Some((chol, alpha, ll));
            }
            jitter *= 10.0;
        }
        None
    }
}

impl Regressor for GaussianProcess {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() == 0 || x.nrows() != y.len() {
            return Err(SearchError::Numerical(format!(
                "need matching non-empty data, got {} rows and {} targets",
                x.nrows(),
                y.len()
            )));
        }

        let y_mean = y.mean().unwrap_or(0.0);
        let y_std = y.std(0.0);
        let y_scale = if y_std > 1e-12 { y_std } else { 1.0 };
        let y_norm = y.mapv(|v| (v - y_mean) / y_scale);

        let mut best: Option<Fitted> = None;
        for &ls in &LENGTH_SCALES {
            let kernel = Matern52::new(ls);
            let Some((chol, alpha, ll)) = self.fit_with(kernel, x, &y_norm) else {
                continue;
            };
            if best.as_ref().is_none_or(|b| ll > b.log_likelihood) {
                best = Some(Fitted {
                    kernel,
                    x_train: x.clone(),
                    chol,
                    alpha,
                    y_mean,
                    y_scale,
                    log_likelihood: ll,
                });
            }
        }

        self.fitted = Some(best.ok_or_else(|| {
            SearchError::Numerical("covariance matrix is not positive definite".to_string())
        })?);
        Ok(())
    }

    fn predict(&self, x: ArrayView1<f64>) -> (f64, f64) {
        let Some(f) = &self.fitted else {
            return (0.0, 1.0);
        };
        let k_star: Array1<f64> =
            f.x_train.rows().into_iter().map(|row| f.kernel.eval(row, x)).collect();
        let mean = k_star.dot(&f.alpha);
        let v = forward_substitute(&f.chol, &k_star);
        let var = (f.kernel.variance - v.dot(&v)).max(0.0);
        (mean * f.y_scale + f.y_mean, var.sqrt() * f.y_scale)
    }
}

/// Lower-triangular Cholesky factor, `None` if `a` is not positive definite
pub fn cholesky(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[[i, i]] = sum.sqrt();
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }
    Some(l)
}

/// Solve `L z = b`
fn forward_substitute(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = b.len();
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * z[k];
        }
        z[i] = sum / l[[i, i]];
    }
    z
}

/// Solve `L Lᵀ x = b`
fn cholesky_solve(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let z = forward_substitute(l, b);
    let n = z.len();
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * x[k];
        }
        x[i] = sum / l[[i, i]];
    }
    x
}
