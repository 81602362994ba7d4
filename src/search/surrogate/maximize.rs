//! Bounded local maximization on the unit cube

/// Projected gradient ascent settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AscentOptions {
    pub max_iter: usize,
    pub initial_step: f64,
    pub min_step: f64,
    /// Finite-difference half-width
    pub h: f64,
}

impl Default for AscentOptions {
    fn default() -> Self {
        Self { max_iter: 50, initial_step: 0.1, min_step: 1e-6, h: 1e-4 }
    }
}

fn project(x: &mut [f64]) {
    for v in x.iter_mut() {
        *v = v.clamp(0.0, 1.0);
    }
}

/// Central-difference gradient, one-sided at the bounds
fn gradient<F: Fn(&[f64]) -> f64>(f: &F, x: &[f64], h: f64) -> Vec<f64> {
    let mut probe = x.to_vec();
    (0..x.len())
        .map(|i| {
            let lo = (x[i] - h).max(0.0);
            let hi = (x[i] + h).min(1.0);
            if hi <= lo {
                return 0.0;
            }
            probe[i] = hi;
            let f_hi = f(&probe);
            probe[i] = lo;
            let f_lo = f(&probe);
            probe[i] = x[i];
            (f_hi - f_lo) / (hi - lo)
        })
        .collect()
}

/// Climb from `start` inside `[0, 1]^d`, returning the best point and its value
pub fn ascend<F: Fn(&[f64]) -> f64>(f: &F, start: &[f64], opts: AscentOptions) -> (Vec<f64>, f64) {
    let mut x = start.to_vec();
    project(&mut x);
    let mut fx = f(&x);
    let mut step = opts.initial_step;

    for _ in 0..opts.max_iter {
        let g = gradient(f, &x, opts.h);
        let norm = g.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm < 1e-12 || !norm.is_finite() {
            break;
        }

        let mut improved = false;
        while step >= opts.min_step {
            let mut candidate: Vec<f64> =
                x.iter().zip(&g).map(|(xi, gi)| xi + step * gi / norm).collect();
            project(&mut candidate);
            let fc = f(&candidate);
            if fc > fx {
                x = candidate;
                fx = fc;
                improved = true;
                step *= 2.0;
                break;
            }
            step *= 0.5;
        }
        if !improved {
            break;
        }
    }
    (x, fx)
}

/// Run [`ascend`] from every start and keep the overall best
pub fn maximize<F: Fn(&[f64]) -> f64>(
    f: &F,
    starts: &[Vec<f64>],
    opts: AscentOptions,
) -> Option<(Vec<f64>, f64)> {
    starts
        .iter()
        .map(|s| ascend(f, s, opts))
        .fold(None, |best: Option<(Vec<f64>, f64)>, cur| match best {
            Some(b) if b.1 >= cur.1 => Some(b),
            _ => Some(cur),
        })
}
