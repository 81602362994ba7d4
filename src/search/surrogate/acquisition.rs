//! Expected Improvement acquisition

use std::f64::consts::{PI, SQRT_2};

/// Expected improvement over `f_best` for a maximized objective
///
/// `EI = (μ - f_best) Φ(Z) + σ φ(Z)` with `Z = (μ - f_best) / σ`; zero where `σ = 0`.
pub fn expected_improvement(mean: f64, std: f64, f_best: f64) -> f64 {
    if std <= 0.0 || !std.is_finite() {
        return 0.0;
    }
    let improvement = mean - f_best;
    let z = improvement / std;
    (improvement * normal_cdf(z) + std * normal_pdf(z)).max(0.0)
}

/// Standard normal CDF
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / SQRT_2))
}

/// Standard normal PDF
pub fn normal_pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * PI).sqrt()
}

/// Error function approximation (Abramowitz & Stegun 7.1.26)
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normal_cdf_reference_values() {
        assert_abs_diff_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-7);
        assert_abs_diff_eq!(normal_cdf(1.96), 0.975, epsilon = 1e-4);
        assert_abs_diff_eq!(normal_cdf(-1.0), 0.158655, epsilon = 1e-5);
    }

    #[test]
    fn test_normal_pdf_peak() {
        assert_abs_diff_eq!(normal_pdf(0.0), 0.398942, epsilon = 1e-6);
        assert_abs_diff_eq!(normal_pdf(1.0), normal_pdf(-1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_ei_zero_without_uncertainty() {
        assert_eq!(expected_improvement(5.0, 0.0, 1.0), 0.0);
        assert_eq!(expected_improvement(5.0, -1.0, 1.0), 0.0);
    }

    #[test]
    fn test_ei_at_incumbent() {
        // μ = f_best: EI = σ φ(0)
        assert_abs_diff_eq!(expected_improvement(1.0, 2.0, 1.0), 2.0 * normal_pdf(0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_ei_monotone_in_mean_and_std() {
        let base = expected_improvement(0.0, 1.0, 0.5);
        assert!(expected_improvement(0.3, 1.0, 0.5) > base);
        assert!(expected_improvement(0.0, 2.0, 0.5) > base);
        assert!(base > 0.0);
    }
}
