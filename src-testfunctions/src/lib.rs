//! Multi-objective benchmark problems
//!
//! Small, standard problems with known Pareto fronts, used by the optimizer's
//! integration tests:
//!
//! - **Schaffer N.1**: 1 variable, 2 objectives, convex front.
//! - **Fonseca–Fleming**: n variables, 2 objectives, non-convex front.
//! - **DTLZ1**: linear front on the hyperplane `Σ fᵢ = 0.5`.
//! - **DTLZ2**: spherical front with `Σ fᵢ² = 1`.
//!
//! All functions take the decision vector and return the objective vector;
//! every objective is minimized.

use ndarray::{array, Array1};

/// Schaffer N.1: `f1 = x²`, `f2 = (x − 2)²`. Pareto-optimal for `x ∈ [0, 2]`.
pub fn schaffer_n1(x: &Array1<f64>) -> Array1<f64> {
    let x = x[0];
    array![x * x, (x - 2.0) * (x - 2.0)]
}

/// Fonseca–Fleming with the usual `1/√n` offsets.
pub fn fonseca_fleming(x: &Array1<f64>) -> Array1<f64> {
    let n = x.len() as f64;
    let shift = 1.0 / n.sqrt();
    let s1: f64 = x.iter().map(|&v| (v - shift) * (v - shift)).sum();
    let s2: f64 = x.iter().map(|&v| (v + shift) * (v + shift)).sum();
    array![1.0 - (-s1).exp(), 1.0 - (-s2).exp()]
}

fn dtlz_g1(tail: &[f64]) -> f64 {
    let k = tail.len() as f64;
    100.0
        * (k + tail
            .iter()
            .map(|&v| (v - 0.5) * (v - 0.5) - (20.0 * std::f64::consts::PI * (v - 0.5)).cos())
            .sum::<f64>())
}

fn dtlz_g2(tail: &[f64]) -> f64 {
    tail.iter().map(|&v| (v - 0.5) * (v - 0.5)).sum()
}

/// DTLZ1 with `m` objectives; decision variables in `[0, 1]`.
pub fn dtlz1(x: &Array1<f64>, m: usize) -> Array1<f64> {
    let xs = x.as_slice().expect("contiguous input");
    let g = dtlz_g1(&xs[m - 1..]);
    let mut f = Array1::zeros(m);
    for i in 0..m {
        let mut v = 0.5 * (1.0 + g);
        for &xj in &xs[..m - 1 - i] {
            v *= xj;
        }
        if i > 0 {
            v *= 1.0 - xs[m - 1 - i];
        }
        f[i] = v;
    }
    f
}

/// DTLZ2 with `m` objectives; decision variables in `[0, 1]`.
pub fn dtlz2(x: &Array1<f64>, m: usize) -> Array1<f64> {
    let xs = x.as_slice().expect("contiguous input");
    let g = dtlz_g2(&xs[m - 1..]);
    let half_pi = std::f64::consts::FRAC_PI_2;
    let mut f = Array1::zeros(m);
    for i in 0..m {
        let mut v = 1.0 + g;
        for &xj in &xs[..m - 1 - i] {
            v *= (xj * half_pi).cos();
        }
        if i > 0 {
            v *= (xs[m - 1 - i] * half_pi).sin();
        }
        f[i] = v;
    }
    f
}

/// Bounds helper: `n` copies of `(lower, upper)`.
pub fn uniform_bounds(n: usize, lower: f64, upper: f64) -> Vec<(f64, f64)> {
    vec![(lower, upper); n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn schaffer_optimum_endpoints() {
        let f0 = schaffer_n1(&arr1(&[0.0]));
        assert_eq!(f0[0], 0.0);
        assert_eq!(f0[1], 4.0);
        let f2 = schaffer_n1(&arr1(&[2.0]));
        assert_eq!(f2[0], 4.0);
        assert_eq!(f2[1], 0.0);
    }

    #[test]
    fn dtlz2_front_is_unit_sphere_at_optimum() {
        // tail at 0.5 puts g = 0, so the objectives lie on the unit sphere
        let x = arr1(&[0.3, 0.7, 0.5, 0.5, 0.5]);
        let f = dtlz2(&x, 3);
        let norm2: f64 = f.iter().map(|v| v * v).sum();
        assert!((norm2 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn dtlz1_front_sums_to_half_at_optimum() {
        let x = arr1(&[0.2, 0.9, 0.5, 0.5]);
        let f = dtlz1(&x, 3);
        assert!((f.sum() - 0.5).abs() < 1e-9);
    }
}
