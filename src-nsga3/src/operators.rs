//! Real-coded variation operators: simulated binary crossover and polynomial
//! mutation, both bound-respecting.

use ndarray::Array1;
use rand::Rng;

fn clip(x: &mut Array1<f64>, lower: &Array1<f64>, upper: &Array1<f64>) {
    for j in 0..x.len() {
        if x[j] < lower[j] {
            x[j] = lower[j];
        }
        if x[j] > upper[j] {
            x[j] = upper[j];
        }
    }
}

/// Simulated binary crossover (Deb & Agrawal).
///
/// With probability `prob` the pair is recombined coordinate-wise; otherwise
/// the parents are returned unchanged. `eta` is the distribution index:
/// larger values keep children closer to their parents. Children are clipped
/// into `[lower, upper]`.
pub fn sbx_crossover<R: Rng + ?Sized>(
    p1: &Array1<f64>,
    p2: &Array1<f64>,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    prob: f64,
    eta: f64,
    rng: &mut R,
) -> (Array1<f64>, Array1<f64>) {
    let mut c1 = p1.clone();
    let mut c2 = p2.clone();
    if rng.random::<f64>() > prob {
        return (c1, c2);
    }
    let exponent = 1.0 / (eta + 1.0);
    for j in 0..p1.len() {
        if rng.random::<f64>() > 0.5 {
            continue;
        }
        if (p1[j] - p2[j]).abs() <= 1e-14 {
            continue;
        }
        let u: f64 = rng.random();
        let beta = if u <= 0.5 {
            (2.0 * u).powf(exponent)
        } else {
            (1.0 / (2.0 * (1.0 - u))).powf(exponent)
        };
        let v1 = 0.5 * ((1.0 + beta) * p1[j] + (1.0 - beta) * p2[j]);
        let v2 = 0.5 * ((1.0 - beta) * p1[j] + (1.0 + beta) * p2[j]);
        if rng.random::<f64>() <= 0.5 {
            c1[j] = v1;
            c2[j] = v2;
        } else {
            c1[j] = v2;
            c2[j] = v1;
        }
    }
    clip(&mut c1, lower, upper);
    clip(&mut c2, lower, upper);
    (c1, c2)
}

/// Polynomial mutation (Deb). Each coordinate mutates with probability
/// `prob`; the perturbation scale follows the distribution index `eta` and
/// the coordinate's bound span. Mutants are clipped into bounds.
pub fn polynomial_mutation<R: Rng + ?Sized>(
    x: &mut Array1<f64>,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    prob: f64,
    eta: f64,
    rng: &mut R,
) {
    let exponent = 1.0 / (eta + 1.0);
    for j in 0..x.len() {
        if rng.random::<f64>() > prob {
            continue;
        }
        let span = upper[j] - lower[j];
        if span <= 0.0 {
            continue;
        }
        let u: f64 = rng.random();
        let delta = if u < 0.5 {
            (2.0 * u).powf(exponent) - 1.0
        } else {
            1.0 - (2.0 * (1.0 - u)).powf(exponent)
        };
        x[j] += delta * span;
    }
    clip(x, lower, upper);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sbx_children_respect_bounds() {
        let lower = arr1(&[0.0, 0.0, 0.0]);
        let upper = arr1(&[1.0, 2.0, 3.0]);
        let p1 = arr1(&[0.1, 1.9, 0.2]);
        let p2 = arr1(&[0.9, 0.1, 2.8]);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let (c1, c2) = sbx_crossover(&p1, &p2, &lower, &upper, 0.9, 15.0, &mut rng);
            for c in [&c1, &c2] {
                for j in 0..3 {
                    assert!(c[j] >= lower[j] && c[j] <= upper[j]);
                }
            }
        }
    }

    #[test]
    fn sbx_zero_probability_returns_parents() {
        let lower = arr1(&[0.0; 2]);
        let upper = arr1(&[1.0; 2]);
        let p1 = arr1(&[0.25, 0.75]);
        let p2 = arr1(&[0.5, 0.5]);
        let mut rng = StdRng::seed_from_u64(1);
        let (c1, c2) = sbx_crossover(&p1, &p2, &lower, &upper, 0.0, 15.0, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }

    #[test]
    fn mutation_respects_bounds_and_moves_points() {
        let lower = arr1(&[-1.0; 4]);
        let upper = arr1(&[1.0; 4]);
        let mut rng = StdRng::seed_from_u64(9);
        let mut moved = false;
        for _ in 0..100 {
            let mut x = arr1(&[0.5, -0.5, 0.99, -0.99]);
            let before = x.clone();
            polynomial_mutation(&mut x, &lower, &upper, 1.0, 20.0, &mut rng);
            for j in 0..4 {
                assert!(x[j] >= -1.0 && x[j] <= 1.0);
            }
            if x != before {
                moved = true;
            }
        }
        assert!(moved);
    }

    #[test]
    fn mutation_leaves_fixed_coordinates_alone() {
        let lower = arr1(&[2.0]);
        let upper = arr1(&[2.0]);
        let mut x = arr1(&[2.0]);
        let mut rng = StdRng::seed_from_u64(3);
        polynomial_mutation(&mut x, &lower, &upper, 1.0, 20.0, &mut rng);
        assert_eq!(x[0], 2.0);
    }
}
