//! Reference-point niching: adaptive normalization, association by
//! perpendicular distance, and least-crowded survivor selection.

use ndarray::{Array1, Array2};

const ASF_WEIGHT_EPS: f64 = 1e-6;
const INTERCEPT_EPS: f64 = 1e-6;

/// Association of one individual with its nearest reference direction.
#[derive(Debug, Clone, Copy)]
pub struct Association {
    pub ref_idx: usize,
    pub distance: f64,
}

/// Achievement scalarizing function with an axis-aligned weight vector.
fn asf(translated: &Array1<f64>, axis: usize) -> f64 {
    translated
        .iter()
        .enumerate()
        .map(|(k, &v)| {
            let w = if k == axis { 1.0 } else { ASF_WEIGHT_EPS };
            v / w
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Solve `a x = b` by Gaussian elimination with partial pivoting. `None` when
/// the system is (numerically) singular.
fn solve_linear(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    for col in 0..n {
        let mut pivot = col;
        for row in (col + 1)..n {
            if a[[row, col]].abs() > a[[pivot, col]].abs() {
                pivot = row;
            }
        }
        if a[[pivot, col]].abs() < 1e-12 {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                let tmp = a[[col, k]];
                a[[col, k]] = a[[pivot, k]];
                a[[pivot, k]] = tmp;
            }
            b.swap(col, pivot);
        }
        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = Array1::zeros(n);
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[[row, k]] * x[k];
        }
        x[row] = sum / a[[row, row]];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Normalize the considered objective set: translate so the per-axis minimum
/// sits at the origin, estimate the front's intercepts from the extreme
/// points' hyperplane, and divide each axis by its intercept. Falls back to
/// the translated nadir when the hyperplane is degenerate.
pub fn normalize(points: &[Array1<f64>]) -> Vec<Array1<f64>> {
    let m = points[0].len();
    let mut ideal = Array1::from_elem(m, f64::INFINITY);
    for p in points {
        for k in 0..m {
            if p[k] < ideal[k] {
                ideal[k] = p[k];
            }
        }
    }
    let translated: Vec<Array1<f64>> = points.iter().map(|p| p - &ideal).collect();

    let mut extremes = Array2::zeros((m, m));
    for axis in 0..m {
        let mut best = 0usize;
        let mut best_asf = f64::INFINITY;
        for (i, t) in translated.iter().enumerate() {
            let v = asf(t, axis);
            if v < best_asf {
                best_asf = v;
                best = i;
            }
        }
        for k in 0..m {
            extremes[[axis, k]] = translated[best][k];
        }
    }

    let mut intercepts = match solve_linear(extremes, Array1::ones(m)) {
        Some(plane) if plane.iter().all(|&a| a > INTERCEPT_EPS) => {
            Array1::from_iter(plane.iter().map(|&a| 1.0 / a))
        }
        _ => nadir(&translated),
    };
    for v in intercepts.iter_mut() {
        if !v.is_finite() || *v < INTERCEPT_EPS {
            *v = 1.0;
        }
    }

    translated.into_iter().map(|t| &t / &intercepts).collect()
}

fn nadir(translated: &[Array1<f64>]) -> Array1<f64> {
    let m = translated[0].len();
    let mut out = Array1::from_elem(m, f64::NEG_INFINITY);
    for t in translated {
        for k in 0..m {
            if t[k] > out[k] {
                out[k] = t[k];
            }
        }
    }
    out
}

/// Associate each normalized point with its nearest reference direction by
/// perpendicular distance to the ray through the direction.
pub fn associate(normalized: &[Array1<f64>], ref_dirs: &Array2<f64>) -> Vec<Association> {
    normalized
        .iter()
        .map(|f| {
            let mut best = Association {
                ref_idx: 0,
                distance: f64::INFINITY,
            };
            for (r, dir) in ref_dirs.rows().into_iter().enumerate() {
                let dir_norm2: f64 = dir.iter().map(|v| v * v).sum();
                let proj: f64 = f.iter().zip(dir.iter()).map(|(a, b)| a * b).sum::<f64>() / dir_norm2;
                let dist2: f64 = f
                    .iter()
                    .zip(dir.iter())
                    .map(|(a, b)| {
                        let d = a - proj * b;
                        d * d
                    })
                    .sum();
                let dist = dist2.sqrt();
                if dist < best.distance {
                    best = Association { ref_idx: r, distance: dist };
                }
            }
            best
        })
        .collect()
}

/// Pick `k` survivors from the overflow front by round-robin over the least
/// crowded niches.
///
/// `associations` covers the whole considered set; `selected` are the
/// indices already surviving (their niches are pre-counted). Ties between
/// niches break on the lower reference index, ties between candidates on the
/// smaller perpendicular distance then the lower index, so the selection is
/// fully deterministic.
pub fn niche_select(
    candidates: &[usize],
    associations: &[Association],
    selected: &[usize],
    num_refs: usize,
    k: usize,
) -> Vec<usize> {
    let mut niche_count = vec![0usize; num_refs];
    for &i in selected {
        niche_count[associations[i].ref_idx] += 1;
    }
    let mut per_ref: Vec<Vec<usize>> = vec![Vec::new(); num_refs];
    for &i in candidates {
        per_ref[associations[i].ref_idx].push(i);
    }
    for list in per_ref.iter_mut() {
        list.sort_by(|&a, &b| {
            associations[a]
                .distance
                .partial_cmp(&associations[b].distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
    }

    let mut chosen = Vec::with_capacity(k);
    while chosen.len() < k {
        let mut best_ref = None;
        let mut best_count = usize::MAX;
        for r in 0..num_refs {
            if per_ref[r].is_empty() {
                continue;
            }
            if niche_count[r] < best_count {
                best_count = niche_count[r];
                best_ref = Some(r);
            }
        }
        let Some(r) = best_ref else {
            break; // no candidates left anywhere
        };
        let i = per_ref[r].remove(0);
        niche_count[r] += 1;
        chosen.push(i);
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::das_dennis;
    use ndarray::arr1;

    #[test]
    fn solve_linear_inverts_a_simple_system() {
        let a = ndarray::arr2(&[[2.0, 0.0], [0.0, 4.0]]);
        let x = solve_linear(a, arr1(&[1.0, 1.0])).unwrap();
        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!((x[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn normalize_maps_extremes_near_unit_axes() {
        // Points on the plane f0 + f1 = 1, shifted by (1, 2).
        let points = vec![
            arr1(&[1.0, 3.0]),
            arr1(&[2.0, 2.0]),
            arr1(&[1.5, 2.5]),
        ];
        let normalized = normalize(&points);
        // after translation the extremes are (0,1) and (1,0)
        assert!((normalized[0][0] - 0.0).abs() < 1e-9);
        assert!((normalized[0][1] - 1.0).abs() < 1e-9);
        assert!((normalized[1][0] - 1.0).abs() < 1e-9);
        assert!((normalized[1][1] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_front_falls_back_without_nans() {
        // identical points make the hyperplane singular
        let points = vec![arr1(&[1.0, 1.0]), arr1(&[1.0, 1.0])];
        let normalized = normalize(&points);
        for p in normalized {
            assert!(p.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn associate_picks_the_aligned_direction() {
        let dirs = das_dennis(2, 4);
        let normalized = vec![arr1(&[1.0, 0.0]), arr1(&[0.0, 1.0]), arr1(&[0.5, 0.5])];
        let assoc = associate(&normalized, &dirs);
        assert_eq!(dirs.row(assoc[0].ref_idx).to_vec(), vec![1.0, 0.0]);
        assert_eq!(dirs.row(assoc[1].ref_idx).to_vec(), vec![0.0, 1.0]);
        assert_eq!(dirs.row(assoc[2].ref_idx).to_vec(), vec![0.5, 0.5]);
        assert!(assoc.iter().all(|a| a.distance < 1e-12));
    }

    #[test]
    fn niche_select_prefers_empty_niches() {
        let dirs = das_dennis(2, 2); // (1,0), (.5,.5), (0,1) after ordering
        let normalized = vec![
            arr1(&[1.0, 0.02]),
            arr1(&[0.02, 1.0]),
            arr1(&[0.5, 0.5]),
            arr1(&[0.55, 0.5]),
        ];
        let assoc = associate(&normalized, &dirs);
        // index 0 already selected; its niche is crowded
        let chosen = niche_select(&[1, 2, 3], &assoc, &[0], dirs.nrows(), 2);
        assert_eq!(chosen.len(), 2);
        // both fresh niches are served before the crowded one gets a second
        assert!(chosen.contains(&1));
        assert!(chosen.contains(&2));
    }
}
