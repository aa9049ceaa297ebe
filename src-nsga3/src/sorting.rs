//! Pareto dominance and fast non-dominated sorting.

use ndarray::Array1;

/// `a` dominates `b` when it is no worse on every objective and strictly
/// better on at least one (all objectives minimized).
pub fn dominates(a: &Array1<f64>, b: &Array1<f64>) -> bool {
    let mut strictly_better = false;
    for (&ai, &bi) in a.iter().zip(b.iter()) {
        if ai > bi {
            return false;
        }
        if ai < bi {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Sort a population into non-dominated fronts (Deb's fast non-dominated
/// sort). Returns index sets, best front first; every index appears exactly
/// once.
pub fn fast_non_dominated_sort(objectives: &[Array1<f64>]) -> Vec<Vec<usize>> {
    let n = objectives.len();
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut domination_count = vec![0usize; n];
    let mut fronts: Vec<Vec<usize>> = vec![Vec::new()];

    for i in 0..n {
        for j in (i + 1)..n {
            if dominates(&objectives[i], &objectives[j]) {
                dominated_by[i].push(j);
                domination_count[j] += 1;
            } else if dominates(&objectives[j], &objectives[i]) {
                dominated_by[j].push(i);
                domination_count[i] += 1;
            }
        }
        // Every pair involving i has been visited once the inner loop ends,
        // so the count is final here.
        if domination_count[i] == 0 {
            fronts[0].push(i);
        }
    }

    let mut current = 0;
    while !fronts[current].is_empty() {
        let mut next = Vec::new();
        for &i in &fronts[current] {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next.push(j);
                }
            }
        }
        next.sort_unstable();
        fronts.push(next);
        current += 1;
    }
    fronts.pop(); // the loop always leaves one empty trailing front
    fronts
}
