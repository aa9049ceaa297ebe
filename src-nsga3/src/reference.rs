//! Das–Dennis structured reference directions.

use ndarray::Array2;

/// Number of Das–Dennis points for `m` objectives and `p` partitions:
/// `C(p + m - 1, m - 1)`.
pub fn num_reference_directions(num_objectives: usize, num_partitions: usize) -> usize {
    // Small inputs only; the running product stays well inside u64 range.
    let n = num_partitions + num_objectives - 1;
    let k = num_objectives - 1;
    let mut out: u64 = 1;
    for i in 0..k {
        out = out * (n - i) as u64 / (i + 1) as u64;
    }
    out as usize
}

/// Generate the structured reference set on the `(m-1)`-simplex: every
/// composition of `num_partitions` over `m` coordinates, normalized so each
/// row sums to one.
pub fn das_dennis(num_objectives: usize, num_partitions: usize) -> Array2<f64> {
    assert!(num_objectives >= 2, "need at least two objectives");
    assert!(num_partitions >= 1, "need at least one partition");
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(num_reference_directions(
        num_objectives,
        num_partitions,
    ));
    let mut current = vec![0usize; num_objectives];
    fill(&mut rows, &mut current, 0, num_partitions, num_partitions);
    let mut dirs = Array2::zeros((rows.len(), num_objectives));
    for (i, row) in rows.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            dirs[[i, j]] = v;
        }
    }
    dirs
}

fn fill(
    rows: &mut Vec<Vec<f64>>,
    current: &mut [usize],
    index: usize,
    remaining: usize,
    total: usize,
) {
    if index == current.len() - 1 {
        current[index] = remaining;
        rows.push(current.iter().map(|&c| c as f64 / total as f64).collect());
        return;
    }
    for c in 0..=remaining {
        current[index] = c;
        fill(rows, current, index + 1, remaining - c, total);
    }
}
