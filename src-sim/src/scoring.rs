//! Driver×lot scoring kernel.
//!
//! Maps every (driver, lot) pair to a utility score; lower is better. A lot
//! the driver cannot afford scores `+∞` so it can never win an argmin. The
//! kernel is a pure reduction with no cross-driver dependency, so rows are
//! scored in parallel once the driver count justifies the fork overhead.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis, Zip};

use parkopt_model::DriverWeights;

/// Fee normalization constant (hourly fees are scored relative to 10 units).
pub const NORM_FEE: f32 = 10.0;
/// Distance normalization constant.
pub const NORM_DIST: f32 = 100.0;

/// Driver counts below this are scored serially; the vectorized loop beats
/// the fork-join overhead on small batches.
pub const PARALLEL_DRIVER_THRESHOLD: usize = 5_000;

fn fill_row(
    start: ArrayView1<f32>,
    dest: ArrayView1<f32>,
    max_fee: f32,
    lot_positions: &ArrayView2<f32>,
    lot_fees: &ArrayView1<f32>,
    lot_occupancy: &ArrayView1<f32>,
    weights: &DriverWeights,
    mut row: ArrayViewMut1<f32>,
) {
    let w_fee = weights.fee as f32;
    let w_drive = weights.distance_to_lot as f32;
    let w_walk = weights.walking as f32;
    let w_avail = weights.availability as f32;
    for j in 0..lot_fees.len() {
        let fee = lot_fees[j];
        if fee > max_fee {
            row[j] = f32::INFINITY;
            continue;
        }
        let dlat = start[0] - lot_positions[[j, 0]];
        let dlon = start[1] - lot_positions[[j, 1]];
        let drive_dist = (dlat * dlat + dlon * dlon).sqrt();
        let wlat = lot_positions[[j, 0]] - dest[0];
        let wlon = lot_positions[[j, 1]] - dest[1];
        let walk_dist = (wlat * wlat + wlon * wlon).sqrt();
        row[j] = w_fee * fee / NORM_FEE
            + w_drive * drive_dist / NORM_DIST
            + w_walk * walk_dist / NORM_DIST
            + w_avail * lot_occupancy[j];
    }
}

/// Compute the `(drivers × lots)` score matrix, choosing the serial or
/// parallel path by driver count.
///
/// `driver_starts` and `driver_dests` are `(D, 2)`, `lot_positions` is
/// `(L, 2)`; the remaining arrays are per-driver or per-lot vectors.
pub fn score_matrix(
    driver_starts: ArrayView2<f32>,
    driver_dests: ArrayView2<f32>,
    driver_max_fees: ArrayView1<f32>,
    lot_positions: ArrayView2<f32>,
    lot_fees: ArrayView1<f32>,
    lot_occupancy: ArrayView1<f32>,
    weights: &DriverWeights,
) -> Array2<f32> {
    if driver_starts.nrows() >= PARALLEL_DRIVER_THRESHOLD {
        score_matrix_parallel(
            driver_starts,
            driver_dests,
            driver_max_fees,
            lot_positions,
            lot_fees,
            lot_occupancy,
            weights,
        )
    } else {
        score_matrix_serial(
            driver_starts,
            driver_dests,
            driver_max_fees,
            lot_positions,
            lot_fees,
            lot_occupancy,
            weights,
        )
    }
}

/// Serial vectorized path.
pub fn score_matrix_serial(
    driver_starts: ArrayView2<f32>,
    driver_dests: ArrayView2<f32>,
    driver_max_fees: ArrayView1<f32>,
    lot_positions: ArrayView2<f32>,
    lot_fees: ArrayView1<f32>,
    lot_occupancy: ArrayView1<f32>,
    weights: &DriverWeights,
) -> Array2<f32> {
    let mut scores = Array2::<f32>::zeros((driver_starts.nrows(), lot_fees.len()));
    for (i, row) in scores.axis_iter_mut(Axis(0)).enumerate() {
        fill_row(
            driver_starts.row(i),
            driver_dests.row(i),
            driver_max_fees[i],
            &lot_positions,
            &lot_fees,
            &lot_occupancy,
            weights,
            row,
        );
    }
    scores
}

/// Data-parallel path: rows are independent, so they are scored across the
/// rayon pool.
pub fn score_matrix_parallel(
    driver_starts: ArrayView2<f32>,
    driver_dests: ArrayView2<f32>,
    driver_max_fees: ArrayView1<f32>,
    lot_positions: ArrayView2<f32>,
    lot_fees: ArrayView1<f32>,
    lot_occupancy: ArrayView1<f32>,
    weights: &DriverWeights,
) -> Array2<f32> {
    let mut scores = Array2::<f32>::zeros((driver_starts.nrows(), lot_fees.len()));
    Zip::from(scores.axis_iter_mut(Axis(0)))
        .and(driver_starts.axis_iter(Axis(0)))
        .and(driver_dests.axis_iter(Axis(0)))
        .and(&driver_max_fees)
        .par_for_each(|row, start, dest, &max_fee| {
            fill_row(
                start,
                dest,
                max_fee,
                &lot_positions,
                &lot_fees,
                &lot_occupancy,
                weights,
                row,
            );
        });
    scores
}
