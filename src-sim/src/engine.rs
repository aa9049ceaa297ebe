//! Batched driver-to-lot assignment engine.

use ndarray::{s, Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use parkopt_model::{City, Driver, DriverWeights};

use crate::scoring::score_matrix;

/// Drivers per assignment batch. Scores are computed for a whole batch at
/// once; capacity feedback applies between batches and sequentially within
/// one.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Cost charged to a driver who found no acceptable lot.
pub const DEFAULT_REJECTION_PENALTY: f64 = 100.0;

/// Everything a simulation run measures.
///
/// The optimizer reduces this to four objectives, but the full record is kept
/// for callers that want the detail (rejections, walking distances, per-lot
/// breakdowns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub total_revenue: f64,
    pub average_revenue_per_lot: f64,
    pub total_parked: usize,
    pub total_rejected: usize,
    pub overall_occupancy_rate: f64,
    /// Sample variance of per-lot occupancy; 0 for a single lot.
    pub occupancy_variance: f64,
    pub occupancy_std_dev: f64,
    /// Mean of fees paid plus rejection penalties, over all drivers.
    pub average_driver_cost: f64,
    pub average_walking_distance: f64,
    pub average_fee_paid: f64,
    pub utilization_rate: f64,
    pub rejection_rate: f64,
    /// Per-lot occupancy after assignment, in input zone order.
    pub lot_occupancy: Vec<f64>,
    /// Per-lot revenue, in input zone order.
    pub lot_revenue: Vec<f64>,
}

/// Immutable per-run simulation state: lot geometry and the precomputed
/// driver arrays, reused across every fee-vector evaluation.
///
/// `run` keeps all mutable assignment state (capacities, revenues) in locals,
/// so a `SimulationWorld` can be shared across threads.
#[derive(Debug, Clone)]
pub struct SimulationWorld {
    lot_positions: Array2<f32>,
    lot_capacities: Vec<u32>,
    total_capacity: u32,
    driver_starts: Array2<f32>,
    driver_dests: Array2<f32>,
    driver_max_fees: Array1<f32>,
    driver_durations: Vec<u32>,
    weights: DriverWeights,
    batch_size: usize,
    rejection_penalty: f64,
}

impl SimulationWorld {
    /// Precompute the arrays for a city and a fixed driver population.
    pub fn new(city: &City, drivers: &[Driver], weights: DriverWeights) -> Self {
        let lot_positions = Array2::from_shape_fn((city.zones.len(), 2), |(j, k)| {
            let p = city.zones[j].position;
            if k == 0 { p.lat as f32 } else { p.lon as f32 }
        });
        let driver_starts = Array2::from_shape_fn((drivers.len(), 2), |(i, k)| {
            let p = drivers[i].starting_position;
            if k == 0 { p.lat as f32 } else { p.lon as f32 }
        });
        let driver_dests = Array2::from_shape_fn((drivers.len(), 2), |(i, k)| {
            let p = drivers[i].destination;
            if k == 0 { p.lat as f32 } else { p.lon as f32 }
        });
        let driver_max_fees = Array1::from_iter(drivers.iter().map(|d| d.max_parking_fee as f32));
        let driver_durations = drivers.iter().map(|d| d.desired_parking_time).collect();
        Self {
            lot_positions,
            lot_capacities: city.zones.iter().map(|z| z.maximum_capacity).collect(),
            total_capacity: city.total_capacity(),
            driver_starts,
            driver_dests,
            driver_max_fees,
            driver_durations,
            weights,
            batch_size: DEFAULT_BATCH_SIZE,
            rejection_penalty: DEFAULT_REJECTION_PENALTY,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        self.batch_size = batch_size;
        self
    }

    pub fn with_rejection_penalty(mut self, penalty: f64) -> Self {
        self.rejection_penalty = penalty;
        self
    }

    pub fn num_drivers(&self) -> usize {
        self.driver_durations.len()
    }

    pub fn num_lots(&self) -> usize {
        self.lot_capacities.len()
    }

    /// Assign every driver to a lot under the given fee vector and collect
    /// metrics. Capacities start from zero; the city this world was built
    /// from is never touched.
    pub fn run(&self, fees: ArrayView1<f64>) -> SimulationMetrics {
        let n_lots = self.num_lots();
        let n_drivers = self.num_drivers();
        assert_eq!(fees.len(), n_lots, "fee vector length mismatch");

        let lot_fees: Array1<f32> = fees.iter().map(|&f| f as f32).collect();
        let mut capacity = vec![0u32; n_lots];
        let mut lot_revenue = vec![0.0f64; n_lots];
        let mut total_revenue = 0.0;
        let mut total_driver_cost = 0.0;
        let mut total_walking = 0.0;
        let mut parked = 0usize;
        let mut rejected = 0usize;

        let mut batch_start = 0;
        while batch_start < n_drivers {
            let batch_end = (batch_start + self.batch_size).min(n_drivers);

            let occupancy: Array1<f32> = (0..n_lots)
                .map(|j| capacity[j] as f32 / self.lot_capacities[j] as f32)
                .collect();
            let mut scores = score_matrix(
                self.driver_starts.slice(s![batch_start..batch_end, ..]),
                self.driver_dests.slice(s![batch_start..batch_end, ..]),
                self.driver_max_fees.slice(s![batch_start..batch_end]),
                self.lot_positions.view(),
                lot_fees.view(),
                occupancy.view(),
                &self.weights,
            );
            // Lots already full at batch start are out for the whole batch.
            for j in 0..n_lots {
                if capacity[j] >= self.lot_capacities[j] {
                    scores.column_mut(j).fill(f32::INFINITY);
                }
            }

            for (row_idx, i) in (batch_start..batch_end).enumerate() {
                let row = scores.row(row_idx);
                let mut best_j = 0usize;
                let mut best_score = f32::INFINITY;
                for j in 0..n_lots {
                    if row[j] < best_score {
                        best_score = row[j];
                        best_j = j;
                    }
                }
                // The chosen lot may have filled up earlier in this batch.
                if best_score.is_finite() && capacity[best_j] < self.lot_capacities[best_j] {
                    capacity[best_j] += 1;
                    let cost = fees[best_j] * f64::from(self.driver_durations[i]) / 60.0;
                    let wlat =
                        f64::from(self.lot_positions[[best_j, 0]] - self.driver_dests[[i, 0]]);
                    let wlon =
                        f64::from(self.lot_positions[[best_j, 1]] - self.driver_dests[[i, 1]]);
                    total_revenue += cost;
                    lot_revenue[best_j] += cost;
                    total_driver_cost += cost;
                    total_walking += (wlat * wlat + wlon * wlon).sqrt();
                    parked += 1;
                } else {
                    rejected += 1;
                    total_driver_cost += self.rejection_penalty;
                }
            }
            batch_start = batch_end;
        }

        self.build_metrics(
            &capacity,
            lot_revenue,
            total_revenue,
            total_driver_cost,
            total_walking,
            parked,
            rejected,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build_metrics(
        &self,
        capacity: &[u32],
        lot_revenue: Vec<f64>,
        total_revenue: f64,
        total_driver_cost: f64,
        total_walking: f64,
        parked: usize,
        rejected: usize,
    ) -> SimulationMetrics {
        let n_lots = self.num_lots();
        let n_drivers = self.num_drivers();
        let lot_occupancy: Vec<f64> = (0..n_lots)
            .map(|j| f64::from(capacity[j]) / f64::from(self.lot_capacities[j]))
            .collect();
        let (variance, std_dev) = sample_variance(&lot_occupancy);
        let overall = if self.total_capacity == 0 {
            0.0
        } else {
            f64::from(capacity.iter().sum::<u32>()) / f64::from(self.total_capacity)
        };
        SimulationMetrics {
            total_revenue,
            average_revenue_per_lot: if n_lots == 0 {
                0.0
            } else {
                total_revenue / n_lots as f64
            },
            total_parked: parked,
            total_rejected: rejected,
            overall_occupancy_rate: overall,
            occupancy_variance: variance,
            occupancy_std_dev: std_dev,
            average_driver_cost: if n_drivers == 0 {
                0.0
            } else {
                total_driver_cost / n_drivers as f64
            },
            average_walking_distance: if parked == 0 {
                0.0
            } else {
                total_walking / parked as f64
            },
            average_fee_paid: if parked == 0 {
                0.0
            } else {
                total_revenue / parked as f64
            },
            utilization_rate: overall,
            rejection_rate: if n_drivers == 0 {
                0.0
            } else {
                rejected as f64 / n_drivers as f64
            },
            lot_occupancy,
            lot_revenue,
        }
    }
}

fn sample_variance(values: &[f64]) -> (f64, f64) {
    if values.len() < 2 {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    (var, var.sqrt())
}
