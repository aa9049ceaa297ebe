use ndarray::Array1;

/// Per-zone predictions for one fee vector, in input zone order.
#[derive(Debug, Clone)]
pub struct ZonePredictions {
    pub occupancy: Array1<f64>,
    pub revenue: Array1<f64>,
}

/// Contract between the NSGA-III driver and an evaluation engine.
///
/// `evaluate_objectives` returns the four raw axes
/// `(revenue, occupancy_gap, demand_drop, balance_axis)`: revenue is a
/// maximized quantity (the search negates it), the other three are minimized
/// as returned, and the balance axis is emitted as `1 − value` in scenarios.
/// Implementations must be pure per call (shared state is read-only) so
/// the driver may evaluate individuals in parallel.
pub trait ScenarioEvaluator: Sync {
    fn evaluate_objectives(&self, fees: &Array1<f64>) -> [f64; 4];

    /// Per-zone detail used when emitting scenarios for the final front.
    fn detailed_results(&self, fees: &Array1<f64>) -> ZonePredictions;
}
