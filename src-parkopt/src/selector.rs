//! Weighted Pareto-front selection.
//!
//! Reduces a scenario list to the single best compromise for a caller's
//! preferences: min-max normalize each axis across the front so every score
//! lands in `[0, 1]` with higher-is-better orientation, then rank by the
//! weighted sum. Degenerate axes (all scenarios equal) normalize to 1 so they
//! neither punish nor produce NaN.

use parkopt_model::{PricingScenario, SelectionWeights};

struct AxisRange {
    min: f64,
    max: f64,
}

impl AxisRange {
    fn over<F: Fn(&PricingScenario) -> f64>(scenarios: &[PricingScenario], f: F) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for s in scenarios {
            let v = f(s);
            min = min.min(v);
            max = max.max(v);
        }
        Self { min, max }
    }

    /// Normalize so higher is better; 1.0 on a degenerate range.
    fn ascending(&self, v: f64) -> f64 {
        if self.max > self.min {
            (v - self.min) / (self.max - self.min)
        } else {
            1.0
        }
    }

    /// Normalize an axis where lower raw values are better.
    fn descending(&self, v: f64) -> f64 {
        if self.max > self.min {
            1.0 - (v - self.min) / (self.max - self.min)
        } else {
            1.0
        }
    }
}

/// Pick the scenario with the greatest weighted score. Ties keep the earlier
/// scenario; an empty front yields `None`.
pub fn select_best<'a>(
    scenarios: &'a [PricingScenario],
    weights: &SelectionWeights,
) -> Option<&'a PricingScenario> {
    if scenarios.is_empty() {
        return None;
    }
    let revenue = AxisRange::over(scenarios, |s| s.score_revenue);
    let gap = AxisRange::over(scenarios, |s| s.score_occupancy_gap);
    let drop = AxisRange::over(scenarios, |s| s.score_demand_drop);
    let balance = AxisRange::over(scenarios, |s| s.score_user_balance);

    let mut best: Option<&PricingScenario> = None;
    let mut best_score = f64::NEG_INFINITY;
    for s in scenarios {
        let score = weights.revenue * revenue.ascending(s.score_revenue)
            + weights.occupancy * gap.descending(s.score_occupancy_gap)
            + weights.drop * drop.descending(s.score_demand_drop)
            + weights.fairness * balance.ascending(s.score_user_balance);
        if score > best_score {
            best_score = score;
            best = Some(s);
        }
    }
    best
}
