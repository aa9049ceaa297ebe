//! Optimizer output: pricing scenarios and selection weights.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Recommended fee and predicted outcome for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedZoneResult {
    pub zone_id: u64,
    /// Recommended hourly fee, inside the zone's `[min_fee, max_fee]`.
    pub new_fee: f64,
    /// Predicted occupancy under the new fee, in `[0, 1]`.
    pub predicted_occupancy: f64,
    /// Predicted revenue under the new fee, non-negative.
    pub predicted_revenue: f64,
}

/// One point of the Pareto front: a full fee assignment with its four
/// objective scores.
///
/// Emitted conventions: `score_revenue` is money (higher is better),
/// `score_occupancy_gap` and `score_demand_drop` are in `[0, 1]` (lower is
/// better), `score_user_balance` is in `[0, 1]` (higher is better). The
/// balance axis is evaluator-specific: the elasticity engine derives it from
/// fee-hike impact on short-stay users, the agent engine from driver cost and
/// occupancy spread. Scenario lists from different evaluators are therefore
/// not comparable on that axis and must not be mixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingScenario {
    pub scenario_id: u64,
    /// Per-zone results, in the input zone order.
    pub zones: Vec<OptimizedZoneResult>,
    pub score_revenue: f64,
    pub score_occupancy_gap: f64,
    pub score_demand_drop: f64,
    pub score_user_balance: f64,
}

/// User preference weights for reducing a Pareto front to one scenario.
///
/// Missing keys count as zero. Values are non-negative and need not sum to
/// anything in particular; only their relative magnitudes matter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionWeights {
    pub revenue: f64,
    pub occupancy: f64,
    pub drop: f64,
    pub fairness: f64,
}

impl SelectionWeights {
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, w) in [
            ("revenue", self.revenue),
            ("occupancy", self.occupancy),
            ("drop", self.drop),
            ("fairness", self.fairness),
        ] {
            if !(w.is_finite() && w >= 0.0) {
                return Err(ModelError::InvalidSettings(format!(
                    "selection weight '{name}' must be finite and non-negative, got {w}"
                )));
            }
        }
        Ok(())
    }
}

/// Parse `key=value` pairs separated by commas, e.g.
/// `revenue=0.5,occupancy=0.3,fairness=0.2`.
impl FromStr for SelectionWeights {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut weights = SelectionWeights::default();
        for pair in s.split(',').filter(|p| !p.trim().is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ModelError::UnknownWeightKey(pair.trim().to_string()))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| ModelError::InvalidSettings(format!("weight '{pair}' is not a number")))?;
            match key.trim() {
                "revenue" => weights.revenue = value,
                "occupancy" => weights.occupancy = value,
                "drop" => weights.drop = value,
                "fairness" => weights.fairness = value,
                other => return Err(ModelError::UnknownWeightKey(other.to_string())),
            }
        }
        weights.validate()?;
        Ok(weights)
    }
}
