//! Analytic elasticity evaluation engine.
//!
//! Demand responds proportionally to the fractional price change, scaled by
//! the zone's elasticity, with two behavioral refinements: hikes weigh more
//! than cuts (loss aversion) and commuters react at half the elasticity of
//! short-stay users. The whole engine is a pure function of the fee vector
//! and the zone state captured at construction.

use ndarray::{Array1, Zip};

use parkopt_model::City;

use crate::evaluator::{ScenarioEvaluator, ZonePredictions};

/// Guard against zones currently priced at zero.
const EPSILON: f64 = 1e-6;
/// Loss-aversion factors: reaction to a hike vs. a cut.
const HIKE_FACTOR: f64 = 1.2;
const CUT_FACTOR: f64 = 0.8;
/// Occupancy is clamped here; the floor models irreducible demand.
const OCCUPANCY_FLOOR: f64 = 0.05;
const OCCUPANCY_CEIL: f64 = 1.0;

/// Zone state arrays captured once per optimization run.
#[derive(Debug, Clone)]
pub struct ElasticityEvaluator {
    current_fees: Array1<f64>,
    current_occupancy: Array1<f64>,
    elasticities: Array1<f64>,
    short_term_share: Array1<f64>,
    capacities: Array1<f64>,
    target_occupancy: f64,
}

struct Physics {
    objectives: [f64; 4],
    occupancy: Array1<f64>,
    revenue: Array1<f64>,
}

impl ElasticityEvaluator {
    pub fn new(city: &City, target_occupancy: f64) -> Self {
        Self {
            current_fees: city.zones.iter().map(|z| z.current_fee).collect(),
            current_occupancy: city.zones.iter().map(|z| z.occupancy_rate()).collect(),
            elasticities: city.zones.iter().map(|z| z.elasticity).collect(),
            short_term_share: city.zones.iter().map(|z| z.short_term_share).collect(),
            capacities: city.zones.iter().map(|z| f64::from(z.maximum_capacity)).collect(),
            target_occupancy,
        }
    }

    fn physics(&self, fees: &Array1<f64>) -> Physics {
        let n = fees.len();

        // Fractional price change and its loss-aversion weighting.
        let delta = Zip::from(fees)
            .and(&self.current_fees)
            .map_collect(|&p, &cur| (p - cur) / (cur + EPSILON));
        let weighted = delta.mapv(|d| d * if d > 0.0 { HIKE_FACTOR } else { CUT_FACTOR });

        // Short-stay users react fully, commuters at half elasticity; blend
        // by the zone's short-term share.
        let demand_change = Zip::from(&weighted)
            .and(&self.elasticities)
            .and(&self.short_term_share)
            .map_collect(|&w, &e, &s| {
                let short_term = e * w;
                let long_term = (e / 2.0) * w;
                s * short_term + (1.0 - s) * long_term
            });

        let occupancy = Zip::from(&self.current_occupancy)
            .and(&demand_change)
            .map_collect(|&o, &dd| (o * (1.0 + dd)).clamp(OCCUPANCY_FLOOR, OCCUPANCY_CEIL));
        let revenue = Zip::from(fees)
            .and(&self.capacities)
            .and(&occupancy)
            .map_collect(|&p, &cap, &o| p * cap * o);

        let score_revenue = revenue.sum();
        let occupancy_gap = occupancy
            .iter()
            .map(|o| (o - self.target_occupancy).abs())
            .sum::<f64>()
            / n as f64;
        let demand_drop = demand_change.iter().map(|dd| (-dd).max(0.0)).sum::<f64>() / n as f64;
        let impact = Zip::from(&delta)
            .and(&self.short_term_share)
            .fold(0.0, |acc, &d, &s| acc + d.max(0.0) * s)
            / n as f64;

        Physics {
            objectives: [score_revenue, occupancy_gap, demand_drop, impact],
            occupancy,
            revenue,
        }
    }
}

impl ScenarioEvaluator for ElasticityEvaluator {
    fn evaluate_objectives(&self, fees: &Array1<f64>) -> [f64; 4] {
        self.physics(fees).objectives
    }

    fn detailed_results(&self, fees: &Array1<f64>) -> ZonePredictions {
        let physics = self.physics(fees);
        ZonePredictions {
            occupancy: physics.occupancy,
            revenue: physics.revenue,
        }
    }
}
