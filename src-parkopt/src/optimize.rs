//! NSGA-III search wiring and scenario emission.

use ndarray::{array, Array1};

use parkopt_model::{City, OptimizedZoneResult, OptimizerSettings, PricingScenario};
use parkopt_nsga3::{Nsga3, Nsga3ConfigBuilder};

use crate::agent::AgentEvaluator;
use crate::elasticity::ElasticityEvaluator;
use crate::error::OptimizeError;
use crate::evaluator::ScenarioEvaluator;

/// Revenue, occupancy gap, demand drop, user balance.
const NUM_OBJECTIVES: usize = 4;
/// Das–Dennis partitions on the 4-D simplex; yields 165 directions.
const NUM_PARTITIONS: usize = 8;

/// Run the full search and return the first non-dominated front as pricing
/// scenarios, in emitted-sign conventions (see [`PricingScenario`]).
pub fn optimize(
    city: &City,
    settings: &OptimizerSettings,
) -> Result<Vec<PricingScenario>, OptimizeError> {
    optimize_with(city, settings, false)
}

/// Like [`optimize`], with per-generation progress on stderr when `verbose`.
pub fn optimize_with(
    city: &City,
    settings: &OptimizerSettings,
    verbose: bool,
) -> Result<Vec<PricingScenario>, OptimizeError> {
    city.validate()?;
    settings.validate()?;

    let evaluator: Box<dyn ScenarioEvaluator> = match settings {
        OptimizerSettings::Elasticity(s) => {
            Box::new(ElasticityEvaluator::new(city, s.common.target_occupancy))
        }
        OptimizerSettings::Agent(s) => Box::new(AgentEvaluator::new(city, s)),
    };
    run_search(city, settings, evaluator.as_ref(), verbose)
}

fn run_search(
    city: &City,
    settings: &OptimizerSettings,
    evaluator: &dyn ScenarioEvaluator,
    verbose: bool,
) -> Result<Vec<PricingScenario>, OptimizeError> {
    let common = settings.common();
    let lower: Array1<f64> = city.zones.iter().map(|z| z.min_fee).collect();
    let upper: Array1<f64> = city.zones.iter().map(|z| z.max_fee).collect();

    // Internally every axis is minimized: negate revenue, keep the rest.
    // The fourth axis comes back raw and is emitted as 1 - value below.
    let fitness = |fees: &Array1<f64>| {
        let [revenue, gap, drop, balance] = evaluator.evaluate_objectives(fees);
        array![-revenue, gap, drop, balance]
    };

    let mut solver = Nsga3::new(&fitness, lower, upper);
    *solver.config_mut() = Nsga3ConfigBuilder::new()
        .population_size(common.population_size)
        .generations(common.generations)
        .num_objectives(NUM_OBJECTIVES)
        .num_partitions(NUM_PARTITIONS)
        .seed(common.random_seed)
        .verbose(verbose)
        .build();
    let report = solver.solve()?;

    let mut scenarios = Vec::with_capacity(report.front_x.len());
    for (idx, (x, f)) in report.front_x.iter().zip(report.front_f.iter()).enumerate() {
        // Re-run the detailed path so per-zone predictions match the model
        // that scored this genome.
        let detail = evaluator.detailed_results(x);
        let zones: Vec<OptimizedZoneResult> = city
            .zones
            .iter()
            .enumerate()
            .map(|(j, zone)| OptimizedZoneResult {
                zone_id: zone.id,
                new_fee: round_cents(x[j]).clamp(zone.min_fee, zone.max_fee),
                predicted_occupancy: detail.occupancy[j].clamp(0.0, 1.0),
                predicted_revenue: round_cents(detail.revenue[j]).max(0.0),
            })
            .collect();
        scenarios.push(PricingScenario {
            scenario_id: (idx + 1) as u64,
            zones,
            score_revenue: -f[0],
            score_occupancy_gap: f[1],
            score_demand_drop: f[2],
            score_user_balance: 1.0 - f[3],
        });
    }
    Ok(scenarios)
}

/// Display rounding for money; re-clamped by the caller where bounds apply.
fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
