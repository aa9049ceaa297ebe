//! Pareto-optimal parking fee recommendations for municipalities
//!
//! The entry point is [`optimize`]: given a validated [`model::City`] and
//! [`model::OptimizerSettings`], it searches the per-zone fee box with the
//! NSGA-III driver from `parkopt-nsga3` and returns the first non-dominated
//! front as a list of [`model::PricingScenario`]s. Two evaluation engines
//! implement the [`ScenarioEvaluator`] contract: the analytic
//! [`ElasticityEvaluator`] and the simulation-backed [`AgentEvaluator`] built
//! on `parkopt-sim`. [`select_best`] reduces a front to a single scenario by
//! weighted scalarization.

// Re-export the member crates under short names
pub use parkopt_model as model;
pub use parkopt_nsga3 as nsga3;
pub use parkopt_sim as sim;

/// Agent-based simulation evaluator
pub mod agent;
/// Analytic elasticity evaluator
pub mod elasticity;
/// Error type of the optimizer facade
pub mod error;
/// The evaluator contract shared by both engines
pub mod evaluator;
/// The NSGA-III search wiring and scenario emission
pub mod optimize;
/// Weighted Pareto-front selection
pub mod selector;

pub use agent::AgentEvaluator;
pub use elasticity::ElasticityEvaluator;
pub use error::OptimizeError;
pub use evaluator::{ScenarioEvaluator, ZonePredictions};
pub use optimize::{optimize, optimize_with};
pub use selector::select_best;
