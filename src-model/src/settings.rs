//! Optimizer settings, tagged by evaluator kind.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Settings shared by both evaluator kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonSettings {
    /// Seed for population sampling, variation and driver generation.
    pub random_seed: u64,
    /// Genetic population size, at least 10.
    pub population_size: usize,
    /// Generation budget, at least 1.
    pub generations: usize,
    /// Desired per-zone occupancy, in `[0, 1]`.
    pub target_occupancy: f64,
    /// Global fallback fee floor (per-zone bounds take precedence).
    pub min_fee: f64,
    /// Global fallback fee ceiling.
    pub max_fee: f64,
    /// Advisory display granularity; never applied to the search space.
    pub fee_increment: f64,
}

impl Default for CommonSettings {
    fn default() -> Self {
        Self {
            random_seed: 42,
            population_size: 40,
            generations: 25,
            target_occupancy: 0.85,
            min_fee: 0.5,
            max_fee: 10.0,
            fee_increment: 0.1,
        }
    }
}

impl CommonSettings {
    fn validate(&self) -> Result<(), ModelError> {
        if self.population_size < 10 {
            return Err(ModelError::InvalidSettings(format!(
                "population_size {} below minimum of 10",
                self.population_size
            )));
        }
        if self.generations == 0 {
            return Err(ModelError::InvalidSettings("generations must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.target_occupancy) {
            return Err(ModelError::InvalidSettings(format!(
                "target_occupancy {} outside [0, 1]",
                self.target_occupancy
            )));
        }
        if !(self.min_fee.is_finite() && self.min_fee >= 0.0) {
            return Err(ModelError::InvalidSettings("min_fee must be finite and non-negative".into()));
        }
        if !(self.max_fee.is_finite() && self.max_fee >= self.min_fee) {
            return Err(ModelError::InvalidSettings(format!(
                "min_fee {} exceeds max_fee {}",
                self.min_fee, self.max_fee
            )));
        }
        if !(self.fee_increment.is_finite() && self.fee_increment > 0.0) {
            return Err(ModelError::InvalidSettings("fee_increment must be positive".into()));
        }
        Ok(())
    }
}

/// Behavioral weights of the simulated drivers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverWeights {
    /// Sensitivity to the hourly fee.
    pub fee: f64,
    /// Sensitivity to the driving distance to the lot.
    pub distance_to_lot: f64,
    /// Sensitivity to the walk from the lot to the destination.
    pub walking: f64,
    /// Penalty weight for nearly-full lots.
    pub availability: f64,
}

impl Default for DriverWeights {
    fn default() -> Self {
        Self {
            fee: 1.0,
            distance_to_lot: 0.5,
            walking: 1.5,
            availability: 0.3,
        }
    }
}

impl DriverWeights {
    fn validate(&self) -> Result<(), ModelError> {
        for (name, w) in [
            ("fee", self.fee),
            ("distance_to_lot", self.distance_to_lot),
            ("walking", self.walking),
            ("availability", self.availability),
        ] {
            if !(w.is_finite() && w >= 0.0) {
                return Err(ModelError::InvalidSettings(format!(
                    "driver weight '{name}' must be finite and non-negative, got {w}"
                )));
            }
        }
        Ok(())
    }
}

/// Settings for the analytic elasticity evaluator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElasticitySettings {
    #[serde(flatten)]
    pub common: CommonSettings,
}

/// Settings for the agent-based simulation evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(flatten)]
    pub common: CommonSettings,
    /// Driver count as a multiple of total city capacity.
    pub drivers_per_zone_capacity: f64,
    /// Simulation repetitions per evaluation, averaged.
    pub simulation_runs: u32,
    #[serde(default)]
    pub driver_weights: DriverWeights,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            common: CommonSettings::default(),
            drivers_per_zone_capacity: 1.5,
            simulation_runs: 1,
            driver_weights: DriverWeights::default(),
        }
    }
}

/// Optimizer settings, tagged on the wire by `optimizer_type`.
///
/// The tag selects the evaluation engine: `"elasticity"` for the analytic
/// model, `"agent"` for the driver simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "optimizer_type", rename_all = "lowercase")]
pub enum OptimizerSettings {
    Elasticity(ElasticitySettings),
    Agent(AgentSettings),
}

impl OptimizerSettings {
    pub fn common(&self) -> &CommonSettings {
        match self {
            OptimizerSettings::Elasticity(s) => &s.common,
            OptimizerSettings::Agent(s) => &s.common,
        }
    }

    pub fn random_seed(&self) -> u64 {
        self.common().random_seed
    }

    /// Check the settings invariants.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.common().validate()?;
        if let OptimizerSettings::Agent(s) = self {
            if !(s.drivers_per_zone_capacity.is_finite() && s.drivers_per_zone_capacity > 0.0) {
                return Err(ModelError::InvalidSettings(
                    "drivers_per_zone_capacity must be positive".into(),
                ));
            }
            if s.simulation_runs == 0 {
                return Err(ModelError::InvalidSettings(
                    "simulation_runs must be at least 1".into(),
                ));
            }
            s.driver_weights.validate()?;
        }
        Ok(())
    }
}
