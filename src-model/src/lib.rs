//! Data model and contracts for the parkopt fee optimizer
//!
//! This crate holds the shared vocabulary of the workspace: the city with its
//! parking zones and points of interest, the synthetic driver used by the
//! agent-based evaluator, the optimizer settings (tagged by evaluator kind),
//! and the pricing scenarios the optimizer emits. All wire-facing types
//! derive serde and carry their own invariant checks; the optimizer refuses
//! to start on inputs that fail them.

pub mod city;
pub mod driver;
pub mod error;
pub mod scenario;
pub mod settings;

pub use city::{Bounds, City, ParkingZone, PointOfInterest, Position};
pub use driver::Driver;
pub use error::ModelError;
pub use scenario::{OptimizedZoneResult, PricingScenario, SelectionWeights};
pub use settings::{
    AgentSettings, CommonSettings, DriverWeights, ElasticitySettings, OptimizerSettings,
};
