//! Vectorized agent-based parking simulation
//!
//! Three pieces, bottom up:
//!
//! - [`scoring`]: the batched driver×lot utility kernel with an
//!   unaffordability sentinel and an optional data-parallel path,
//! - [`drivers`]: the deterministic synthetic driver population builder,
//! - [`engine`]: the assignment engine that walks drivers through lots in
//!   bounded batches, respects capacity with feedback between batches, and
//!   aggregates the metrics the optimizer's objectives are reduced from.
//!
//! The engine never mutates the city it was built from; every evaluation
//! carries its own capacity and revenue state.

pub mod drivers;
pub mod engine;
pub mod scoring;

pub use drivers::DriverGenerator;
pub use engine::{SimulationMetrics, SimulationWorld, DEFAULT_BATCH_SIZE, DEFAULT_REJECTION_PENALTY};
pub use scoring::{score_matrix, NORM_DIST, NORM_FEE};
