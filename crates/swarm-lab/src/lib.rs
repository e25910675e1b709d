//! # Swarm Lab
//!
//! Experiment suites that validate the cooperative ELO mechanism.
//!
//! ## Suites
//!
//! - **comparison**: full vs halved gains, with and without staking
//! - **equilibrium**: several population mixes under the production mechanism
//! - **long_term**: one long run checking the ranking settles on reliable agents
//!
//! Every run reseeds the random source from the configured seed, so suites
//! are comparable run-for-run and replay exactly.

pub mod config;
pub mod report;
pub mod suites;

pub use config::{LabConfig, Suite};
pub use report::{ComparisonReport, EquilibriumReport, LabReport, LongTermReport, RunSummary};
pub use suites::{run_suites, run_with_seed};

/// Swarm Lab version
pub const LAB_VERSION: &str = env!("CARGO_PKG_VERSION");
