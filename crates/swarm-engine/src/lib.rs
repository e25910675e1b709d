//! # Swarm Engine
//!
//! Rating-and-staking economic engine for cooperative agent reputation.
//!
//! ## Expected Outcome
//!
//! ```text
//! E(a, b) = 1 / (1 + 10^((R_b - R_a) / 400))
//! ```
//!
//! ## Settlement
//!
//! ```text
//! both complete   : a += round(k_a × (1 - E(a,b)) [/ 2])
//! neither         : a -= round(k_a × E(a,b)) + stake_a
//! one at fault    : L = round(k_l × E(l,w))
//!                   w += round(L / 2) + stake_l
//!                   l -= L + stake_l
//! ```
//!
//! Where:
//! - k: K-factor from the acting agent's own experience tier (32 / 24 / 16)
//! - round: round-half-to-even, floored at 1 for gains and losses
//! - every rating is clamped at the configured minimum
//!
//! ## Determinism
//!
//! No component owns a random source. The caller injects one into
//! [`PopulationSimulator::new`] and [`PopulationSimulator::run`]; the same
//! seed and configuration replay bit-for-bit.

pub mod agent;
pub mod analysis;
pub mod interaction;
pub mod metrics;
pub mod policy;
pub mod rating;
pub mod result;
pub mod simulation;

pub use agent::Agent;
pub use analysis::{RatingDistribution, TrajectoryPoint};
pub use interaction::{InteractionEngine, InteractionOutcome, Settlement};
pub use metrics::{MetricsAnalyzer, RunMetrics};
pub use policy::BehaviorPolicy;
pub use rating::RatingModel;
pub use result::{RatingSnapshot, SimulationResult, SnapshotPoint};
pub use simulation::PopulationSimulator;
