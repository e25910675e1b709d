//! # Swarm Common
//!
//! Shared configuration, errors, and core types for the cooperative ELO swarm.
//!
//! ## Core Types
//!
//! - [`AgentVariant`]: behavioural family of a simulated agent
//! - [`SwarmConfig`]: the single immutable configuration passed to every component
//! - [`SwarmError`]/[`ConfigError`]: workspace error taxonomy
//!
//! Every rating constant below is only a default. Components read the values
//! from [`SwarmConfig`], never from these constants directly, so several
//! configurations can run side by side.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use config::{
    BehaviorProfiles, ExperienceTiers, ParamRange, PopulationConfig, RatingConfig, StakingConfig,
    SwarmConfig, VariantProfile,
};
pub use error::{ConfigError, Result, SwarmError};
pub use types::variant::{AgentId, AgentVariant};

/// Swarm version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Starting rating for every new agent
pub const DEFAULT_RATING: f64 = 1200.0;

/// Rating floor, no agent can drop below it
pub const MINIMUM_RATING: f64 = 100.0;

/// Divisor of the logistic expected-outcome curve
pub const ELO_DIVISOR: f64 = 400.0;

/// K-factor for agents with fewer than [`TRANSACTIONS_NEW`] transactions
pub const K_NEW: u32 = 32;

/// K-factor for agents with fewer than [`TRANSACTIONS_INTERMEDIATE`] transactions
pub const K_INTERMEDIATE: u32 = 24;

/// K-factor for established agents
pub const K_ESTABLISHED: u32 = 16;

/// Transaction count below which an agent is considered new
pub const TRANSACTIONS_NEW: u64 = 30;

/// Transaction count below which an agent is considered intermediate
pub const TRANSACTIONS_INTERMEDIATE: u64 = 100;

/// Upper bound of a single stake
pub const DEFAULT_MAX_STAKE: f64 = 100.0;

/// Rounds between two rating snapshots
pub const SNAPSHOT_INTERVAL: u32 = 10;
