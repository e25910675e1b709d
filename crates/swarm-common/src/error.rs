//! Error types for the ELO swarm
//!
//! Provides a unified error type and the configuration error taxonomy.
//! A single interaction has no error path once the configuration is valid,
//! so every variant here is raised either before the first round or while
//! deriving metrics from a finished run.

use thiserror::Error;

/// Result type alias using SwarmError
pub type Result<T> = std::result::Result<T, SwarmError>;

/// Unified error type for swarm operations
#[derive(Debug, Error)]
pub enum SwarmError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Weighted pairing could not be set up
    #[error("Sampling error: {0}")]
    Sampling(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration and numerical-domain errors
///
/// Degenerate metric inputs (an empty population, zero rating mass) are
/// reported here too: they can only arise from a population that should
/// never have been configured.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Population is empty: at least one agent is required")]
    EmptyPopulation,

    #[error("Population of {agents} cannot form a pairing: at least 2 agents are required")]
    PopulationTooSmall { agents: usize },

    #[error("Round count must be positive")]
    NonPositiveRounds,

    #[error("Interactions per round must be positive")]
    NonPositiveInteractions,

    #[error("Snapshot interval must be positive")]
    NonPositiveSnapshotInterval,

    #[error("Max stake must be positive, got {max_stake}")]
    NonPositiveMaxStake { max_stake: f64 },

    #[error("ELO divisor must be positive and finite, got {divisor}")]
    InvalidDivisor { divisor: f64 },

    #[error("Default rating {default_rating} is below the minimum rating {minimum_rating}")]
    DefaultBelowMinimum {
        default_rating: f64,
        minimum_rating: f64,
    },

    #[error("Experience tiers out of order: new threshold {new} >= intermediate threshold {intermediate}")]
    TierThresholdsOutOfOrder { new: u64, intermediate: u64 },

    #[error("K-factor must be positive for the {tier} tier")]
    NonPositiveKFactor { tier: &'static str },

    #[error("Invalid {parameter} range for {variant}: [{min}, {max}]")]
    InvalidRange {
        variant: String,
        parameter: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Rating mass is not positive ({total}): inequality is undefined")]
    ZeroRatingMass { total: f64 },

    #[error("Rating history has no initial snapshot")]
    MissingInitialSnapshot,
}

impl From<serde_json::Error> for SwarmError {
    fn from(err: serde_json::Error) -> Self {
        SwarmError::Serialization(err.to_string())
    }
}
