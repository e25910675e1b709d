//! Swarm configuration
//!
//! A single immutable [`SwarmConfig`] carries every tunable of a run: the
//! rating curve, experience tiers, staking, population mix and behaviour
//! profiles. All structs deserialize with defaults so a partial file or a
//! handful of environment overrides is enough to describe a run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::variant::AgentVariant;

/// Complete configuration of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Number of agents per variant
    pub population: PopulationConfig,
    /// Rating curve and experience tiers
    pub rating: RatingConfig,
    /// Stake/escrow layer
    pub staking: StakingConfig,
    /// Halve completion gains to damp inflation
    pub halve_gains: bool,
    /// Number of rounds to simulate
    pub rounds: u32,
    /// Pairings per round
    pub interactions_per_round: u32,
    /// Capture a snapshot after every round index divisible by this
    pub snapshot_interval: u32,
    /// Parameter ranges agents are drawn from
    pub profiles: BehaviorProfiles,
    /// Seed for the random source of a run
    pub seed: u64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            population: PopulationConfig::default(),
            rating: RatingConfig::default(),
            staking: StakingConfig::default(),
            halve_gains: true,
            rounds: 1000,
            interactions_per_round: 50,
            snapshot_interval: crate::SNAPSHOT_INTERVAL,
            profiles: BehaviorProfiles::default(),
            seed: 42,
        }
    }
}

impl SwarmConfig {
    /// Fail fast on any configuration a run cannot start from
    pub fn validate(&self) -> Result<(), ConfigError> {
        let agents = self.population.total();
        if agents == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if agents < 2 {
            return Err(ConfigError::PopulationTooSmall { agents });
        }
        if self.rounds == 0 {
            return Err(ConfigError::NonPositiveRounds);
        }
        if self.interactions_per_round == 0 {
            return Err(ConfigError::NonPositiveInteractions);
        }
        if self.snapshot_interval == 0 {
            return Err(ConfigError::NonPositiveSnapshotInterval);
        }

        self.staking.validate()?;
        self.rating.validate()?;
        self.profiles.validate()
    }

    /// Builder-style override of the gain/staking switches
    pub fn with_mechanism(mut self, halve_gains: bool, enable_staking: bool) -> Self {
        self.halve_gains = halve_gains;
        self.staking.enabled = enable_staking;
        self
    }

    /// Builder-style override of the run length
    pub fn with_schedule(mut self, rounds: u32, interactions_per_round: u32) -> Self {
        self.rounds = rounds;
        self.interactions_per_round = interactions_per_round;
        self
    }

    /// Builder-style override of the population mix
    pub fn with_population(mut self, population: PopulationConfig) -> Self {
        self.population = population;
        self
    }
}

/// Number of agents per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub reliable: usize,
    pub unreliable: usize,
    pub malicious: usize,
    pub selective: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self::mix(50, 20, 10, 20)
    }
}

impl PopulationConfig {
    /// Population from counts in reliable/unreliable/malicious/selective order
    pub const fn mix(reliable: usize, unreliable: usize, malicious: usize, selective: usize) -> Self {
        Self {
            reliable,
            unreliable,
            malicious,
            selective,
        }
    }

    pub fn count(&self, variant: AgentVariant) -> usize {
        match variant {
            AgentVariant::Reliable => self.reliable,
            AgentVariant::Unreliable => self.unreliable,
            AgentVariant::Malicious => self.malicious,
            AgentVariant::Selective => self.selective,
        }
    }

    pub fn total(&self) -> usize {
        self.reliable + self.unreliable + self.malicious + self.selective
    }
}

/// Rating curve parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Starting rating of every agent
    pub default_rating: f64,
    /// Rating floor
    pub minimum_rating: f64,
    /// Divisor of the logistic expected-outcome curve
    pub elo_divisor: f64,
    /// K-factor tiers by experience
    pub tiers: ExperienceTiers,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            default_rating: crate::DEFAULT_RATING,
            minimum_rating: crate::MINIMUM_RATING,
            elo_divisor: crate::ELO_DIVISOR,
            tiers: ExperienceTiers::default(),
        }
    }
}

impl RatingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.elo_divisor.is_finite() && self.elo_divisor > 0.0) {
            return Err(ConfigError::InvalidDivisor {
                divisor: self.elo_divisor,
            });
        }
        if self.default_rating < self.minimum_rating {
            return Err(ConfigError::DefaultBelowMinimum {
                default_rating: self.default_rating,
                minimum_rating: self.minimum_rating,
            });
        }
        self.tiers.validate()
    }
}

/// Experience tiers: K-factor by the acting agent's own transaction count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceTiers {
    /// Below this many transactions an agent is new
    pub new_threshold: u64,
    /// Below this many transactions an agent is intermediate
    pub intermediate_threshold: u64,
    pub k_new: u32,
    pub k_intermediate: u32,
    pub k_established: u32,
}

impl Default for ExperienceTiers {
    fn default() -> Self {
        Self {
            new_threshold: crate::TRANSACTIONS_NEW,
            intermediate_threshold: crate::TRANSACTIONS_INTERMEDIATE,
            k_new: crate::K_NEW,
            k_intermediate: crate::K_INTERMEDIATE,
            k_established: crate::K_ESTABLISHED,
        }
    }
}

impl ExperienceTiers {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.new_threshold >= self.intermediate_threshold {
            return Err(ConfigError::TierThresholdsOutOfOrder {
                new: self.new_threshold,
                intermediate: self.intermediate_threshold,
            });
        }
        for (tier, k) in [
            ("new", self.k_new),
            ("intermediate", self.k_intermediate),
            ("established", self.k_established),
        ] {
            if k == 0 {
                return Err(ConfigError::NonPositiveKFactor { tier });
            }
        }
        Ok(())
    }
}

/// Stake/escrow layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakingConfig {
    /// Whether agents stake rating headroom on each interaction
    pub enabled: bool,
    /// Upper bound of a single stake
    pub max_stake: f64,
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_stake: crate::DEFAULT_MAX_STAKE,
        }
    }
}

impl StakingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Checked even when staking is off: the switch may be flipped per experiment.
        if !(self.max_stake > 0.0) {
            return Err(ConfigError::NonPositiveMaxStake {
                max_stake: self.max_stake,
            });
        }
        Ok(())
    }
}

/// Closed interval a per-agent parameter is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate range: always yields `value`
    pub const fn fixed(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// Draw a value uniformly from the range
    ///
    /// A fixed range consumes no randomness, which keeps the draw sequence of
    /// a population independent of how many parameters are pinned.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.is_fixed() {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    fn validate(&self, variant: AgentVariant, parameter: &'static str) -> Result<(), ConfigError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !(in_unit(self.min) && in_unit(self.max) && self.min <= self.max) {
            return Err(ConfigError::InvalidRange {
                variant: variant.to_string(),
                parameter,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Creation-time parameter ranges of one variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariantProfile {
    /// Probability of completing an interaction
    pub reliability: ParamRange,
    /// Fraction of available headroom staked
    pub stake_willingness: ParamRange,
}

/// Creation-time parameter ranges for every variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorProfiles {
    pub reliable: VariantProfile,
    pub unreliable: VariantProfile,
    pub malicious: VariantProfile,
    pub selective: VariantProfile,
}

impl Default for BehaviorProfiles {
    fn default() -> Self {
        Self {
            reliable: VariantProfile {
                reliability: ParamRange::new(0.85, 0.99),
                stake_willingness: ParamRange::new(0.3, 0.7),
            },
            unreliable: VariantProfile {
                reliability: ParamRange::new(0.3, 0.6),
                stake_willingness: ParamRange::new(0.1, 0.3),
            },
            malicious: VariantProfile {
                reliability: ParamRange::fixed(0.3),
                stake_willingness: ParamRange::new(0.0, 0.2),
            },
            selective: VariantProfile {
                reliability: ParamRange::fixed(0.9),
                stake_willingness: ParamRange::new(0.4, 0.8),
            },
        }
    }
}

impl BehaviorProfiles {
    pub fn profile(&self, variant: AgentVariant) -> &VariantProfile {
        match variant {
            AgentVariant::Reliable => &self.reliable,
            AgentVariant::Unreliable => &self.unreliable,
            AgentVariant::Malicious => &self.malicious,
            AgentVariant::Selective => &self.selective,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for variant in AgentVariant::ALL {
            let profile = self.profile(variant);
            profile.reliability.validate(variant, "reliability")?;
            profile
                .stake_willingness
                .validate(variant, "stake_willingness")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_config_is_valid() {
        let config = SwarmConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population.total(), 100);
        assert_eq!(config.rating.tiers.k_new, 32);
    }

    #[test]
    fn test_empty_population_rejected() {
        let config = SwarmConfig::default().with_population(PopulationConfig::mix(0, 0, 0, 0));
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn test_single_agent_rejected() {
        let config = SwarmConfig::default().with_population(PopulationConfig::mix(0, 0, 1, 0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::PopulationTooSmall { agents: 1 })
        );
    }

    #[test]
    fn test_zero_rounds_and_interactions_rejected() {
        let config = SwarmConfig::default().with_schedule(0, 10);
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveRounds));

        let config = SwarmConfig::default().with_schedule(10, 0);
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveInteractions));
    }

    #[test]
    fn test_max_stake_must_be_positive() {
        let mut config = SwarmConfig::default();
        config.staking.max_stake = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveMaxStake { .. })
        ));

        config.staking.max_stake = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tier_order_enforced() {
        let mut config = SwarmConfig::default();
        config.rating.tiers.new_threshold = 100;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TierThresholdsOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let mut config = SwarmConfig::default();
        config.profiles.unreliable.reliability = ParamRange::new(0.7, 0.2);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unreliable"));
    }

    #[test]
    fn test_fixed_range_consumes_no_randomness() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);

        assert_eq!(ParamRange::fixed(0.3).sample(&mut a), 0.3);
        let x = ParamRange::new(0.0, 1.0).sample(&mut a);
        let y = ParamRange::new(0.0, 1.0).sample(&mut b);
        assert_eq!(x, y);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: SwarmConfig =
            serde_json::from_str(r#"{"rounds": 5, "staking": {"enabled": false}}"#).unwrap();
        assert_eq!(config.rounds, 5);
        assert!(!config.staking.enabled);
        assert_eq!(config.staking.max_stake, crate::DEFAULT_MAX_STAKE);
        assert_eq!(config.population, PopulationConfig::default());
    }
}
