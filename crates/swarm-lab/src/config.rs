//! Swarm Lab configuration

use std::path::PathBuf;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use swarm_common::{PopulationConfig, SwarmConfig};

/// Experiment suite selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    Comparison,
    Equilibrium,
    LongTerm,
}

/// Swarm Lab configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Base run every suite derives its runs from
    pub base: SwarmConfig,
    /// Suites to run, in order
    pub suites: Vec<Suite>,
    pub comparison: ComparisonSettings,
    pub equilibrium: EquilibriumSettings,
    pub long_term: LongTermSettings,
    pub output: OutputSettings,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            base: SwarmConfig::default(),
            suites: vec![Suite::Comparison, Suite::Equilibrium, Suite::LongTerm],
            comparison: ComparisonSettings::default(),
            equilibrium: EquilibriumSettings::default(),
            long_term: LongTermSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

impl LabConfig {
    /// Load configuration from `swarm-lab.toml` (optional) and environment
    ///
    /// Environment keys use the `SWARM_LAB` prefix and `__` as the nesting
    /// separator, e.g. `SWARM_LAB__BASE__SEED=7` or
    /// `SWARM_LAB__SUITES=comparison,long_term`.
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let file = std::env::var("SWARM_LAB_CONFIG").unwrap_or_else(|_| "swarm-lab".to_string());
        let cfg: Self = config::Config::builder()
            .add_source(config::File::with_name(&file).required(false))
            .add_source(
                config::Environment::with_prefix("SWARM_LAB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("suites"),
            )
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate every run the selected suites will start
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.suites.is_empty(), "no experiment suite selected");
        self.base.validate()?;

        for suite in &self.suites {
            match suite {
                Suite::Comparison => self.comparison.apply(&self.base).validate()?,
                Suite::Equilibrium => {
                    ensure!(!self.equilibrium.mixes.is_empty(), "equilibrium suite has no mixes");
                    for mix in &self.equilibrium.mixes {
                        self.equilibrium.apply(&self.base, mix).validate()?;
                    }
                }
                Suite::LongTerm => self.long_term.apply(&self.base).validate()?,
            }
        }
        Ok(())
    }
}

/// Full vs halved gains, with and without staking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonSettings {
    pub rounds: u32,
    pub interactions_per_round: u32,
    /// Size of the bottom group malicious agents are counted in
    pub bottom_n: usize,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            rounds: 1000,
            interactions_per_round: 50,
            bottom_n: 20,
        }
    }
}

impl ComparisonSettings {
    pub fn apply(&self, base: &SwarmConfig) -> SwarmConfig {
        base.clone()
            .with_schedule(self.rounds, self.interactions_per_round)
    }
}

/// A labelled population mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMix {
    pub label: String,
    pub population: PopulationConfig,
}

impl NamedMix {
    fn new(label: &str, population: PopulationConfig) -> Self {
        Self {
            label: label.to_string(),
            population,
        }
    }
}

/// Population mixes run with halved gains and staking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquilibriumSettings {
    pub rounds: u32,
    pub interactions_per_round: u32,
    pub mixes: Vec<NamedMix>,
}

impl Default for EquilibriumSettings {
    fn default() -> Self {
        Self {
            rounds: 500,
            interactions_per_round: 30,
            mixes: vec![
                NamedMix::new("high_reliability", PopulationConfig::mix(70, 10, 5, 15)),
                NamedMix::new("baseline", PopulationConfig::mix(50, 20, 10, 20)),
                NamedMix::new("adversarial", PopulationConfig::mix(30, 30, 20, 20)),
                NamedMix::new("very_adversarial", PopulationConfig::mix(20, 30, 30, 20)),
            ],
        }
    }
}

impl EquilibriumSettings {
    pub fn apply(&self, base: &SwarmConfig, mix: &NamedMix) -> SwarmConfig {
        base.clone()
            .with_population(mix.population)
            .with_schedule(self.rounds, self.interactions_per_round)
            .with_mechanism(true, true)
    }
}

/// One long run under the production mechanism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongTermSettings {
    pub rounds: u32,
    pub interactions_per_round: u32,
    /// Size of the leading group whose variants are reported
    pub top_n: usize,
}

impl Default for LongTermSettings {
    fn default() -> Self {
        Self {
            rounds: 2000,
            interactions_per_round: 50,
            top_n: 10,
        }
    }
}

impl LongTermSettings {
    pub fn apply(&self, base: &SwarmConfig) -> SwarmConfig {
        base.clone()
            .with_schedule(self.rounds, self.interactions_per_round)
            .with_mechanism(true, true)
    }
}

/// Where and how the report is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Report file; stdout when unset
    pub path: Option<PathBuf>,
    /// Pretty-print the JSON report
    pub pretty: bool,
    /// Leaders/laggards listed per run
    pub standings: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: None,
            pretty: true,
            standings: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LabConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.equilibrium.mixes.len(), 4);
    }

    #[test]
    fn test_equilibrium_forces_production_mechanism() {
        let base = SwarmConfig::default().with_mechanism(false, false);
        let settings = EquilibriumSettings::default();
        let run = settings.apply(&base, &settings.mixes[2]);
        assert!(run.halve_gains);
        assert!(run.staking.enabled);
        assert_eq!(run.population, PopulationConfig::mix(30, 30, 20, 20));
        assert_eq!((run.rounds, run.interactions_per_round), (500, 30));
    }

    #[test]
    fn test_invalid_mix_rejected() {
        let mut config = LabConfig::default();
        config.suites = vec![Suite::Equilibrium];
        config
            .equilibrium
            .mixes
            .push(NamedMix::new("empty", PopulationConfig::mix(0, 0, 0, 0)));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_suite_names() {
        let suites: Vec<Suite> =
            serde_json::from_str(r#"["comparison", "long_term"]"#).unwrap();
        assert_eq!(suites, vec![Suite::Comparison, Suite::LongTerm]);
    }
}
