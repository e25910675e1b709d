//! Stability metrics: inflation, inequality, per-variant averages
//!
//! ```text
//! inflation = (Σ final - Σ initial) / Σ initial
//! gini      = 2 Σ (i+1) r_i / (n Σ r) - (n+1) / n     (r ascending)
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use swarm_common::{AgentVariant, ConfigError};

use crate::agent::Agent;
use crate::result::RatingSnapshot;

/// Aggregate metrics of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub inflation_rate: f64,
    pub gini_coefficient: f64,
    pub variant_averages: BTreeMap<AgentVariant, f64>,
}

pub struct MetricsAnalyzer;

impl MetricsAnalyzer {
    /// Derive every run metric from the final agents and the snapshot history
    pub fn analyze(agents: &[Agent], history: &[RatingSnapshot]) -> Result<RunMetrics, ConfigError> {
        let initial = history.first().ok_or(ConfigError::MissingInitialSnapshot)?;
        let ratings: Vec<f64> = agents.iter().map(|a| a.rating).collect();

        Ok(RunMetrics {
            inflation_rate: Self::inflation_rate(initial, agents)?,
            gini_coefficient: Self::gini_coefficient(&ratings)?,
            variant_averages: Self::variant_averages(agents),
        })
    }

    /// Relative change of total rating mass since `initial`
    pub fn inflation_rate(initial: &RatingSnapshot, agents: &[Agent]) -> Result<f64, ConfigError> {
        let initial_total = initial.total();
        if !(initial_total > 0.0) {
            return Err(ConfigError::ZeroRatingMass {
                total: initial_total,
            });
        }
        let final_total: f64 = agents.iter().map(|a| a.rating).sum();
        Ok((final_total - initial_total) / initial_total)
    }

    /// Gini coefficient of `ratings`, 0 for perfect equality
    pub fn gini_coefficient(ratings: &[f64]) -> Result<f64, ConfigError> {
        if ratings.is_empty() {
            return Err(ConfigError::EmptyPopulation);
        }
        let total: f64 = ratings.iter().sum();
        if !(total > 0.0) {
            return Err(ConfigError::ZeroRatingMass { total });
        }

        let mut sorted = ratings.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let cumulative: f64 = sorted
            .iter()
            .enumerate()
            .map(|(i, r)| (i + 1) as f64 * r)
            .sum();
        Ok((2.0 * cumulative) / (n * total) - (n + 1.0) / n)
    }

    /// Mean rating per variant; variants without agents are absent
    pub fn variant_averages(agents: &[Agent]) -> BTreeMap<AgentVariant, f64> {
        let mut sums: BTreeMap<AgentVariant, (f64, usize)> = BTreeMap::new();
        for agent in agents {
            let entry = sums.entry(agent.variant).or_insert((0.0, 0));
            entry.0 += agent.rating;
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(variant, (sum, count))| (variant, sum / count as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::SnapshotPoint;

    fn agent(id: u32, variant: AgentVariant, rating: f64) -> Agent {
        Agent::new(id, variant, 0.5, 0.5, rating)
    }

    #[test]
    fn test_gini_equal_ratings() {
        let gini = MetricsAnalyzer::gini_coefficient(&[1200.0; 10]).unwrap();
        assert!(gini.abs() < 1e-12);
    }

    #[test]
    fn test_gini_single_agent() {
        let gini = MetricsAnalyzer::gini_coefficient(&[500.0]).unwrap();
        assert!(gini.abs() < 1e-12);
    }

    #[test]
    fn test_gini_concentration_approaches_bound() {
        let n = 10;
        let mut ratings = vec![101.0; n - 1];
        ratings.push(1.0e9);
        let gini = MetricsAnalyzer::gini_coefficient(&ratings).unwrap();
        let bound = (n as f64 - 1.0) / n as f64;
        assert!(gini < bound);
        assert!(bound - gini < 1e-5);
    }

    #[test]
    fn test_gini_known_value() {
        // [0, 0, 300]: 2 × 900 / (3 × 300) - 4/3 = 2/3
        let gini = MetricsAnalyzer::gini_coefficient(&[300.0, 0.0, 0.0]).unwrap();
        assert!((gini - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_gini_degenerate_inputs() {
        assert_eq!(
            MetricsAnalyzer::gini_coefficient(&[]),
            Err(ConfigError::EmptyPopulation)
        );
        assert_eq!(
            MetricsAnalyzer::gini_coefficient(&[0.0, 0.0]),
            Err(ConfigError::ZeroRatingMass { total: 0.0 })
        );
    }

    #[test]
    fn test_inflation_rate() {
        let mut agents = vec![
            agent(0, AgentVariant::Reliable, 1200.0),
            agent(1, AgentVariant::Reliable, 1200.0),
        ];
        let initial = RatingSnapshot::capture(SnapshotPoint::Initial, &agents);
        agents[0].rating = 1500.0;
        agents[1].rating = 1140.0;

        let inflation = MetricsAnalyzer::inflation_rate(&initial, &agents).unwrap();
        assert!((inflation - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_variant_averages() {
        let agents = vec![
            agent(0, AgentVariant::Reliable, 1300.0),
            agent(1, AgentVariant::Reliable, 1100.0),
            agent(2, AgentVariant::Malicious, 400.0),
        ];
        let averages = MetricsAnalyzer::variant_averages(&agents);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[&AgentVariant::Reliable], 1200.0);
        assert_eq!(averages[&AgentVariant::Malicious], 400.0);
        assert!(!averages.contains_key(&AgentVariant::Selective));
    }

    #[test]
    fn test_analyze_requires_history() {
        let agents = vec![agent(0, AgentVariant::Reliable, 1200.0)];
        assert_eq!(
            MetricsAnalyzer::analyze(&agents, &[]),
            Err(ConfigError::MissingInitialSnapshot)
        );
    }
}
