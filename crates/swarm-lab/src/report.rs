//! Structured experiment reports
//!
//! Reports are plain serde values; rendering them is left to whoever
//! consumes the JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use swarm_common::{AgentId, AgentVariant, PopulationConfig, SwarmConfig};
use swarm_engine::analysis::break_even_completion_rate;
use swarm_engine::{Agent, RatingDistribution, SimulationResult, TrajectoryPoint};

/// Final standing of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStanding {
    pub id: AgentId,
    pub variant: AgentVariant,
    pub rating: f64,
    pub completions: u64,
    pub disputes_won: u64,
    pub disputes_lost: u64,
}

impl From<&Agent> for AgentStanding {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            variant: agent.variant,
            rating: agent.rating,
            completions: agent.completions,
            disputes_won: agent.disputes_won,
            disputes_lost: agent.disputes_lost,
        }
    }
}

/// Everything reported about a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub label: String,
    pub halve_gains: bool,
    pub staking: bool,
    pub rounds: u32,
    pub interactions_per_round: u32,
    pub total_completions: u64,
    pub total_disputes: u64,
    pub completion_rate: Option<f64>,
    /// Completion rate at which the mechanism neither inflates nor deflates
    pub break_even_completion_rate: f64,
    pub inflation_rate: f64,
    pub gini_coefficient: f64,
    pub variant_averages: BTreeMap<AgentVariant, f64>,
    pub distribution: Option<RatingDistribution>,
    pub leaders: Vec<AgentStanding>,
    pub laggards: Vec<AgentStanding>,
    pub trajectory: Vec<TrajectoryPoint>,
    /// Mean stake-willingness of reliable agents
    pub reliable_stake_willingness: Option<f64>,
}

impl RunSummary {
    pub fn from_result(
        label: &str,
        config: &SwarmConfig,
        result: &SimulationResult,
        standings: usize,
    ) -> Self {
        let reliable: Vec<f64> = result
            .agents
            .iter()
            .filter(|a| a.variant == AgentVariant::Reliable)
            .map(|a| a.stake_willingness)
            .collect();
        let reliable_stake_willingness =
            (!reliable.is_empty()).then(|| reliable.iter().sum::<f64>() / reliable.len() as f64);

        Self {
            label: label.to_string(),
            halve_gains: config.halve_gains,
            staking: config.staking.enabled,
            rounds: result.rounds,
            interactions_per_round: config.interactions_per_round,
            total_completions: result.total_completions,
            total_disputes: result.total_disputes,
            completion_rate: result.completion_rate(),
            break_even_completion_rate: break_even_completion_rate(&config.rating, config.halve_gains),
            inflation_rate: result.inflation_rate,
            gini_coefficient: result.gini_coefficient,
            variant_averages: result.variant_averages.clone(),
            distribution: result.rating_distribution(),
            leaders: result.leaders(standings).into_iter().map(Into::into).collect(),
            laggards: result.laggards(standings).into_iter().map(Into::into).collect(),
            trajectory: result.variant_trajectory(),
            reliable_stake_willingness,
        }
    }

    pub fn variant_average(&self, variant: AgentVariant) -> Option<f64> {
        self.variant_averages.get(&variant).copied()
    }
}

/// Verdicts of the comparison suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonFindings {
    /// Halved gains with staking inflate less than half as much as full gains without
    pub inflation_controlled: bool,
    /// Reliable agents end above malicious agents under the production mechanism
    pub reliable_above_malicious: bool,
    /// Staking raises inequality compared to halved gains alone
    pub staking_differentiates: bool,
    /// Malicious agents among the bottom `bottom_n`
    pub malicious_in_bottom: usize,
    pub malicious_total: usize,
    pub bottom_n: usize,
    /// Relative Gini increase from staking, in percent
    pub staking_gini_increase_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub runs: Vec<RunSummary>,
    pub findings: ComparisonFindings,
}

/// One population mix of the equilibrium suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumRow {
    pub label: String,
    pub population: PopulationConfig,
    pub completion_rate: Option<f64>,
    pub inflation_rate: f64,
    pub reliable_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumReport {
    pub rows: Vec<EquilibriumRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTermReport {
    pub summary: RunSummary,
    /// Variants of the top agents, best first
    pub top_variants: Vec<AgentVariant>,
    pub all_top_reliable: bool,
}

/// Output of a lab invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReport {
    pub version: String,
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equilibrium: Option<EquilibriumReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_term: Option<LongTermReport>,
}

impl LabReport {
    pub fn new(seed: u64) -> Self {
        Self {
            version: crate::LAB_VERSION.to_string(),
            seed,
            comparison: None,
            equilibrium: None,
            long_term: None,
        }
    }
}
