//! Rating snapshots and the immutable summary of a run

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use swarm_common::{AgentId, AgentVariant};

use crate::agent::Agent;

/// Point in simulated time a snapshot was taken at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "at", content = "round", rename_all = "lowercase")]
pub enum SnapshotPoint {
    /// Before the first round
    Initial,
    /// After the round with this 0-based index
    Round(u32),
    /// After the last round
    Final,
}

/// Ratings of every agent at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub point: SnapshotPoint,
    pub ratings: BTreeMap<AgentId, f64>,
}

impl RatingSnapshot {
    pub fn capture(point: SnapshotPoint, agents: &[Agent]) -> Self {
        Self {
            point,
            ratings: agents.iter().map(|a| (a.id, a.rating)).collect(),
        }
    }

    /// Sum of all ratings in the snapshot
    pub fn total(&self) -> f64 {
        self.ratings.values().sum()
    }

    pub fn rating(&self, id: AgentId) -> Option<f64> {
        self.ratings.get(&id).copied()
    }
}

/// Immutable summary of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub rounds: u32,
    pub agents: Vec<Agent>,
    pub rating_history: Vec<RatingSnapshot>,
    pub total_completions: u64,
    pub total_disputes: u64,
    pub inflation_rate: f64,
    pub gini_coefficient: f64,
    pub variant_averages: BTreeMap<AgentVariant, f64>,
}

impl SimulationResult {
    pub fn total_interactions(&self) -> u64 {
        self.total_completions + self.total_disputes
    }

    /// Average final rating of `variant`, if any agent of it exists
    pub fn variant_average(&self, variant: AgentVariant) -> Option<f64> {
        self.variant_averages.get(&variant).copied()
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Serialize the whole result, history included
    pub fn to_json(&self) -> swarm_common::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
