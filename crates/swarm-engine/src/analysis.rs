//! Derived views of a finished run
//!
//! Read-only helpers used by the experiment suites: completion rate, rating
//! distribution, leaders and laggards, and how each variant's average moved
//! across the snapshot history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use swarm_common::{AgentVariant, RatingConfig};

use crate::agent::Agent;
use crate::rating::RatingModel;
use crate::result::SimulationResult;

/// Summary statistics of the final rating distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingDistribution {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator), 0 for a single agent
    pub std_dev: f64,
}

impl RatingDistribution {
    /// `None` for an empty population
    pub fn from_ratings(ratings: &[f64]) -> Option<Self> {
        if ratings.is_empty() {
            return None;
        }
        let mut sorted = ratings.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        let std_dev = if n > 1 {
            let variance =
                sorted.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Self {
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            std_dev,
        })
    }
}

/// Per-variant averages at one sampled snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Index into the rating history
    pub snapshot: usize,
    /// Position in the history, 0 to 100
    pub progress_pct: f64,
    pub averages: BTreeMap<AgentVariant, f64>,
}

impl SimulationResult {
    /// Share of interactions both parties completed
    pub fn completion_rate(&self) -> Option<f64> {
        let total = self.total_interactions();
        (total > 0).then(|| self.total_completions as f64 / total as f64)
    }

    pub fn rating_distribution(&self) -> Option<RatingDistribution> {
        let ratings: Vec<f64> = self.agents.iter().map(|a| a.rating).collect();
        RatingDistribution::from_ratings(&ratings)
    }

    /// Top `n` agents by rating, ties broken by id
    pub fn leaders(&self, n: usize) -> Vec<&Agent> {
        let mut ranked: Vec<&Agent> = self.agents.iter().collect();
        ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating).then(a.id.cmp(&b.id)));
        ranked.truncate(n);
        ranked
    }

    /// Bottom `n` agents by rating, ties broken by id
    pub fn laggards(&self, n: usize) -> Vec<&Agent> {
        let mut ranked: Vec<&Agent> = self.agents.iter().collect();
        ranked.sort_by(|a, b| a.rating.total_cmp(&b.rating).then(a.id.cmp(&b.id)));
        ranked.truncate(n);
        ranked
    }

    /// How many of the bottom `n` agents are of `variant`
    pub fn variant_count_among_laggards(&self, variant: AgentVariant, n: usize) -> usize {
        self.laggards(n)
            .into_iter()
            .filter(|a| a.variant == variant)
            .count()
    }

    /// Per-variant averages at 0%, 25%, 50%, 75% and 100% of the history
    pub fn variant_trajectory(&self) -> Vec<TrajectoryPoint> {
        let len = self.rating_history.len();
        if len == 0 {
            return Vec::new();
        }
        let last = len - 1;
        let mut indices = vec![0, len / 4, len / 2, 3 * len / 4, last];
        indices.dedup();

        indices
            .into_iter()
            .map(|idx| {
                let snapshot = &self.rating_history[idx];
                let mut sums: BTreeMap<AgentVariant, (f64, usize)> = BTreeMap::new();
                for agent in &self.agents {
                    if let Some(rating) = snapshot.rating(agent.id) {
                        let entry = sums.entry(agent.variant).or_insert((0.0, 0));
                        entry.0 += rating;
                        entry.1 += 1;
                    }
                }
                let progress_pct = if last == 0 {
                    100.0
                } else {
                    idx as f64 / last as f64 * 100.0
                };
                TrajectoryPoint {
                    snapshot: idx,
                    progress_pct,
                    averages: sums
                        .into_iter()
                        .map(|(v, (sum, count))| (v, sum / count as f64))
                        .collect(),
                }
            })
            .collect()
    }
}

/// Completion rate at which expected gain and expected loss balance
///
/// Evaluated for two new agents at equal ratings:
/// `p × gain = (1 - p) × loss`, so `p = loss / (gain + loss)`. With halved
/// gains this is 2/3, with full gains 1/2.
pub fn break_even_completion_rate(rating: &RatingConfig, halve_gains: bool) -> f64 {
    let model = RatingModel::new(rating);
    let k = model.experience_tier(0);
    let r = rating.default_rating;
    let gain = model.completion_gain(r, r, k, halve_gains) as f64;
    let loss = model.dispute_loss(r, r, k) as f64;
    loss / (gain + loss)
}
