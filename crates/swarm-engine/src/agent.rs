//! Agent - one participant of the swarm
//!
//! Key characteristics:
//! - Rating never drops below the configured minimum
//! - Escrow is transient: it only holds stakes while an interaction settles
//! - Transaction count grows by exactly one per interaction, whatever the outcome
//! - Behaviour parameters are fixed at creation

use rand::Rng;
use serde::{Deserialize, Serialize};
use swarm_common::{AgentId, AgentVariant};

use crate::policy::BehaviorPolicy;

/// Mutable state of a single agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier within the population
    pub id: AgentId,

    /// Behavioural family
    pub variant: AgentVariant,

    /// Current rating, never below the minimum rating
    pub rating: f64,

    /// Interactions participated in
    pub transactions: u64,

    /// Interactions both parties completed
    pub completions: u64,

    /// Disputes in which this agent completed and the counterparty did not
    pub disputes_won: u64,

    /// Disputes in which this agent was at fault
    pub disputes_lost: u64,

    /// Rating headroom currently at risk
    pub escrowed: f64,

    /// Probability of completing (used by fixed-probability policies)
    pub reliability: f64,

    /// Fraction of available headroom staked per interaction
    pub stake_willingness: f64,

    policy: BehaviorPolicy,
}

impl Agent {
    /// Create an agent whose policy follows its variant
    pub fn new(
        id: AgentId,
        variant: AgentVariant,
        reliability: f64,
        stake_willingness: f64,
        starting_rating: f64,
    ) -> Self {
        let policy = BehaviorPolicy::for_variant(variant, reliability);
        Self::with_policy(id, variant, reliability, stake_willingness, starting_rating, policy)
    }

    /// Create an agent with an explicit policy
    pub fn with_policy(
        id: AgentId,
        variant: AgentVariant,
        reliability: f64,
        stake_willingness: f64,
        starting_rating: f64,
        policy: BehaviorPolicy,
    ) -> Self {
        Self {
            id,
            variant,
            rating: starting_rating,
            transactions: 0,
            completions: 0,
            disputes_won: 0,
            disputes_lost: 0,
            escrowed: 0.0,
            reliability,
            stake_willingness,
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> &BehaviorPolicy {
        &self.policy
    }

    /// Rating headroom above the floor not already in escrow
    #[inline]
    pub fn available_headroom(&self, minimum_rating: f64) -> f64 {
        (self.rating - self.escrowed - minimum_rating).max(0.0)
    }

    /// Stake this agent is willing to put at risk, capped at `max_stake`
    pub fn desired_stake(&self, max_stake: f64, minimum_rating: f64) -> f64 {
        let desired = self.available_headroom(minimum_rating) * self.stake_willingness;
        desired.min(max_stake)
    }

    /// Decide whether to complete against a counterparty rated `counterparty_rating`
    pub fn will_complete<R: Rng + ?Sized>(&self, counterparty_rating: f64, rng: &mut R) -> bool {
        self.policy
            .will_complete(self.rating, counterparty_rating, rng)
    }

    /// Interactions ending in a dispute, either side at fault
    pub fn disputes(&self) -> u64 {
        self.disputes_won + self.disputes_lost
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Agent {} ({}): {:.0} [{}C/{}W/{}L]",
            self.id,
            self.variant,
            self.rating,
            self.completions,
            self.disputes_won,
            self.disputes_lost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_agent() {
        let agent = Agent::new(7, AgentVariant::Reliable, 0.9, 0.5, 1200.0);
        assert_eq!(agent.rating, 1200.0);
        assert_eq!(agent.transactions, 0);
        assert_eq!(agent.escrowed, 0.0);
        assert_eq!(*agent.policy(), BehaviorPolicy::Fixed { reliability: 0.9 });
    }

    #[test]
    fn test_available_headroom() {
        let mut agent = Agent::new(0, AgentVariant::Reliable, 0.9, 0.5, 1200.0);
        assert_eq!(agent.available_headroom(100.0), 1100.0);

        agent.escrowed = 1000.0;
        assert_eq!(agent.available_headroom(100.0), 100.0);

        agent.rating = 100.0;
        assert_eq!(agent.available_headroom(100.0), 0.0);
    }

    #[test]
    fn test_stake_capped() {
        let agent = Agent::new(0, AgentVariant::Reliable, 0.9, 0.5, 1200.0);
        assert_eq!(agent.desired_stake(100.0, 100.0), 100.0);

        let agent = Agent::new(0, AgentVariant::Reliable, 0.9, 0.5, 150.0);
        assert_eq!(agent.desired_stake(100.0, 100.0), 25.0);

        let agent = Agent::new(0, AgentVariant::Malicious, 0.3, 0.0, 1200.0);
        assert_eq!(agent.desired_stake(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_display() {
        let mut agent = Agent::new(3, AgentVariant::Selective, 0.9, 0.5, 1234.4);
        agent.completions = 5;
        agent.disputes_lost = 1;
        assert_eq!(agent.to_string(), "Agent 3 (selective): 1234 [5C/0W/1L]");
        assert_eq!(agent.disputes(), 1);
    }
}
