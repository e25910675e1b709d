//! InteractionEngine - settles one pairwise interaction
//!
//! An interaction runs through four steps:
//! 1. Both parties escrow a stake (zero when staking is off)
//! 2. Proposer, then acceptor, decide whether to complete
//! 3. Settlement: mutual completion, mutual fault, or one party at fault
//! 4. Escrows are released and both transaction counts advance
//!
//! All gains and losses are computed from the ratings and experience tiers
//! the parties held when the interaction began.

use rand::Rng;
use serde::{Deserialize, Serialize};
use swarm_common::{StakingConfig, SwarmConfig};
use tracing::trace;

use crate::agent::Agent;
use crate::rating::{round_half_even, RatingModel};

/// Side of an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Proposer,
    Acceptor,
}

/// How an interaction was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    /// Both completed, both gain, stakes returned
    Completed,
    /// Neither completed, both lose, stakes burned
    MutualFault,
    /// Only `winner` completed, the other side forfeits its stake to it
    OneSided { winner: Role },
}

impl Settlement {
    #[inline]
    pub fn is_dispute(&self) -> bool {
        !matches!(self, Settlement::Completed)
    }
}

/// Effect of one interaction on its two parties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionOutcome {
    pub settlement: Settlement,
    pub proposer_stake: f64,
    pub acceptor_stake: f64,
    /// Proposer rating after minus before
    pub proposer_delta: f64,
    /// Acceptor rating after minus before
    pub acceptor_delta: f64,
}

/// Executes interactions under one configuration
#[derive(Debug, Clone, Copy)]
pub struct InteractionEngine {
    model: RatingModel,
    staking: StakingConfig,
    halve_gains: bool,
    minimum_rating: f64,
}

impl InteractionEngine {
    pub fn new(config: &SwarmConfig) -> Self {
        Self {
            model: RatingModel::new(&config.rating),
            staking: config.staking,
            halve_gains: config.halve_gains,
            minimum_rating: config.rating.minimum_rating,
        }
    }

    #[inline]
    pub fn model(&self) -> &RatingModel {
        &self.model
    }

    /// Stake `agent` puts into escrow for the next interaction
    pub fn stake_for(&self, agent: &Agent) -> f64 {
        if !self.staking.enabled {
            return 0.0;
        }
        agent.desired_stake(self.staking.max_stake, self.minimum_rating)
    }

    /// Run one interaction between `proposer` and `acceptor`
    pub fn execute<R: Rng + ?Sized>(
        &self,
        proposer: &mut Agent,
        acceptor: &mut Agent,
        rng: &mut R,
    ) -> InteractionOutcome {
        let proposer_stake = self.stake_for(proposer);
        let acceptor_stake = self.stake_for(acceptor);
        proposer.escrowed += proposer_stake;
        acceptor.escrowed += acceptor_stake;

        let proposer_completes = proposer.will_complete(acceptor.rating, rng);
        let acceptor_completes = acceptor.will_complete(proposer.rating, rng);

        let k_proposer = self.model.experience_tier(proposer.transactions);
        let k_acceptor = self.model.experience_tier(acceptor.transactions);
        let (proposer_before, acceptor_before) = (proposer.rating, acceptor.rating);

        let settlement = match (proposer_completes, acceptor_completes) {
            (true, true) => {
                self.settle_completion(proposer, acceptor, k_proposer, k_acceptor);
                Settlement::Completed
            }
            (false, false) => {
                self.settle_mutual_fault(
                    proposer,
                    acceptor,
                    (k_proposer, proposer_stake),
                    (k_acceptor, acceptor_stake),
                );
                Settlement::MutualFault
            }
            (true, false) => {
                self.settle_one_sided(proposer, acceptor, k_acceptor, acceptor_stake);
                Settlement::OneSided {
                    winner: Role::Proposer,
                }
            }
            (false, true) => {
                self.settle_one_sided(acceptor, proposer, k_proposer, proposer_stake);
                Settlement::OneSided {
                    winner: Role::Acceptor,
                }
            }
        };

        // Released, burned, or transferred: the escrow entry goes either way
        proposer.escrowed -= proposer_stake;
        acceptor.escrowed -= acceptor_stake;

        proposer.transactions += 1;
        acceptor.transactions += 1;

        let outcome = InteractionOutcome {
            settlement,
            proposer_stake,
            acceptor_stake,
            proposer_delta: proposer.rating - proposer_before,
            acceptor_delta: acceptor.rating - acceptor_before,
        };
        trace!(
            proposer = proposer.id,
            acceptor = acceptor.id,
            ?settlement,
            proposer_delta = outcome.proposer_delta,
            acceptor_delta = outcome.acceptor_delta,
            "interaction settled"
        );
        outcome
    }

    fn settle_completion(&self, proposer: &mut Agent, acceptor: &mut Agent, k_proposer: u32, k_acceptor: u32) {
        let gain_proposer =
            self.model
                .completion_gain(proposer.rating, acceptor.rating, k_proposer, self.halve_gains);
        let gain_acceptor =
            self.model
                .completion_gain(acceptor.rating, proposer.rating, k_acceptor, self.halve_gains);

        proposer.rating = self.floor(proposer.rating + gain_proposer as f64);
        acceptor.rating = self.floor(acceptor.rating + gain_acceptor as f64);
        proposer.completions += 1;
        acceptor.completions += 1;
    }

    fn settle_mutual_fault(
        &self,
        proposer: &mut Agent,
        acceptor: &mut Agent,
        (k_proposer, proposer_stake): (u32, f64),
        (k_acceptor, acceptor_stake): (u32, f64),
    ) {
        let loss_proposer =
            self.model.dispute_loss(proposer.rating, acceptor.rating, k_proposer) as f64 + proposer_stake;
        let loss_acceptor =
            self.model.dispute_loss(acceptor.rating, proposer.rating, k_acceptor) as f64 + acceptor_stake;

        proposer.rating = self.floor(proposer.rating - loss_proposer);
        acceptor.rating = self.floor(acceptor.rating - loss_acceptor);
        proposer.disputes_lost += 1;
        acceptor.disputes_lost += 1;
    }

    /// Loser pays its loss plus its stake; winner receives half the loss plus that stake
    fn settle_one_sided(&self, winner: &mut Agent, loser: &mut Agent, k_loser: u32, loser_stake: f64) {
        let loss = self.model.dispute_loss(loser.rating, winner.rating, k_loser) as f64;
        let win_gain = round_half_even(loss * 0.5);

        winner.rating = self.floor(winner.rating + win_gain + loser_stake);
        loser.rating = self.floor(loser.rating - (loss + loser_stake));
        winner.disputes_won += 1;
        loser.disputes_lost += 1;
    }

    #[inline]
    fn floor(&self, rating: f64) -> f64 {
        rating.max(self.minimum_rating)
    }
}
