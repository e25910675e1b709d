//! RatingModel - ELO expected outcome, experience tiers, gains and losses
//!
//! Stateless apart from the curve parameters it was built from. Every
//! rounding step in the engine goes through [`round_half_even`] so that
//! symmetric scenarios settle symmetrically.

use swarm_common::{ExperienceTiers, RatingConfig};

/// Round to the nearest integer, ties to the even neighbour (2.5 → 2, 3.5 → 4)
#[inline]
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Pure rating functions parameterised by a [`RatingConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingModel {
    divisor: f64,
    tiers: ExperienceTiers,
}

impl RatingModel {
    pub fn new(config: &RatingConfig) -> Self {
        Self {
            divisor: config.elo_divisor,
            tiers: config.tiers,
        }
    }

    /// Probability that `self_rating` beats `opponent_rating`
    ///
    /// `expected_outcome(a, b) + expected_outcome(b, a) == 1` and equal
    /// ratings give exactly 0.5.
    #[inline]
    pub fn expected_outcome(&self, self_rating: f64, opponent_rating: f64) -> f64 {
        let exponent = (opponent_rating - self_rating) / self.divisor;
        1.0 / (1.0 + 10f64.powf(exponent))
    }

    /// K-factor from the acting agent's own transaction count
    pub fn experience_tier(&self, transactions: u64) -> u32 {
        if transactions < self.tiers.new_threshold {
            self.tiers.k_new
        } else if transactions < self.tiers.intermediate_threshold {
            self.tiers.k_intermediate
        } else {
            self.tiers.k_established
        }
    }

    /// Rating gained from a mutual completion, at least 1
    pub fn completion_gain(&self, self_rating: f64, opponent_rating: f64, k: u32, halve: bool) -> u32 {
        let expected = self.expected_outcome(self_rating, opponent_rating);
        let mut gain = k as f64 * (1.0 - expected);
        if halve {
            gain /= 2.0;
        }
        (round_half_even(gain) as u32).max(1)
    }

    /// Rating lost by an at-fault party, at least 1
    pub fn dispute_loss(&self, self_rating: f64, opponent_rating: f64, k: u32) -> u32 {
        let expected = self.expected_outcome(self_rating, opponent_rating);
        let loss = k as f64 * expected;
        (round_half_even(loss) as u32).max(1)
    }
}

impl Default for RatingModel {
    fn default() -> Self {
        Self::new(&RatingConfig::default())
    }
}
