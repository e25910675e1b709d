//! Completion policies
//!
//! Each policy answers one question, "does this agent complete the
//! interaction?", from its own rating and the counterparty's. Every decision
//! consumes exactly one uniform draw from the injected source.

use rand::Rng;
use serde::{Deserialize, Serialize};
use swarm_common::AgentVariant;

/// Counterparty rating at which a malicious agent defects half the time
pub const MALICIOUS_BASELINE_RATING: f64 = 1200.0;

/// Rating distance that moves a malicious agent's defect probability by 1.0
pub const MALICIOUS_RATING_SCALE: f64 = 2000.0;

/// Rating gap beyond which a selective agent considers the counterparty out of tier
pub const SELECTIVE_BAND: f64 = 200.0;

/// Completion probability of a selective agent inside its tier
pub const SELECTIVE_IN_BAND: f64 = 0.95;

/// Completion probability of a selective agent outside its tier
pub const SELECTIVE_OUT_OF_BAND: f64 = 0.5;

/// Completion probability of the fallback policy
pub const FALLBACK_COMPLETION: f64 = 0.8;

/// How an agent decides whether to complete an interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorPolicy {
    /// Complete with a fixed probability (reliable and unreliable agents)
    Fixed { reliability: f64 },
    /// Defect more often the higher the counterparty is rated
    Adversarial,
    /// Prefer counterparties within [`SELECTIVE_BAND`] of the own rating
    TierSelective,
    /// Complete with [`FALLBACK_COMPLETION`]
    Fallback,
}

impl BehaviorPolicy {
    /// Policy followed by agents of `variant`
    pub fn for_variant(variant: AgentVariant, reliability: f64) -> Self {
        match variant {
            AgentVariant::Reliable | AgentVariant::Unreliable => {
                BehaviorPolicy::Fixed { reliability }
            }
            AgentVariant::Malicious => BehaviorPolicy::Adversarial,
            AgentVariant::Selective => BehaviorPolicy::TierSelective,
        }
    }

    /// Defect probability of an adversarial agent facing `counterparty_rating`
    ///
    /// Not clamped: above a counterparty rating of 2200 the agent always
    /// defects, below 200 it always completes.
    #[inline]
    pub fn defect_probability(counterparty_rating: f64) -> f64 {
        0.5 + (counterparty_rating - MALICIOUS_BASELINE_RATING) / MALICIOUS_RATING_SCALE
    }

    /// Draw a completion decision
    pub fn will_complete<R: Rng + ?Sized>(
        &self,
        own_rating: f64,
        counterparty_rating: f64,
        rng: &mut R,
    ) -> bool {
        let draw: f64 = rng.gen();
        match *self {
            BehaviorPolicy::Fixed { reliability } => draw < reliability,
            BehaviorPolicy::Adversarial => draw > Self::defect_probability(counterparty_rating),
            BehaviorPolicy::TierSelective => {
                if (own_rating - counterparty_rating).abs() > SELECTIVE_BAND {
                    draw < SELECTIVE_OUT_OF_BAND
                } else {
                    draw < SELECTIVE_IN_BAND
                }
            }
            BehaviorPolicy::Fallback => draw < FALLBACK_COMPLETION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn completion_rate(policy: BehaviorPolicy, own: f64, other: f64) -> f64 {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let trials = 20_000;
        let completed = (0..trials)
            .filter(|_| policy.will_complete(own, other, &mut rng))
            .count();
        completed as f64 / trials as f64
    }

    #[test]
    fn test_policy_for_variant() {
        assert_eq!(
            BehaviorPolicy::for_variant(AgentVariant::Unreliable, 0.4),
            BehaviorPolicy::Fixed { reliability: 0.4 }
        );
        assert_eq!(
            BehaviorPolicy::for_variant(AgentVariant::Malicious, 0.3),
            BehaviorPolicy::Adversarial
        );
        assert_eq!(
            BehaviorPolicy::for_variant(AgentVariant::Selective, 0.9),
            BehaviorPolicy::TierSelective
        );
    }

    #[test]
    fn test_fixed_extremes() {
        // StepRng(0, 0) always yields 0.0
        let mut zero = StepRng::new(0, 0);
        assert!(BehaviorPolicy::Fixed { reliability: 0.01 }.will_complete(1200.0, 1200.0, &mut zero));
        assert!(!BehaviorPolicy::Fixed { reliability: 0.0 }.will_complete(1200.0, 1200.0, &mut zero));
    }

    #[test]
    fn test_defect_probability() {
        assert_eq!(BehaviorPolicy::defect_probability(1200.0), 0.5);
        assert_eq!(BehaviorPolicy::defect_probability(2200.0), 1.0);
        assert_eq!(BehaviorPolicy::defect_probability(200.0), 0.0);
    }

    #[test]
    fn test_adversarial_never_completes_against_top_rated() {
        let rate = completion_rate(BehaviorPolicy::Adversarial, 1200.0, 2400.0);
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_adversarial_targets_high_ratings() {
        let low = completion_rate(BehaviorPolicy::Adversarial, 1200.0, 800.0);
        let high = completion_rate(BehaviorPolicy::Adversarial, 1200.0, 1600.0);
        assert!((low - 0.7).abs() < 0.02);
        assert!((high - 0.3).abs() < 0.02);
    }

    #[test]
    fn test_selective_band() {
        let inside = completion_rate(BehaviorPolicy::TierSelective, 1200.0, 1400.0);
        let outside = completion_rate(BehaviorPolicy::TierSelective, 1200.0, 1401.0);
        assert!((inside - 0.95).abs() < 0.02);
        assert!((outside - 0.5).abs() < 0.02);
    }

    #[test]
    fn test_fallback_rate() {
        let rate = completion_rate(BehaviorPolicy::Fallback, 1200.0, 1200.0);
        assert!((rate - 0.8).abs() < 0.02);
    }

    #[test]
    fn test_one_draw_per_decision() {
        let mut a = ChaCha8Rng::seed_from_u64(3);
        let mut b = ChaCha8Rng::seed_from_u64(3);
        BehaviorPolicy::TierSelective.will_complete(1200.0, 1800.0, &mut a);
        BehaviorPolicy::Adversarial.will_complete(1200.0, 1800.0, &mut b);
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }
}
