//! PopulationSimulator - drives a population through rounds of pairings
//!
//! Pairings are drawn with replacement, weighted by rating headroom above
//! the floor (at least 1), so well-rated agents attract more business. A
//! run consumes the simulator and yields a single [`SimulationResult`].

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use swarm_common::{AgentId, AgentVariant, Result, SwarmConfig, SwarmError};
use tracing::{debug, info, instrument};

use crate::agent::Agent;
use crate::interaction::{InteractionEngine, InteractionOutcome, Settlement};
use crate::metrics::MetricsAnalyzer;
use crate::result::{RatingSnapshot, SimulationResult, SnapshotPoint};

/// Owns the population and its rating history for the duration of a run
#[derive(Debug, Clone)]
pub struct PopulationSimulator {
    config: SwarmConfig,
    engine: InteractionEngine,
    agents: Vec<Agent>,
    rating_history: Vec<RatingSnapshot>,
    total_completions: u64,
    total_disputes: u64,
}

impl PopulationSimulator {
    /// Validate `config` and spawn its population
    ///
    /// Agents are numbered from 0 in variant order reliable, unreliable,
    /// malicious, selective. Each draws reliability, then stake-willingness,
    /// from its variant's profile.
    pub fn new<R: Rng + ?Sized>(config: SwarmConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let mut agents = Vec::with_capacity(config.population.total());
        let mut next_id: AgentId = 0;
        for variant in AgentVariant::ALL {
            let profile = config.profiles.profile(variant);
            for _ in 0..config.population.count(variant) {
                let reliability = profile.reliability.sample(rng);
                let stake_willingness = profile.stake_willingness.sample(rng);
                agents.push(Agent::new(
                    next_id,
                    variant,
                    reliability,
                    stake_willingness,
                    config.rating.default_rating,
                ));
                next_id += 1;
            }
        }

        debug!(agents = agents.len(), "population spawned");

        Ok(Self {
            engine: InteractionEngine::new(&config),
            config,
            agents,
            rating_history: Vec::new(),
            total_completions: 0,
            total_disputes: 0,
        })
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn rating_history(&self) -> &[RatingSnapshot] {
        &self.rating_history
    }

    pub fn total_completions(&self) -> u64 {
        self.total_completions
    }

    pub fn total_disputes(&self) -> u64 {
        self.total_disputes
    }

    /// Append a snapshot of the current ratings
    pub fn record_ratings(&mut self, point: SnapshotPoint) {
        self.rating_history
            .push(RatingSnapshot::capture(point, &self.agents));
    }

    /// Draw a (proposer, acceptor) index pair of distinct agents
    ///
    /// Both draws use the same weights; only the second is redrawn until it
    /// differs from the first.
    pub fn draw_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(usize, usize)> {
        let minimum = self.config.rating.minimum_rating;
        let weights = self
            .agents
            .iter()
            .map(|a| (a.rating - minimum).max(1.0));
        let dist = WeightedIndex::new(weights).map_err(|e| SwarmError::Sampling(e.to_string()))?;

        let proposer = dist.sample(rng);
        let mut acceptor = dist.sample(rng);
        while acceptor == proposer {
            acceptor = dist.sample(rng);
        }
        Ok((proposer, acceptor))
    }

    /// Settle one interaction between the agents at the given indices
    ///
    /// Panics if both indices are equal or out of bounds.
    pub fn interact<R: Rng + ?Sized>(
        &mut self,
        proposer: usize,
        acceptor: usize,
        rng: &mut R,
    ) -> InteractionOutcome {
        let (proposer, acceptor) = pair_mut(&mut self.agents, proposer, acceptor);
        let outcome = self.engine.execute(proposer, acceptor, rng);

        match outcome.settlement {
            Settlement::Completed => self.total_completions += 1,
            Settlement::MutualFault | Settlement::OneSided { .. } => self.total_disputes += 1,
        }
        outcome
    }

    /// Play every pairing of round `round`, snapshotting on the interval
    pub fn run_round<R: Rng + ?Sized>(&mut self, round: u32, rng: &mut R) -> Result<()> {
        for _ in 0..self.config.interactions_per_round {
            let (proposer, acceptor) = self.draw_pair(rng)?;
            self.interact(proposer, acceptor, rng);
        }

        if round % self.config.snapshot_interval == 0 {
            self.record_ratings(SnapshotPoint::Round(round));
            debug!(
                round,
                completions = self.total_completions,
                disputes = self.total_disputes,
                "snapshot recorded"
            );
        }
        Ok(())
    }

    /// Run every configured round and summarise
    #[instrument(skip_all, fields(rounds = self.config.rounds, agents = self.agents.len()))]
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<SimulationResult> {
        info!(
            halve_gains = self.config.halve_gains,
            staking = self.config.staking.enabled,
            interactions_per_round = self.config.interactions_per_round,
            "starting simulation"
        );

        self.record_ratings(SnapshotPoint::Initial);
        for round in 0..self.config.rounds {
            self.run_round(round, rng)?;
        }
        self.record_ratings(SnapshotPoint::Final);

        let result = self.into_result()?;
        info!(
            completions = result.total_completions,
            disputes = result.total_disputes,
            inflation = result.inflation_rate,
            gini = result.gini_coefficient,
            "simulation finished"
        );
        Ok(result)
    }

    /// Summarise the current state into a [`SimulationResult`]
    pub fn into_result(self) -> Result<SimulationResult> {
        let metrics = MetricsAnalyzer::analyze(&self.agents, &self.rating_history)?;
        Ok(SimulationResult {
            rounds: self.config.rounds,
            agents: self.agents,
            rating_history: self.rating_history,
            total_completions: self.total_completions,
            total_disputes: self.total_disputes,
            inflation_rate: metrics.inflation_rate,
            gini_coefficient: metrics.gini_coefficient,
            variant_averages: metrics.variant_averages,
        })
    }
}

/// Mutable borrows of two distinct agents
fn pair_mut(agents: &mut [Agent], a: usize, b: usize) -> (&mut Agent, &mut Agent) {
    assert_ne!(a, b, "an agent cannot interact with itself");
    if a < b {
        let (left, right) = agents.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = agents.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use swarm_common::{ConfigError, PopulationConfig};

    fn small_config() -> SwarmConfig {
        SwarmConfig::default()
            .with_population(PopulationConfig::mix(5, 3, 2, 2))
            .with_schedule(25, 10)
    }

    #[test]
    fn test_population_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let sim = PopulationSimulator::new(small_config(), &mut rng).unwrap();
        let agents = sim.agents();

        assert_eq!(agents.len(), 12);
        for (i, agent) in agents.iter().enumerate() {
            assert_eq!(agent.id as usize, i);
            assert_eq!(agent.rating, 1200.0);
            assert_eq!(agent.transactions, 0);
        }
        assert!(agents[..5].iter().all(|a| a.variant == AgentVariant::Reliable));
        assert!(agents[..5]
            .iter()
            .all(|a| (0.85..=0.99).contains(&a.reliability)));
        assert!(agents[5..8]
            .iter()
            .all(|a| (0.1..=0.3).contains(&a.stake_willingness)));
        assert!(agents[8..10].iter().all(|a| a.reliability == 0.3));
        assert!(agents[10..].iter().all(|a| a.reliability == 0.9));
    }

    #[test]
    fn test_invalid_config_fails_before_spawning() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = small_config().with_schedule(0, 10);
        let err = PopulationSimulator::new(config, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SwarmError::Config(ConfigError::NonPositiveRounds)
        ));
    }

    #[test]
    fn test_draw_pair_is_distinct() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = small_config().with_population(PopulationConfig::mix(2, 0, 0, 0));
        let sim = PopulationSimulator::new(config, &mut rng).unwrap();
        for _ in 0..200 {
            let (a, b) = sim.draw_pair(&mut rng).unwrap();
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_snapshot_schedule() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = PopulationSimulator::new(small_config(), &mut rng)
            .unwrap()
            .run(&mut rng)
            .unwrap();

        let points: Vec<SnapshotPoint> = result.rating_history.iter().map(|s| s.point).collect();
        assert_eq!(
            points,
            vec![
                SnapshotPoint::Initial,
                SnapshotPoint::Round(0),
                SnapshotPoint::Round(10),
                SnapshotPoint::Round(20),
                SnapshotPoint::Final,
            ]
        );
    }

    #[test]
    fn test_counters_add_up() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let result = PopulationSimulator::new(small_config(), &mut rng)
            .unwrap()
            .run(&mut rng)
            .unwrap();

        assert_eq!(result.total_interactions(), 25 * 10);
        let transactions: u64 = result.agents.iter().map(|a| a.transactions).sum();
        assert_eq!(transactions, 2 * 25 * 10);
        let completions: u64 = result.agents.iter().map(|a| a.completions).sum();
        assert_eq!(completions, 2 * result.total_completions);
    }

    #[test]
    fn test_pair_mut_order() {
        let mut agents = vec![
            Agent::new(0, AgentVariant::Reliable, 0.9, 0.5, 1200.0),
            Agent::new(1, AgentVariant::Reliable, 0.9, 0.5, 1200.0),
            Agent::new(2, AgentVariant::Reliable, 0.9, 0.5, 1200.0),
        ];
        let (a, b) = pair_mut(&mut agents, 2, 0);
        assert_eq!((a.id, b.id), (2, 0));
        let (a, b) = pair_mut(&mut agents, 1, 2);
        assert_eq!((a.id, b.id), (1, 2));
    }
}
