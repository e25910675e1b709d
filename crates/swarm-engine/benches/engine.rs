//! Swarm Engine Performance Benchmarks
//!
//! Critical paths:
//! - Rating curve evaluation
//! - Single interaction settlement (with and without staking)
//! - Weighted pairing over populations of increasing size
//! - Full rounds

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use swarm_common::{AgentVariant, PopulationConfig, SwarmConfig};
use swarm_engine::{Agent, InteractionEngine, PopulationSimulator, RatingModel};

// ============ RATING BENCHMARKS ============

fn bench_rating(c: &mut Criterion) {
    let mut group = c.benchmark_group("rating");
    let model = RatingModel::default();

    group.bench_function("expected_outcome", |b| {
        b.iter(|| model.expected_outcome(black_box(1234.0), black_box(1187.0)))
    });

    group.bench_function("gain_and_loss", |b| {
        b.iter(|| {
            let gain = model.completion_gain(black_box(1234.0), black_box(1187.0), 24, true);
            let loss = model.dispute_loss(black_box(1234.0), black_box(1187.0), 24);
            black_box((gain, loss))
        })
    });

    group.finish();
}

// ============ INTERACTION BENCHMARKS ============

fn bench_interaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("interaction");

    for staking in [false, true] {
        let engine = InteractionEngine::new(&SwarmConfig::default().with_mechanism(true, staking));
        group.bench_with_input(
            BenchmarkId::new("execute", if staking { "staked" } else { "unstaked" }),
            &engine,
            |b, engine| {
                let mut rng = ChaCha8Rng::seed_from_u64(1);
                let mut proposer = Agent::new(0, AgentVariant::Reliable, 0.9, 0.5, 1200.0);
                let mut acceptor = Agent::new(1, AgentVariant::Selective, 0.9, 0.6, 1200.0);
                b.iter(|| black_box(engine.execute(&mut proposer, &mut acceptor, &mut rng)))
            },
        );
    }

    group.finish();
}

// ============ POPULATION BENCHMARKS ============

fn bench_population(c: &mut Criterion) {
    let mut group = c.benchmark_group("population");
    group.measurement_time(Duration::from_secs(10));

    for size in [100usize, 1_000, 10_000] {
        let config = SwarmConfig::default().with_population(PopulationConfig::mix(
            size / 2,
            size / 5,
            size / 10,
            size / 5,
        ));
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let sim = PopulationSimulator::new(config, &mut rng).expect("valid config");

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("draw_pair", size), &sim, |b, sim| {
            b.iter(|| black_box(sim.draw_pair(&mut rng).expect("weights are positive")))
        });
    }

    // Only round 0 snapshots, history stays flat across iterations
    let config = SwarmConfig {
        snapshot_interval: u32::MAX,
        ..SwarmConfig::default()
    };
    let interactions = config.interactions_per_round as u64;
    group.throughput(Throughput::Elements(interactions));
    group.bench_function("round", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut sim = PopulationSimulator::new(config.clone(), &mut rng).expect("valid config");
        let mut round = 0u32;
        b.iter(|| {
            sim.run_round(round, &mut rng).expect("round runs");
            round = round.wrapping_add(1);
        })
    });

    group.finish();
}

criterion_group!(rating, bench_rating);

criterion_group!(interaction, bench_interaction);

criterion_group!(population, bench_population);

criterion_main!(rating, interaction, population);
