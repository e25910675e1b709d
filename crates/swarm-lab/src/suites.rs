//! Experiment suites
//!
//! Each run gets a fresh ChaCha8 source seeded from the run's config, so two
//! runs of one suite differ only in the mechanism being compared.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use swarm_common::{AgentVariant, Result, SwarmConfig};
use swarm_engine::{PopulationSimulator, SimulationResult};
use tracing::{info, instrument};

use crate::config::{LabConfig, Suite};
use crate::report::{
    ComparisonFindings, ComparisonReport, EquilibriumReport, EquilibriumRow, LabReport,
    LongTermReport, RunSummary,
};

/// Run `config` with a source seeded from `config.seed`
pub fn run_with_seed(config: &SwarmConfig) -> Result<SimulationResult> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    PopulationSimulator::new(config.clone(), &mut rng)?.run(&mut rng)
}

/// Run every selected suite in order
pub fn run_suites(lab: &LabConfig) -> Result<LabReport> {
    let mut report = LabReport::new(lab.base.seed);
    for suite in &lab.suites {
        match suite {
            Suite::Comparison => report.comparison = Some(comparison(lab)?),
            Suite::Equilibrium => report.equilibrium = Some(equilibrium(lab)?),
            Suite::LongTerm => report.long_term = Some(long_term(lab)?),
        }
    }
    Ok(report)
}

/// Full vs halved gains, with and without staking
#[instrument(skip_all)]
pub fn comparison(lab: &LabConfig) -> Result<ComparisonReport> {
    let base = lab.comparison.apply(&lab.base);
    let variants = [
        ("full_gains_no_staking", false, false),
        ("halved_gains_no_staking", true, false),
        ("halved_gains_staking", true, true),
        ("full_gains_staking", false, true),
    ];

    let mut runs = Vec::with_capacity(variants.len());
    let mut results = Vec::with_capacity(variants.len());
    for (label, halve_gains, staking) in variants {
        let config = base.clone().with_mechanism(halve_gains, staking);
        info!(label, "running comparison configuration");
        let result = run_with_seed(&config)?;
        runs.push(RunSummary::from_result(label, &config, &result, lab.output.standings));
        results.push(result);
    }

    let findings = comparison_findings(&runs, &results[2], lab.comparison.bottom_n);
    info!(
        inflation_controlled = findings.inflation_controlled,
        reliable_above_malicious = findings.reliable_above_malicious,
        staking_differentiates = findings.staking_differentiates,
        malicious_in_bottom = findings.malicious_in_bottom,
        "comparison finished"
    );

    Ok(ComparisonReport { runs, findings })
}

/// Verdicts from the four comparison runs, in `comparison` order
fn comparison_findings(runs: &[RunSummary], production: &SimulationResult, bottom_n: usize) -> ComparisonFindings {
    let (full_plain, halved_plain, halved_staked) = (&runs[0], &runs[1], &runs[2]);

    // A missing variant never counts as a pass
    let reliable_above_malicious = matches!(
        (
            halved_staked.variant_average(AgentVariant::Reliable),
            halved_staked.variant_average(AgentVariant::Malicious),
        ),
        (Some(reliable), Some(malicious)) if reliable > malicious
    );

    let staking_gini_increase_pct = (halved_plain.gini_coefficient > 0.0).then(|| {
        (halved_staked.gini_coefficient / halved_plain.gini_coefficient - 1.0) * 100.0
    });

    ComparisonFindings {
        inflation_controlled: halved_staked.inflation_rate < full_plain.inflation_rate * 0.5,
        reliable_above_malicious,
        staking_differentiates: halved_staked.gini_coefficient > halved_plain.gini_coefficient,
        malicious_in_bottom: production.variant_count_among_laggards(AgentVariant::Malicious, bottom_n),
        malicious_total: production
            .agents
            .iter()
            .filter(|a| a.variant == AgentVariant::Malicious)
            .count(),
        bottom_n,
        staking_gini_increase_pct,
    }
}

/// Several population mixes under halved gains and staking
#[instrument(skip_all)]
pub fn equilibrium(lab: &LabConfig) -> Result<EquilibriumReport> {
    let mut rows = Vec::with_capacity(lab.equilibrium.mixes.len());
    for mix in &lab.equilibrium.mixes {
        let config = lab.equilibrium.apply(&lab.base, mix);
        let result = run_with_seed(&config)?;
        let row = EquilibriumRow {
            label: mix.label.clone(),
            population: mix.population,
            completion_rate: result.completion_rate(),
            inflation_rate: result.inflation_rate,
            reliable_average: result.variant_average(AgentVariant::Reliable),
        };
        info!(
            mix = %row.label,
            completion_rate = ?row.completion_rate,
            inflation = row.inflation_rate,
            "equilibrium mix finished"
        );
        rows.push(row);
    }
    Ok(EquilibriumReport { rows })
}

/// One long run, checking the top of the ranking is held by reliable agents
#[instrument(skip_all)]
pub fn long_term(lab: &LabConfig) -> Result<LongTermReport> {
    let config = lab.long_term.apply(&lab.base);
    let result = run_with_seed(&config)?;

    let top_variants: Vec<AgentVariant> = result
        .leaders(lab.long_term.top_n)
        .into_iter()
        .map(|a| a.variant)
        .collect();
    let all_top_reliable =
        !top_variants.is_empty() && top_variants.iter().all(|v| *v == AgentVariant::Reliable);
    info!(all_top_reliable, gini = result.gini_coefficient, "long-term run finished");

    Ok(LongTermReport {
        summary: RunSummary::from_result("long_term", &config, &result, lab.output.standings),
        top_variants,
        all_top_reliable,
    })
}
