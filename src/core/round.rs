use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::concerns::{CATALOG, evaluate_concerns};
use super::diagnosis::score;
use super::engine::{debt_at_graduation, project};
use super::generator::generate_scenario_with;
use super::types::{ConcernId, ConcernInstance, DiagnosisResult, ProjectionYear, Scenario};

/// One game round. A new round replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub scenario: Scenario,
    pub projection: Vec<ProjectionYear>,
}

/// What the player is shown before diagnosing: no applicability, no evidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcernOption {
    pub id: ConcernId,
    pub title: &'static str,
    pub description: &'static str,
}

impl Round {
    pub fn new(scenario: Scenario) -> Self {
        let projection = project(&scenario);
        Self {
            scenario,
            projection,
        }
    }

    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let round = Self::new(generate_scenario_with(rng));
        debug!(
            name = %round.scenario.name,
            career = %round.scenario.career,
            path = %round.scenario.education_path,
            "generated round"
        );
        round
    }

    pub fn concern_options() -> Vec<ConcernOption> {
        CATALOG
            .iter()
            .map(|rule| ConcernOption {
                id: rule.id,
                title: rule.title,
                description: rule.description,
            })
            .collect()
    }

    pub fn concerns(&self) -> Vec<ConcernInstance> {
        evaluate_concerns(&self.scenario, &self.projection)
    }

    pub fn diagnose(&self, selected: &BTreeSet<ConcernId>) -> DiagnosisResult {
        let result = score(&self.scenario, &self.projection, selected);
        debug!(
            selected = selected.len(),
            correct = result.correct_identifications,
            total = result.total_concerns,
            score = result.score,
            "scored diagnosis"
        );
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

impl Percentiles {
    fn of(mut values: Vec<f64>) -> Self {
        Self {
            p10: percentile(&mut values, 10.0),
            p50: percentile(&mut values, 50.0),
            p90: percentile(&mut values, 90.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcernIncidence {
    pub id: ConcernId,
    pub rounds: usize,
    pub rate: f64,
}

/// Aggregate view over many independent rounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub rounds: usize,
    pub clean_rounds: usize,
    pub mean_concerns_per_round: f64,
    pub concern_incidence: Vec<ConcernIncidence>,
    pub debt_at_graduation: Percentiles,
    pub final_debt: Percentiles,
    pub final_net_worth: Percentiles,
}

pub fn run_batch<R: Rng + ?Sized>(rounds: usize, rng: &mut R) -> BatchSummary {
    let mut hits = [0usize; ConcernId::ALL.len()];
    let mut clean_rounds = 0;
    let mut total_hits = 0;
    let mut graduation_debts = Vec::with_capacity(rounds);
    let mut final_debts = Vec::with_capacity(rounds);
    let mut final_net_worths = Vec::with_capacity(rounds);

    for _ in 0..rounds {
        let round = Round::generate_with(rng);
        let mut applicable = 0;
        for concern in round.concerns().iter().filter(|c| c.applies) {
            hits[concern.id as usize] += 1;
            applicable += 1;
        }
        if applicable == 0 {
            clean_rounds += 1;
        }
        total_hits += applicable;

        graduation_debts.push(debt_at_graduation(&round.scenario));
        if let Some(last) = round.projection.last() {
            final_debts.push(last.debt as f64);
            final_net_worths.push(last.net_worth as f64);
        }
    }

    let rate = |count: usize| {
        if rounds == 0 {
            0.0
        } else {
            count as f64 / rounds as f64
        }
    };

    let summary = BatchSummary {
        rounds,
        clean_rounds,
        mean_concerns_per_round: rate(total_hits),
        concern_incidence: ConcernId::ALL
            .into_iter()
            .map(|id| ConcernIncidence {
                id,
                rounds: hits[id as usize],
                rate: rate(hits[id as usize]),
            })
            .collect(),
        debt_at_graduation: Percentiles::of(graduation_debts),
        final_debt: Percentiles::of(final_debts),
        final_net_worth: Percentiles::of(final_net_worths),
    };
    info!(
        rounds,
        clean_rounds,
        mean_concerns = summary.mean_concerns_per_round,
        "batch complete"
    );
    summary
}

/// Linear interpolation between closest ranks. Sorts `values` in place.
fn percentile(values: &mut [f64], p: f64) -> f64 {
    values.sort_by(f64::total_cmp);
    match values.len() {
        0 => 0.0,
        1 => values[0],
        n => {
            let rank = (p / 100.0) * (n - 1) as f64;
            let below = rank.floor() as usize;
            let above = rank.ceil() as usize;
            let weight = rank - below as f64;
            values[below] + (values[above] - values[below]) * weight
        }
    }
}
