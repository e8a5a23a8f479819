use std::collections::BTreeSet;

use super::concerns::actual_concerns;
use super::money::round_half_up;
use super::types::{ConcernId, DiagnosisResult, ProjectionYear, Scenario};

/// Scores a player's selection against the concerns the projection supports.
///
/// A scenario with nothing wrong scores 100 only when the player also selected
/// nothing. Missed concerns keep catalog order; false positives come out in
/// `ConcernId` order.
pub fn score(
    scenario: &Scenario,
    projection: &[ProjectionYear],
    selected: &BTreeSet<ConcernId>,
) -> DiagnosisResult {
    let actual = actual_concerns(scenario, projection);
    let actual_ids: BTreeSet<ConcernId> = actual.iter().map(|concern| concern.id).collect();

    let correct_identifications = selected.intersection(&actual_ids).count();
    let false_positives: Vec<ConcernId> = selected.difference(&actual_ids).copied().collect();
    let total_concerns = actual.len();
    let missed_concerns = actual
        .into_iter()
        .filter(|concern| !selected.contains(&concern.id))
        .collect();

    let score = if total_concerns == 0 {
        if selected.is_empty() { 100 } else { 0 }
    } else {
        round_half_up(100.0 * correct_identifications as f64 / total_concerns as f64) as u32
    };

    DiagnosisResult {
        correct_identifications,
        total_concerns,
        missed_concerns,
        false_positives,
        score,
    }
}
