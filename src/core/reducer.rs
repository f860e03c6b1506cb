use crate::core::cost::{CostMatrix, CostModel};
use crate::core::preference::first_position;
use crate::core::solver::Matching;
use crate::domain::model::{AchievedRank, ActivityCatalog, Assignment, Participant, Slot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedOutcome {
    /// In participant input order.
    pub assignments: Vec<Assignment>,
    /// Retained assignments per catalog activity.
    pub fill_counts: Vec<usize>,
    pub unassigned: Vec<String>,
}

/// Keeps only pairs that correspond to a stated preference and recovers the
/// achieved rank of each.
///
/// Pairs at or above the `max_score` threshold were forced by the solver to
/// complete the matching; for reporting purposes the participant is unassigned
/// and the slot is empty.
pub fn reduce(
    matching: &Matching,
    matrix: &CostMatrix,
    model: &CostModel,
    participants: &[Participant],
    slots: &[Slot],
    catalog: &ActivityCatalog,
) -> ReducedOutcome {
    let mut assignments = Vec::new();
    let mut unassigned = Vec::new();
    let mut fill_counts = vec![0usize; catalog.len()];

    for (row, participant) in participants.iter().enumerate() {
        let Some(col) = matching.col_of(row) else {
            unassigned.push(participant.id.clone());
            continue;
        };

        let cost = matrix.get(row, col);
        if !model.is_stated_preference(cost) {
            tracing::debug!(
                "Discarding filler pairing for '{}' (cost {})",
                participant.id,
                cost
            );
            unassigned.push(participant.id.clone());
            continue;
        }

        let slot = slots[col];
        let Some(activity) = catalog.get(slot.activity) else {
            unassigned.push(participant.id.clone());
            continue;
        };

        let rank = match first_position(&participant.preferences, &activity.key) {
            Some(position) => AchievedRank::Ranked(position),
            None => {
                tracing::warn!(
                    "⚠️ '{}' matched to '{}' below the cost threshold but it is not in their list",
                    participant.id,
                    activity.name
                );
                AchievedRank::Unknown
            }
        };

        fill_counts[slot.activity] += 1;
        assignments.push(Assignment {
            participant: participant.id.clone(),
            activity: activity.name.clone(),
            rank,
        });
    }

    ReducedOutcome {
        assignments,
        fill_counts,
        unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::slots::expand_slots;
    use crate::core::solver::{solve, MatchedPair};

    #[test]
    fn test_reduce_drops_filler_pairs() {
        let catalog = ActivityCatalog::new(vec![("x", 1), ("y", 1)]).unwrap();
        let participants = vec![
            Participant::new("a", Some("y")),
            Participant::new("b", None),
        ];
        let slots = expand_slots(&catalog);
        let model = CostModel::build(&participants, &catalog);
        let matrix = model.expand(&slots);
        let matching = solve(&matrix);

        let outcome = reduce(&matching, &matrix, &model, &participants, &slots, &catalog);

        assert_eq!(
            outcome.assignments,
            vec![Assignment {
                participant: "a".to_string(),
                activity: "y".to_string(),
                rank: AchievedRank::Ranked(1),
            }]
        );
        assert_eq!(outcome.fill_counts, vec![0, 1]);
        assert_eq!(outcome.unassigned, vec!["b".to_string()]);
    }

    #[test]
    fn test_inconsistent_pair_gets_unknown_rank() {
        let catalog = ActivityCatalog::new(vec![("x", 1), ("y", 1)]).unwrap();
        let participants = vec![Participant::new("a", Some("x"))];
        let slots = expand_slots(&catalog);
        let model = CostModel::build(&participants, &catalog);
        // 人為製造：y 的成本低於門檻，但 a 的清單裡沒有 y
        let matrix = CostMatrix::from_rows(vec![vec![9, 1]]);
        let matching = Matching {
            pairs: vec![MatchedPair { row: 0, col: 1 }],
            unmatched_rows: vec![],
            unmatched_cols: vec![0],
            total_cost: 1,
        };

        let outcome = reduce(&matching, &matrix, &model, &participants, &slots, &catalog);

        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].rank, AchievedRank::Unknown);
        assert_eq!(outcome.fill_counts, vec![0, 1]);
    }
}
