//! Rank → score → cost translation and the dense cost matrix.

use crate::domain::model::{ActivityCatalog, Participant, Slot};

/// Dense row-major matrix of integer costs, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl CostMatrix {
    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> i64) -> Self {
        let data = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| f(r, c))
            .collect();
        Self { rows, cols, data }
    }

    /// Panics when the rows are ragged; only meant for literal matrices.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|row| row.len() == cols),
            "all rows of a cost matrix must have the same length"
        );
        Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.data[row * self.cols + col]
    }
}

/// Per participant, per activity costs before slot expansion.
#[derive(Debug, Clone)]
pub struct CostModel {
    max_score: i64,
    activities: usize,
    base: Vec<i64>,
}

impl CostModel {
    pub fn build(participants: &[Participant], catalog: &ActivityCatalog) -> Self {
        let max_score = max_score(catalog);
        let scores: Vec<Vec<i64>> = participants
            .iter()
            .map(|p| preference_scores(&p.preferences, catalog))
            .collect();
        let base = scores
            .iter()
            .flat_map(|row| row.iter().map(|score| max_score - score))
            .collect();

        Self {
            max_score,
            activities: catalog.len(),
            base,
        }
    }

    pub fn max_score(&self) -> i64 {
        self.max_score
    }

    pub fn cost(&self, participant: usize, activity: usize) -> i64 {
        self.base[participant * self.activities + activity]
    }

    /// Costs at or above `max_score` mean the activity was never ranked.
    pub fn is_stated_preference(&self, cost: i64) -> bool {
        cost < self.max_score
    }

    /// Participants × slots matrix; slots of one activity share a cost.
    pub fn expand(&self, slots: &[Slot]) -> CostMatrix {
        let participants = if self.activities == 0 {
            0
        } else {
            self.base.len() / self.activities
        };
        CostMatrix::from_fn(participants, slots.len(), |r, c| {
            self.cost(r, slots[c].activity)
        })
    }
}

/// One more than the number of configured activities, so every ranked
/// activity is cheaper than every unranked one.
pub fn max_score(catalog: &ActivityCatalog) -> i64 {
    catalog.len() as i64 + 1
}

/// Score per catalog activity: `L - i` for the first occurrence at position
/// `i`, zero when absent.
pub fn preference_scores(preferences: &[String], catalog: &ActivityCatalog) -> Vec<i64> {
    let len = preferences.len() as i64;
    let mut scores = vec![0i64; catalog.len()];

    for (i, token) in preferences.iter().enumerate() {
        if let Some(position) = catalog.position(token) {
            // 重複的選項以第一次出現為準
            if scores[position] == 0 {
                scores[position] = len - i as i64;
            }
        }
    }

    scores
}
