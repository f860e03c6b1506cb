use crate::core::cost::CostModel;
use crate::core::preference::find_unknown_tokens;
use crate::core::reducer::reduce;
use crate::core::report::{capacity_summary, rank_distribution};
use crate::core::slots::expand_slots;
use crate::core::solver::solve;
use crate::domain::model::{ActivityCatalog, AllocationReport, Participant};
use crate::utils::error::{AllocError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorOptions {
    /// Reject tokens that name no configured activity instead of ignoring them.
    pub strict_preferences: bool,
}

/// Runs the whole allocation for one cohort. Holds no state between runs.
#[derive(Debug, Clone)]
pub struct Allocator<'a> {
    catalog: &'a ActivityCatalog,
    options: AllocatorOptions,
}

impl<'a> Allocator<'a> {
    pub fn new(catalog: &'a ActivityCatalog) -> Self {
        Self {
            catalog,
            options: AllocatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AllocatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(&self, participants: &[Participant]) -> Result<AllocationReport> {
        let unknown_tokens = find_unknown_tokens(participants, self.catalog);
        if !unknown_tokens.is_empty() {
            if self.options.strict_preferences {
                let first = &unknown_tokens[0];
                return Err(AllocError::validation(format!(
                    "{} preference token(s) name no configured activity, first: '{}' from '{}' at position {}",
                    unknown_tokens.len(),
                    first.token,
                    first.participant,
                    first.position
                )));
            }
            tracing::warn!(
                "⚠️ Ignoring {} preference token(s) that match no configured activity",
                unknown_tokens.len()
            );
            for unknown in &unknown_tokens {
                tracing::debug!(
                    "Unknown token '{}' from '{}' at position {}",
                    unknown.token,
                    unknown.participant,
                    unknown.position
                );
            }
        }

        let slots = expand_slots(self.catalog);
        let model = CostModel::build(participants, self.catalog);
        let matrix = model.expand(&slots);
        tracing::debug!(
            "Cost matrix: {} participants x {} slots (max score {})",
            matrix.rows(),
            matrix.cols(),
            model.max_score()
        );

        let matching = solve(&matrix);
        tracing::debug!(
            "Solver matched {} pairs, total cost {}",
            matching.pairs.len(),
            matching.total_cost
        );

        let outcome = reduce(
            &matching,
            &matrix,
            &model,
            participants,
            &slots,
            self.catalog,
        );
        let capacity = capacity_summary(self.catalog, &outcome.fill_counts);
        let rank_distribution = rank_distribution(&outcome.assignments);

        Ok(AllocationReport {
            assignments: outcome.assignments,
            unassigned: outcome.unassigned,
            capacity,
            rank_distribution,
            total_cost: matching.total_cost,
            unknown_tokens,
        })
    }
}
