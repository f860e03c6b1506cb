use crate::domain::model::{ActivityCatalog, Assignment, CapacityRow, RankRow};

pub fn capacity_summary(catalog: &ActivityCatalog, fill_counts: &[usize]) -> Vec<CapacityRow> {
    catalog
        .activities()
        .iter()
        .enumerate()
        .map(|(i, activity)| {
            let filled = fill_counts.get(i).copied().unwrap_or(0);
            CapacityRow {
                activity: activity.name.clone(),
                capacity: activity.capacity,
                filled,
                remaining: activity.capacity.saturating_sub(filled),
            }
        })
        .collect()
}

/// Counts per achieved rank, `1..=max` observed rank with zero rows kept.
///
/// A rank `0` row is prepended only when some assignment has an unknown rank.
pub fn rank_distribution(assignments: &[Assignment]) -> Vec<RankRow> {
    let total = assignments.len();
    let max_rank = assignments
        .iter()
        .map(|a| a.rank.as_number())
        .max()
        .unwrap_or(0);

    let mut counts = vec![0usize; max_rank + 1];
    for assignment in assignments {
        counts[assignment.rank.as_number()] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .filter(|&(rank, count)| rank > 0 || count > 0)
        .map(|(rank, count)| RankRow {
            rank,
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 10000.0 / total as f64).round() / 100.0
}
