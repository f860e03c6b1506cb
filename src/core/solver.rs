//! Exact minimum-cost bipartite matching.
//!
//! Rows are participants, columns are slots. The matrix is padded to a square
//! with zero-cost dummy rows or columns, so every maximum-cardinality matching
//! of the original matrix corresponds to a perfect matching of the padded one
//! with the same cost. Dummy pairs are dropped from the result.
//!
//! # Algorithm
//! Hungarian method with row/column potentials and shortest augmenting paths
//! (Kuhn 1955, Munkres 1957, in the O(n³) form of Jonker & Volgenant 1987).
//!
//! # Tie-break
//! When several matchings share the minimum cost, the result is the one the
//! shortest augmenting path search reaches first under these fixed rules:
//! rows are admitted one at a time in ascending index order, each search scans
//! columns in ascending index, and a tentative slack or the current minimum is
//! only replaced by a strictly smaller value. Earlier rows may still be moved
//! along an equally cheap augmenting path, so the result is neither
//! lexicographically smallest nor "first come, first served". It depends only
//! on the matrix, never on timing or hashing.

use crate::core::cost::CostMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    /// Pairs sorted by row.
    pub pairs: Vec<MatchedPair>,
    pub unmatched_rows: Vec<usize>,
    pub unmatched_cols: Vec<usize>,
    pub total_cost: i64,
}

impl Matching {
    pub fn col_of(&self, row: usize) -> Option<usize> {
        self.pairs
            .binary_search_by_key(&row, |pair| pair.row)
            .ok()
            .map(|i| self.pairs[i].col)
    }
}

pub fn solve(matrix: &CostMatrix) -> Matching {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    if rows == 0 || cols == 0 {
        return Matching {
            pairs: Vec::new(),
            unmatched_rows: (0..rows).collect(),
            unmatched_cols: (0..cols).collect(),
            total_cost: 0,
        };
    }

    let n = rows.max(cols);
    let cost = |r: usize, c: usize| -> i64 {
        if r < rows && c < cols {
            matrix.get(r, c)
        } else {
            0
        }
    };

    // 1-based indices; column 0 is the virtual root of each search.
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; n + 1];
    let mut row_of_col = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        row_of_col[0] = row;
        let mut j0 = 0usize;
        let mut min_slack = vec![i64::MAX; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = row_of_col[j0];
            let mut delta = i64::MAX;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < min_slack[j] {
                    min_slack[j] = cur;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[row_of_col[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }

            j0 = j1;
            if row_of_col[j0] == 0 {
                break;
            }
        }

        // 沿著 way 回溯，翻轉增廣路徑
        loop {
            let j1 = way[j0];
            row_of_col[j0] = row_of_col[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut col_of_row = vec![None; rows];
    for col in 0..cols {
        let row = row_of_col[col + 1];
        if row >= 1 && row <= rows {
            col_of_row[row - 1] = Some(col);
        }
    }

    let pairs: Vec<MatchedPair> = col_of_row
        .iter()
        .enumerate()
        .filter_map(|(row, col)| col.map(|col| MatchedPair { row, col }))
        .collect();
    let total_cost = pairs.iter().map(|p| matrix.get(p.row, p.col)).sum();

    let mut col_matched = vec![false; cols];
    for pair in &pairs {
        col_matched[pair.col] = true;
    }

    Matching {
        unmatched_rows: (0..rows).filter(|&r| col_of_row[r].is_none()).collect(),
        unmatched_cols: (0..cols).filter(|&c| !col_matched[c]).collect(),
        pairs,
        total_cost,
    }
}
