//! Minimum-cost assignment between two word sequences.
//!
//! Reference: Kuhn, H. W. (1955). "The Hungarian method for the
//!            assignment problem"
//!
//! # Time Complexity
//! O(n³) in the matrix dimension
//!
//! Thin wrapper around `pathfinding`'s Kuhn-Munkres implementation.
//! Costs arrive as `f64` (they are integral in practice: unrecognized
//! alignment-column counts) and are scaled to `i64` for the solver.

use pathfinding::kuhn_munkres::{kuhn_munkres_min, Weights};

/// Fixed-point scale applied to float costs before solving.
const COST_SCALE: f64 = 1000.0;

/// Square cost matrix for the Kuhn-Munkres solver.
struct CostMatrix {
    data: Vec<Vec<i64>>,
    size: usize,
}

impl Weights<i64> for CostMatrix {
    fn rows(&self) -> usize {
        self.size
    }

    fn columns(&self) -> usize {
        self.size
    }

    fn at(&self, row: usize, col: usize) -> i64 {
        self.data[row][col]
    }

    fn neg(&self) -> Self {
        let data = self
            .data
            .iter()
            .map(|row| row.iter().map(|&v| -v).collect())
            .collect();
        Self {
            data,
            size: self.size,
        }
    }
}

/// Solve the assignment problem for a square cost matrix.
///
/// Returns the minimum total cost and, for each row, the column it was
/// assigned to.
///
/// # Panics
/// Panics if `costs` is not square. Callers pad rectangular inputs
/// beforehand (see [`PhraseSimilarity`]).
///
/// [`PhraseSimilarity`]: crate::phrase::PhraseSimilarity
pub fn minimum_cost_assignment(costs: &[Vec<f64>]) -> (f64, Vec<usize>) {
    let size = costs.len();
    if size == 0 {
        return (0.0, vec![]);
    }
    assert!(
        costs.iter().all(|row| row.len() == size),
        "cost matrix must be square"
    );

    let data: Vec<Vec<i64>> = costs
        .iter()
        .map(|row| {
            row.iter()
                .map(|&c| (c * COST_SCALE).round() as i64)
                .collect()
        })
        .collect();

    let matrix = CostMatrix { data, size };
    let (total, assignments) = kuhn_munkres_min(&matrix);
    (total as f64 / COST_SCALE, assignments)
}
