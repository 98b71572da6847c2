//! Drag-selection state and the straight-line extension rule.

use super::types::{Grid, Position};
use tracing::debug;

/// The cells currently highlighted by an in-progress drag gesture.
///
/// Transient state: created empty when a gesture starts, grown one cell at
/// a time through [`Selection::try_extend`], and cleared when the gesture
/// ends regardless of outcome. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    cells: Vec<Position>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected cells in selection order.
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Number of selected cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cells are selected.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drops all selected cells.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Attempts to append `candidate` to the selection.
    ///
    /// A selection of zero or one cells accepts any in-bounds candidate.
    /// A longer selection accepts the candidate only if the resulting
    /// sequence still lies on one straight line (horizontal, vertical,
    /// or diagonal) walked in unit steps from the first cell: the i-th
    /// cell must equal `first + i·(sign(Δrow), sign(Δcol))`, which rules
    /// out skipped cells, backtracking, and branching.
    ///
    /// Rejection policy: a rejected candidate leaves the selection
    /// unchanged. The gesture keeps its cells and simply stops growing.
    /// Out-of-bounds candidates are rejected outright.
    ///
    /// Returns `true` if the candidate was appended.
    pub fn try_extend(&mut self, candidate: Position, grid: &Grid) -> bool {
        if !grid.contains(candidate) {
            debug!(?candidate, "selection candidate out of bounds");
            return false;
        }
        if !self.cells.is_empty() && !self.accepts(candidate) {
            debug!(?candidate, cells = self.cells.len(), "selection candidate off line");
            return false;
        }
        self.cells.push(candidate);
        true
    }

    /// Whether appending `candidate` keeps the selection on one straight
    /// unit-step line through its first cell.
    fn accepts(&self, candidate: Position) -> bool {
        let first = self.cells[0];
        let delta_row = candidate.row - first.row;
        let delta_col = candidate.col - first.col;

        let horizontal = delta_row == 0 && delta_col != 0;
        let vertical = delta_col == 0 && delta_row != 0;
        let diagonal = delta_row != 0 && delta_row.abs() == delta_col.abs();
        if !(horizontal || vertical || diagonal) {
            return false;
        }

        // The candidate becomes the last cell; walking from the first cell
        // in unit steps must visit every already-selected cell in order
        // and land on the candidate.
        let steps = delta_row.abs().max(delta_col.abs());
        if steps != self.cells.len() as i32 {
            return false;
        }
        let step = Position::new(delta_row.signum(), delta_col.signum());
        self.cells.iter().enumerate().all(|(i, cell)| {
            cell.row == first.row + i as i32 * step.row
                && cell.col == first.col + i as i32 * step.col
        })
    }
}
