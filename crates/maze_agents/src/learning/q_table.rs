//! Dense Q-table over grid cells and actions.

use crate::action::Action;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::types::Position;
use serde::{Deserialize, Serialize};

/// A `rows × cols × 4` table of action-value estimates, all starting at 0.0.
///
/// Lookups for positions outside the table read as 0.0 and writes to them
/// are ignored. The learner and the path extractor call [`QTable::check_fits`]
/// first, so with a matching grid every visited position is in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: Vec<[f64; Action::COUNT]>,
    rows: usize,
    cols: usize,
}

impl QTable {
    /// Creates a zeroed table with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            values: vec![[0.0; Action::COUNT]; rows * cols],
            rows,
            cols,
        }
    }

    /// Creates a zeroed table sized for `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.rows(), grid.cols())
    }

    /// Fails with [`Error::TableShape`] unless this table has exactly the
    /// dimensions of `grid`.
    pub fn check_fits(&self, grid: &Grid) -> Result<()> {
        if self.rows == grid.rows() && self.cols == grid.cols() {
            return Ok(());
        }
        Err(Error::TableShape {
            table_rows: self.rows,
            table_cols: self.cols,
            grid_rows: grid.rows(),
            grid_cols: grid.cols(),
        })
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (r, c) = (pos.row as usize, pos.col as usize);
        (r < self.rows && c < self.cols).then(|| r * self.cols + c)
    }

    /// All action values at `pos`, in [`Action::ALL`] order.
    pub fn values(&self, pos: Position) -> [f64; Action::COUNT] {
        self.index(pos)
            .map(|i| self.values[i])
            .unwrap_or([0.0; Action::COUNT])
    }

    /// Gets the Q-value for a position-action pair.
    pub fn get(&self, pos: Position, action: Action) -> f64 {
        self.values(pos)[action.index()]
    }

    /// Sets the Q-value for a position-action pair.
    pub fn set(&mut self, pos: Position, action: Action, value: f64) {
        if let Some(i) = self.index(pos) {
            self.values[i][action.index()] = value;
        }
    }

    /// The largest Q-value at `pos`.
    pub fn max_value(&self, pos: Position) -> f64 {
        self.values(pos)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// The action with the largest Q-value at `pos`.
    ///
    /// Ties go to the earliest action in [`Action::ALL`]; a later action only
    /// wins if it is strictly greater.
    pub fn best_action(&self, pos: Position) -> Action {
        let values = self.values(pos);
        let mut best = Action::ALL[0];
        for action in &Action::ALL[1..] {
            if values[action.index()] > values[best.index()] {
                best = *action;
            }
        }
        best
    }

    /// Applies the Q-learning update
    /// `Q(s,a) ← (1−α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))`
    /// and returns the new value.
    pub fn q_learning_update(
        &mut self,
        state: Position,
        action: Action,
        reward: f64,
        next_state: Position,
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let old_q = self.get(state, action);
        let max_next_q = self.max_value(next_state);
        let new_q =
            (1.0 - learning_rate) * old_q + learning_rate * (reward + discount_factor * max_next_q);
        self.set(state, action, new_q);
        new_q
    }

    /// True if every entry is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.values.iter().flatten().all(|&v| v == 0.0)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_zero() {
        let table = QTable::for_grid(&Grid::demo());
        assert!(table.is_zero());
        assert_eq!((table.rows(), table.cols()), (5, 5));
        assert_eq!(table.max_value(Position::new(1, 1)), 0.0);
    }

    #[test]
    fn test_check_fits() {
        let grid = Grid::demo();
        assert!(QTable::for_grid(&grid).check_fits(&grid).is_ok());
        for (rows, cols) in [(2, 2), (5, 4), (6, 5)] {
            assert!(matches!(
                QTable::new(rows, cols).check_fits(&grid),
                Err(Error::TableShape { grid_rows: 5, grid_cols: 5, .. })
            ));
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut table = QTable::new(3, 3);
        let pos = Position::new(1, 2);
        table.set(pos, Action::Left, 0.5);
        assert_eq!(table.get(pos, Action::Left), 0.5);
        assert_eq!(table.get(pos, Action::Right), 0.0);
        assert!(!table.is_zero());
    }

    #[test]
    fn test_out_of_bounds_reads_zero() {
        let mut table = QTable::new(2, 2);
        table.set(Position::new(-1, 0), Action::Up, 3.0);
        assert!(table.is_zero());
        assert_eq!(table.get(Position::new(5, 5), Action::Down), 0.0);
    }

    #[test]
    fn test_best_action_prefers_first_on_tie() {
        let mut table = QTable::new(3, 3);
        let pos = Position::new(1, 1);
        assert_eq!(table.best_action(pos), Action::Up);

        table.set(pos, Action::Down, 1.0);
        table.set(pos, Action::Right, 1.0);
        assert_eq!(table.best_action(pos), Action::Down);

        table.set(pos, Action::Right, 1.5);
        assert_eq!(table.best_action(pos), Action::Right);
    }

    #[test]
    fn test_best_action_with_negative_values() {
        let mut table = QTable::new(3, 3);
        let pos = Position::new(0, 0);
        for action in Action::ALL {
            table.set(pos, action, -1.0);
        }
        table.set(pos, Action::Left, -0.5);
        assert_eq!(table.best_action(pos), Action::Left);
    }

    #[test]
    fn test_q_learning_update() {
        let mut table = QTable::new(3, 3);
        let s = Position::new(1, 1);
        let s2 = Position::new(1, 2);
        table.set(s2, Action::Down, 2.0);

        // 0.9 * 0 + 0.1 * (-0.1 + 0.9 * 2.0) = 0.17
        let q = table.q_learning_update(s, Action::Right, -0.1, s2, 0.1, 0.9);
        assert!((q - 0.17).abs() < 1e-12);
        assert_eq!(table.get(s, Action::Right), q);
    }
}
