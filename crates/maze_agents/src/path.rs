//! Greedy path extraction from a trained Q-table.

use crate::error::Result;
use crate::grid::Grid;
use crate::learning::QTable;
use crate::types::Position;
use serde::{Deserialize, Serialize};

/// Why a greedy walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathEnd {
    /// The last position is a goal cell.
    ReachedGoal,
    /// The greedy action pointed into a wall or off the grid, or would not
    /// have moved the walker at all.
    Blocked,
    /// The step cap ran out before reaching a goal.
    StepCapReached,
}

/// The result of a greedy walk: the visited positions, starting with the
/// start position, and the reason the walk ended.
///
/// A walk that fails to reach a goal is an ordinary result. It usually means
/// the table has not converged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreedyPath {
    pub positions: Vec<Position>,
    pub end: PathEnd,
}

impl GreedyPath {
    pub fn reached_goal(&self) -> bool {
        self.end == PathEnd::ReachedGoal
    }

    /// Number of moves taken (one less than the number of positions).
    pub fn moves(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }
}

/// Walks from `start` by always taking the highest-valued action.
///
/// Stops on a goal, on a move that is invalid or makes no progress, or after
/// `step_cap` moves, so the path never holds more than `step_cap + 1`
/// positions. The table is only read.
///
/// # Errors
///
/// Returns [`crate::Error::TableShape`] if `table` was not sized for `grid`.
pub fn extract_greedy_path(
    grid: &Grid,
    table: &QTable,
    start: Position,
    step_cap: usize,
) -> Result<GreedyPath> {
    table.check_fits(grid)?;

    let mut positions = vec![start];
    let mut current = start;

    for _ in 0..step_cap {
        if grid.is_goal(current) {
            return Ok(GreedyPath {
                positions,
                end: PathEnd::ReachedGoal,
            });
        }

        let action = table.best_action(current);
        let next = grid.step(current, action);

        if !grid.is_valid(next) || next == current {
            log::debug!("Greedy walk blocked at {} going {}", current, action);
            return Ok(GreedyPath {
                positions,
                end: PathEnd::Blocked,
            });
        }

        positions.push(next);
        current = next;
    }

    let end = if grid.is_goal(current) {
        PathEnd::ReachedGoal
    } else {
        PathEnd::StepCapReached
    };
    Ok(GreedyPath { positions, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;

    #[test]
    fn test_zero_table_takes_first_action() {
        let grid = Grid::demo();
        let table = QTable::for_grid(&grid);

        // Up from (1,1) hits the wall immediately.
        let path = extract_greedy_path(&grid, &table, Position::new(1, 1), 100).unwrap();
        assert_eq!(path.positions, vec![Position::new(1, 1)]);
        assert_eq!(path.end, PathEnd::Blocked);

        // Up from (3,1) moves twice before hitting the wall.
        let path = extract_greedy_path(&grid, &table, Position::new(3, 1), 100).unwrap();
        assert_eq!(
            path.positions,
            vec![Position::new(3, 1), Position::new(2, 1), Position::new(1, 1)]
        );
        assert!(!path.reached_goal());
    }

    #[test]
    fn test_follows_hand_built_table() {
        let grid = Grid::demo();
        let mut table = QTable::for_grid(&grid);
        table.set(Position::new(1, 1), Action::Right, 1.0);
        table.set(Position::new(1, 2), Action::Down, 1.0);

        let path = extract_greedy_path(&grid, &table, Position::new(1, 1), 100).unwrap();
        assert_eq!(
            path.positions,
            vec![Position::new(1, 1), Position::new(1, 2), Position::new(2, 2)]
        );
        assert!(path.reached_goal());
        assert_eq!(path.moves(), 2);
    }

    #[test]
    fn test_start_on_goal() {
        let grid = Grid::demo();
        let table = QTable::for_grid(&grid);
        let path = extract_greedy_path(&grid, &table, Position::new(2, 2), 10).unwrap();
        assert_eq!(path.positions, vec![Position::new(2, 2)]);
        assert!(path.reached_goal());
    }

    #[test]
    fn test_cycle_is_cut_by_step_cap() {
        let grid = Grid::demo();
        let mut table = QTable::for_grid(&grid);
        // (1,1) -> (1,2) -> (1,1) -> ...
        table.set(Position::new(1, 1), Action::Right, 1.0);
        table.set(Position::new(1, 2), Action::Left, 1.0);

        for cap in [1, 2, 7, 100] {
            let path = extract_greedy_path(&grid, &table, Position::new(1, 1), cap).unwrap();
            assert_eq!(path.positions.len(), cap + 1);
            assert_eq!(path.end, PathEnd::StepCapReached);
        }
    }

    #[test]
    fn test_goal_on_last_allowed_move() {
        let grid = Grid::demo();
        let mut table = QTable::for_grid(&grid);
        table.set(Position::new(1, 1), Action::Right, 1.0);
        table.set(Position::new(1, 2), Action::Down, 1.0);

        let path = extract_greedy_path(&grid, &table, Position::new(1, 1), 2).unwrap();
        assert_eq!(path.positions.len(), 3);
        assert!(path.reached_goal());
    }

    #[test]
    fn test_mismatched_table_is_rejected() {
        let grid = Grid::demo();
        let table = QTable::new(2, 2);
        let result = extract_greedy_path(&grid, &table, Position::new(1, 1), 100);
        assert!(matches!(
            result,
            Err(crate::Error::TableShape { table_rows: 2, table_cols: 2, .. })
        ));
    }
}
