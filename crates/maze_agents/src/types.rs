//! Core data types shared across the environment, learner and path extractor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid coordinate as `(row, column)`.
///
/// Coordinates are signed so that a move off the top or left edge produces a
/// representable (but invalid) position which the grid can then reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Creates a new position.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns this position shifted by `(d_row, d_col)`.
    pub const fn offset(self, delta: (i32, i32)) -> Self {
        Self {
            row: self.row + delta.0,
            col: self.col + delta.1,
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl From<Position> for (i32, i32) {
    fn from(p: Position) -> Self {
        (p.row, p.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
