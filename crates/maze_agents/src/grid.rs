//! The grid environment: a static map of walls, open cells and goals.
//!
//! The environment is purely functional. It answers whether a position is
//! legal, where an action leads, and what reward a move earns; it never holds
//! the agent's position itself.

use crate::action::Action;
use crate::error::{Error, Result};
use crate::types::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Reward for entering a goal cell.
pub const GOAL_REWARD: f64 = 10.0;
/// Reward for entering any other legal cell.
pub const STEP_COST: f64 = -0.1;
/// Reward for attempting to move into a wall or off the grid.
pub const INVALID_MOVE_PENALTY: f64 = -1.0;

/// The type of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Open,
    Goal,
}

impl Cell {
    /// The numeric code used in maze definitions.
    pub const fn code(self) -> u8 {
        match self {
            Cell::Wall => 0,
            Cell::Open => 1,
            Cell::Goal => 9,
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Open => '.',
            Cell::Goal => 'G',
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Cell::Wall),
            1 => Ok(Cell::Open),
            9 => Ok(Cell::Goal),
            other => Err(Error::InvalidGrid(format!("unknown cell code {}", other))),
        }
    }
}

/// The outcome of attempting one action from one position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Where the agent ends up. Equals the origin for invalid moves.
    pub next: Position,
    /// The reward (or penalty) for this move.
    pub reward: f64,
    /// Whether `next` is a goal cell, ending the episode.
    pub done: bool,
    /// Whether the move was rejected as hitting a wall or leaving the grid.
    pub blocked: bool,
}

/// An immutable rectangular grid of cells with at least one goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Builds a grid from rows of cells.
    ///
    /// Fails if the grid is empty, ragged, or has no goal cell.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(Error::InvalidGrid("grid has no cells".into()));
        }

        let mut cells = Vec::with_capacity(height * width);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(Error::InvalidGrid(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    width
                )));
            }
            cells.extend(row);
        }

        if !cells.contains(&Cell::Goal) {
            return Err(Error::InvalidGrid("grid has no goal cell".into()));
        }

        Ok(Self {
            cells,
            rows: height,
            cols: width,
        })
    }

    /// Builds a grid from numeric cell codes (`0` wall, `1` open, `9` goal).
    pub fn from_codes(codes: &[Vec<u8>]) -> Result<Self> {
        let rows = codes
            .iter()
            .map(|row| row.iter().map(|&c| Cell::try_from(c)).collect())
            .collect::<Result<Vec<Vec<Cell>>>>()?;
        Self::from_rows(rows)
    }

    /// The 5×5 demo maze: a wall ring around a 3×3 open area with the goal
    /// in the centre.
    pub fn demo() -> Self {
        use Cell::{Goal as G, Open as O, Wall as W};
        Self {
            cells: vec![
                W, W, W, W, W, //
                W, O, O, O, W, //
                W, O, G, O, W, //
                W, O, O, O, W, //
                W, W, W, W, W, //
            ],
            rows: 5,
            cols: 5,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Flat index of an in-bounds position.
    pub(crate) fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (r, c) = (pos.row as usize, pos.col as usize);
        (r < self.rows && c < self.cols).then(|| r * self.cols + c)
    }

    /// The cell at `pos`, or `None` when out of bounds.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// True if `pos` is in bounds and not a wall.
    pub fn is_valid(&self, pos: Position) -> bool {
        matches!(self.cell(pos), Some(Cell::Open | Cell::Goal))
    }

    pub fn is_goal(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Goal)
    }

    /// Applies an action's delta without any bounds checking.
    ///
    /// The result may be off the grid or inside a wall; callers validate it
    /// with [`Grid::is_valid`].
    pub fn step(&self, pos: Position, action: Action) -> Position {
        pos.offset(action.delta())
    }

    /// Reward for entering `pos`: [`GOAL_REWARD`] on a goal, [`STEP_COST`]
    /// everywhere else.
    pub fn reward(&self, pos: Position) -> f64 {
        if self.is_goal(pos) {
            GOAL_REWARD
        } else {
            STEP_COST
        }
    }

    /// Resolves one move, including the invalid-move rule: a blocked move
    /// earns [`INVALID_MOVE_PENALTY`] and leaves the agent where it was.
    pub fn transition(&self, pos: Position, action: Action) -> Transition {
        let candidate = self.step(pos, action);
        let (next, reward, blocked) = if self.is_valid(candidate) {
            (candidate, self.reward(candidate), false)
        } else {
            (pos, INVALID_MOVE_PENALTY, true)
        };

        Transition {
            next,
            reward,
            done: self.is_goal(next),
            blocked,
        }
    }

    /// Iterates over every legal (non-wall) position in row-major order.
    pub fn valid_positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols).filter_map(move |c| {
                let pos = Position::new(r as i32, c as i32);
                self.is_valid(pos).then_some(pos)
            })
        })
    }

    /// Renders the grid with `path` overlaid: `S` for its first position and
    /// `*` for the rest (goals keep their `G`).
    pub fn render_path(&self, path: &[Position]) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                let pos = Position::new(r as i32, c as i32);
                let cell = self.cells[r * self.cols + c];
                let ch = match path.iter().position(|p| *p == pos) {
                    _ if cell == Cell::Goal => 'G',
                    Some(0) => 'S',
                    Some(_) => '*',
                    None => cell.symbol(),
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_path(&[]))
    }
}

/// A serializable maze description, as read from a JSON file.
///
/// ```json
/// { "cells": [[0,0,0],[0,1,0],[0,9,0]], "start": [1, 1] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeDefinition {
    pub cells: Vec<Vec<u8>>,
    pub start: Position,
}

/// A grid together with the agent's start position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    start: Position,
}

impl Maze {
    /// Pairs a grid with a start position, which must be an open cell.
    pub fn new(grid: Grid, start: Position) -> Result<Self> {
        let reason = match grid.cell(start) {
            None => Some("out of bounds"),
            Some(Cell::Wall) => Some("cell is a wall"),
            Some(Cell::Goal) => Some("cell is a goal"),
            Some(Cell::Open) => None,
        };
        if let Some(reason) = reason {
            return Err(Error::InvalidStart {
                row: start.row,
                col: start.col,
                reason: reason.to_string(),
            });
        }
        Ok(Self { grid, start })
    }

    /// The demo maze, starting in the top-left open cell `(1, 1)`.
    pub fn demo() -> Self {
        Self {
            grid: Grid::demo(),
            start: Position::new(1, 1),
        }
    }

    pub fn from_definition(def: &MazeDefinition) -> Result<Self> {
        Self::new(Grid::from_codes(&def.cells)?, def.start)
    }

    /// The serializable form of this maze, using the same cell codes that
    /// [`Maze::from_definition`] accepts.
    pub fn definition(&self) -> MazeDefinition {
        let cells = self
            .grid
            .cells
            .chunks(self.grid.cols)
            .map(|row| row.iter().map(|cell| cell.code()).collect())
            .collect();
        MazeDefinition {
            cells,
            start: self.start,
        }
    }

    /// Loads a [`MazeDefinition`] from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let def: MazeDefinition = serde_json::from_slice(&bytes)?;
        let maze = Self::from_definition(&def)?;
        log::info!(
            "Loaded {}x{} maze from {:?}",
            maze.grid.rows(),
            maze.grid.cols(),
            path
        );
        Ok(maze)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Position {
        self.start
    }
}
