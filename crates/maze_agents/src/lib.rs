//! # Maze Agents
//!
//! Tabular Q-learning for small grid mazes.
//!
//! ## Overview
//!
//! An agent starts in a fixed cell and learns, through repeated episodes, to
//! reach a goal cell:
//! - **Grid** ([`Grid`], [`Maze`]): walls, open cells and goals, with the
//!   transition and reward rules.
//! - **Policy** ([`EpsilonGreedy`]): explores with probability epsilon,
//!   otherwise exploits the current [`QTable`].
//! - **Learner** ([`Learner`]): runs episodes and applies the Q-learning
//!   update after every move.
//! - **Path extraction** ([`extract_greedy_path`]): walks the trained table
//!   greedily from the start.
//!
//! ```text
//!  ┌──────────┐   select    ┌──────────────┐
//!  │  Policy  │◄────────────│   Learner    │
//!  └────┬─────┘             └──┬────────┬──┘
//!       │ reads        update  │        │ transition
//!  ┌────▼─────┐◄──────────────┘   ┌────▼─────┐
//!  │  QTable  │                   │   Grid   │
//!  └────┬─────┘                   └────┬─────┘
//!       └──────────► greedy path ◄─────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use maze_agents::{run, LearningConfig, Maze, Position};
//!
//! let config = LearningConfig::default().with_seed(42);
//! let report = run(&Maze::demo(), &config).unwrap();
//!
//! assert_eq!(report.path.positions[0], Position::new(1, 1));
//! assert!(report.path.reached_goal());
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod grid;
pub mod learning;
pub mod path;
pub mod policy;
pub mod types;

pub use action::Action;
pub use config::{ConfigOverrides, LearningConfig};
pub use error::{Error, Result};
pub use grid::{
    Cell, Grid, Maze, MazeDefinition, Transition, GOAL_REWARD, INVALID_MOVE_PENALTY, STEP_COST,
};
pub use learning::{EpisodeOutcome, EpisodeStats, Learner, QTable, StepRecord, TrainingSummary};
pub use path::{extract_greedy_path, GreedyPath, PathEnd};
pub use policy::EpsilonGreedy;
pub use types::Position;

use serde::{Deserialize, Serialize};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The outcome of a full training run followed by greedy path extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// The maze that was trained on.
    pub maze: MazeDefinition,
    pub summary: TrainingSummary,
    pub path: GreedyPath,
}

/// Trains a fresh Q-table on `maze` and extracts the greedy path from it.
///
/// # Errors
///
/// Returns [`Error::Config`] if `config` fails validation.
pub fn run(maze: &Maze, config: &LearningConfig) -> Result<RunReport> {
    config.validate()?;

    let mut table = QTable::for_grid(maze.grid());
    let mut learner = Learner::new(config.clone());
    let summary = learner.train(maze, &mut table)?;

    let path = extract_greedy_path(maze.grid(), &table, maze.start(), config.path_step_cap)?;
    log::info!(
        "Greedy path has {} positions ({:?})",
        path.positions.len(),
        path.end
    );

    Ok(RunReport {
        maze: maze.definition(),
        summary,
        path,
    })
}
