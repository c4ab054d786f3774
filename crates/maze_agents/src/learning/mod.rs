//! Learning module for maze agents.
//!
//! - [`QTable`]: a dense action-value table over every grid cell.
//! - [`Learner`]: the Q-learning loop that fills the table by running episodes.
//!
//! ```rust
//! use maze_agents::learning::{Learner, QTable};
//! use maze_agents::{LearningConfig, Maze};
//!
//! let maze = Maze::demo();
//! let mut table = QTable::for_grid(maze.grid());
//!
//! let config = LearningConfig::default().with_episodes(50).with_seed(1);
//! let mut learner = Learner::new(config);
//! let summary = learner.train(&maze, &mut table).unwrap();
//!
//! assert_eq!(summary.episodes, 50);
//! ```

pub mod engine;
pub mod q_table;

pub use engine::{EpisodeOutcome, EpisodeStats, Learner, StepRecord, TrainingSummary};
pub use q_table::QTable;
