//! The Q-learning training loop.
//!
//! A [`Learner`] runs episodes against a [`Maze`], choosing moves with its
//! epsilon-greedy policy and folding every transition into a caller-owned
//! [`QTable`]. The table is never reset between episodes.

use crate::action::Action;
use crate::config::LearningConfig;
use crate::error::Result;
use crate::grid::Maze;
use crate::learning::QTable;
use crate::policy::EpsilonGreedy;
use crate::types::Position;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of trailing episodes averaged in [`TrainingSummary::recent_mean_steps`].
const RECENT_WINDOW: usize = 50;

/// One applied learning step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    pub state: Position,
    pub action: Action,
    pub reward: f64,
    pub next_state: Position,
    pub blocked: bool,
    pub done: bool,
    /// The Q-value written for `(state, action)`.
    pub new_q: f64,
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    ReachedGoal,
    StepCapReached,
}

/// Per-episode statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub steps: usize,
    pub total_reward: f64,
    pub outcome: EpisodeOutcome,
}

/// Aggregate statistics for a full training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub goals_reached: usize,
    pub episodes_truncated: usize,
    pub total_updates: u64,
    /// Mean episode length over the last few episodes.
    pub recent_mean_steps: f64,
}

/// Runs Q-learning episodes with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Learner<R: Rng = StdRng> {
    config: LearningConfig,
    policy: EpsilonGreedy<R>,
    total_updates: u64,
    total_episodes: u64,
}

impl Learner<StdRng> {
    /// Creates a learner whose policy is seeded from `config.seed`, or from
    /// the thread RNG when no seed is set.
    pub fn new(config: LearningConfig) -> Self {
        let policy = match config.seed {
            Some(seed) => EpsilonGreedy::seeded(config.epsilon, seed),
            None => EpsilonGreedy::from_entropy(config.epsilon),
        };
        Self::with_policy(config, policy)
    }
}

impl<R: Rng> Learner<R> {
    /// Creates a learner around an existing policy. The policy's epsilon
    /// takes precedence over `config.epsilon`.
    pub fn with_policy(config: LearningConfig, policy: EpsilonGreedy<R>) -> Self {
        Self {
            config,
            policy,
            total_updates: 0,
            total_episodes: 0,
        }
    }

    /// Chooses an action at `state`, applies it, and updates the table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TableShape`] if `table` was not sized for the maze.
    pub fn step(
        &mut self,
        maze: &Maze,
        table: &mut QTable,
        state: Position,
    ) -> Result<StepRecord> {
        table.check_fits(maze.grid())?;
        Ok(self.step_unchecked(maze, table, state))
    }

    /// Applies a specific action at `state` and updates the table.
    ///
    /// Blocked moves are learned from like any other: the penalty is used as
    /// the reward and the agent's own position as the next state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TableShape`] if `table` was not sized for the maze.
    pub fn apply(
        &mut self,
        maze: &Maze,
        table: &mut QTable,
        state: Position,
        action: Action,
    ) -> Result<StepRecord> {
        table.check_fits(maze.grid())?;
        Ok(self.apply_unchecked(maze, table, state, action))
    }

    /// Runs one episode from the maze start until a goal or the step cap.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TableShape`] if `table` was not sized for the maze.
    pub fn run_episode(&mut self, maze: &Maze, table: &mut QTable) -> Result<EpisodeStats> {
        table.check_fits(maze.grid())?;
        Ok(self.episode(maze, table))
    }

    /// Runs `config.episodes` episodes against `table`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TableShape`] if `table` was not sized for the maze.
    pub fn train(&mut self, maze: &Maze, table: &mut QTable) -> Result<TrainingSummary> {
        table.check_fits(maze.grid())?;

        log::info!(
            "Training for {} episodes (alpha={}, gamma={}, epsilon={})",
            self.config.episodes,
            self.config.learning_rate,
            self.config.discount_factor,
            self.policy.epsilon()
        );

        let updates_before = self.total_updates;
        let mut summary = TrainingSummary::default();
        let mut recent = VecDeque::with_capacity(RECENT_WINDOW);

        for episode in 0..self.config.episodes {
            let stats = self.episode(maze, table);
            summary.episodes += 1;
            match stats.outcome {
                EpisodeOutcome::ReachedGoal => summary.goals_reached += 1,
                EpisodeOutcome::StepCapReached => {
                    summary.episodes_truncated += 1;
                    log::warn!(
                        "Episode {} hit the step cap after {} steps",
                        episode,
                        stats.steps
                    );
                }
            }

            if recent.len() == RECENT_WINDOW {
                recent.pop_front();
            }
            recent.push_back(stats.steps);

            log::debug!(
                "Episode {}: {} steps, reward {:.2}",
                episode,
                stats.steps,
                stats.total_reward
            );
        }

        summary.total_updates = self.total_updates - updates_before;
        if !recent.is_empty() {
            summary.recent_mean_steps =
                recent.iter().sum::<usize>() as f64 / recent.len() as f64;
        }

        log::info!(
            "Training finished: {}/{} episodes reached the goal, {} updates",
            summary.goals_reached,
            summary.episodes,
            summary.total_updates
        );
        Ok(summary)
    }

    /// Returns the total number of learning updates performed.
    pub fn total_updates(&self) -> u64 {
        self.total_updates
    }

    /// Returns the total number of episodes completed.
    pub fn total_episodes(&self) -> u64 {
        self.total_episodes
    }

    fn step_unchecked(&mut self, maze: &Maze, table: &mut QTable, state: Position) -> StepRecord {
        let action = self.policy.select(state, table);
        self.apply_unchecked(maze, table, state, action)
    }

    fn apply_unchecked(
        &mut self,
        maze: &Maze,
        table: &mut QTable,
        state: Position,
        action: Action,
    ) -> StepRecord {
        let t = maze.grid().transition(state, action);
        let new_q = table.q_learning_update(
            state,
            action,
            t.reward,
            t.next,
            self.config.learning_rate,
            self.config.discount_factor,
        );
        self.total_updates += 1;

        StepRecord {
            state,
            action,
            reward: t.reward,
            next_state: t.next,
            blocked: t.blocked,
            done: t.done,
            new_q,
        }
    }

    fn episode(&mut self, maze: &Maze, table: &mut QTable) -> EpisodeStats {
        let mut state = maze.start();
        let mut steps = 0;
        let mut total_reward = 0.0;

        let outcome = loop {
            if self.config.max_episode_steps.is_some_and(|cap| steps >= cap) {
                break EpisodeOutcome::StepCapReached;
            }

            let record = self.step_unchecked(maze, table, state);
            steps += 1;
            total_reward += record.reward;
            state = record.next_state;

            if record.done {
                break EpisodeOutcome::ReachedGoal;
            }
        };

        self.total_episodes += 1;
        EpisodeStats {
            steps,
            total_reward,
            outcome,
        }
    }
}
