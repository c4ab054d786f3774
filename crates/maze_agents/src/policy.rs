//! Action selection policies.
//!
//! The epsilon-greedy policy owns its random source so that tests and seeded
//! runs are reproducible; nothing in the crate draws from an ambient RNG.

use crate::action::Action;
use crate::learning::QTable;
use crate::types::Position;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks a random action with probability `epsilon`, otherwise the greedy one.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<R: Rng> {
    epsilon: f64,
    rng: R,
}

impl<R: Rng> EpsilonGreedy<R> {
    /// Creates a policy drawing from `rng`.
    pub fn new(epsilon: f64, rng: R) -> Self {
        Self { epsilon, rng }
    }

    /// Chooses an action for `pos` given the current table.
    pub fn select(&mut self, pos: Position, table: &QTable) -> Action {
        if self.rng.random::<f64>() < self.epsilon {
            Action::ALL[self.rng.random_range(0..Action::COUNT)]
        } else {
            table.best_action(pos)
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl EpsilonGreedy<StdRng> {
    /// Creates a policy backed by a seeded [`StdRng`].
    pub fn seeded(epsilon: f64, seed: u64) -> Self {
        Self::new(epsilon, StdRng::seed_from_u64(seed))
    }

    /// Creates a policy seeded from the thread-local RNG.
    pub fn from_entropy(epsilon: f64) -> Self {
        Self::new(epsilon, StdRng::from_rng(&mut rand::rng()))
    }
}
