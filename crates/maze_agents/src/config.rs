//! Configuration for maze training runs.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters for a Q-learning training run and the greedy path that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// The learning rate (alpha): how far each update moves toward its target.
    pub learning_rate: f64,
    /// The discount factor (gamma) applied to the next state's best value.
    pub discount_factor: f64,
    /// The exploration rate (epsilon). Fixed for the whole run.
    pub epsilon: f64,
    /// Number of training episodes.
    pub episodes: usize,
    /// Upper bound on steps within one episode. `None` runs every episode
    /// until a goal is reached.
    pub max_episode_steps: Option<usize>,
    /// Upper bound on moves taken by the greedy path extractor.
    pub path_step_cap: usize,
    /// Seed for the exploration RNG. `None` seeds from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon: 0.1,
            episodes: 500,
            max_episode_steps: Some(10_000),
            path_step_cap: 100,
            seed: None,
        }
    }
}

impl LearningConfig {
    pub fn with_learning_rate(mut self, alpha: f64) -> Self {
        self.learning_rate = alpha;
        self
    }

    pub fn with_discount_factor(mut self, gamma: f64) -> Self {
        self.discount_factor = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_max_episode_steps(mut self, steps: Option<usize>) -> Self {
        self.max_episode_steps = steps;
        self
    }

    pub fn with_path_step_cap(mut self, cap: usize) -> Self {
        self.path_step_cap = cap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Loads a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&bytes)?;
        config.validate()?;
        log::info!("Loaded learning config from {:?}", path);
        Ok(config)
    }

    /// Checks that every parameter is within its meaningful range.
    ///
    /// ```
    /// # use maze_agents::LearningConfig;
    /// assert!(LearningConfig::default().validate().is_ok());
    /// assert!(LearningConfig::default().with_epsilon(1.5).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::Config(format!(
                "learning rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::Config(format!(
                "discount factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::Config(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        if self.max_episode_steps == Some(0) {
            return Err(Error::Config("max episode steps must be positive".into()));
        }
        if self.path_step_cap == 0 {
            return Err(Error::Config("path step cap must be positive".into()));
        }
        Ok(())
    }
}

/// Individual parameter overrides, typically taken from command-line flags.
///
/// Every `Some` field replaces the matching [`LearningConfig`] field. A
/// `max_episode_steps` of `Some(0)` removes the per-episode cap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub episodes: Option<usize>,
    pub learning_rate: Option<f64>,
    pub discount_factor: Option<f64>,
    pub epsilon: Option<f64>,
    pub seed: Option<u64>,
    pub max_episode_steps: Option<usize>,
    pub path_step_cap: Option<usize>,
}

impl ConfigOverrides {
    /// Applies the overrides on top of `config`. The result is not validated.
    pub fn apply(&self, mut config: LearningConfig) -> LearningConfig {
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(alpha) = self.learning_rate {
            config.learning_rate = alpha;
        }
        if let Some(gamma) = self.discount_factor {
            config.discount_factor = gamma;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(steps) = self.max_episode_steps {
            config.max_episode_steps = (steps > 0).then_some(steps);
        }
        if let Some(cap) = self.path_step_cap {
            config.path_step_cap = cap;
        }
        config
    }

    /// Loads `path` if given, falling back to the defaults, then applies the
    /// overrides and validates the result.
    pub fn resolve(&self, path: Option<&Path>) -> Result<LearningConfig> {
        let base = match path {
            Some(path) => LearningConfig::load_from_file(path)?,
            None => LearningConfig::default(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LearningConfig::default();
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount_factor, 0.9);
        assert_eq!(config.epsilon, 0.1);
        assert_eq!(config.episodes, 500);
        assert_eq!(config.path_step_cap, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let bad = [
            LearningConfig::default().with_learning_rate(0.0),
            LearningConfig::default().with_learning_rate(1.2),
            LearningConfig::default().with_discount_factor(-0.1),
            LearningConfig::default().with_epsilon(f64::NAN),
            LearningConfig::default().with_max_episode_steps(Some(0)),
            LearningConfig::default().with_path_step_cap(0),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(Error::Config(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_uncapped_episodes_are_valid() {
        let config = LearningConfig::default().with_max_episode_steps(None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LearningConfig =
            serde_json::from_str(r#"{ "episodes": 20, "seed": 7 }"#).unwrap();
        assert_eq!(config.episodes, 20);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.max_episode_steps, Some(10_000));
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let config = LearningConfig::default().with_seed(4);
        assert_eq!(ConfigOverrides::default().apply(config.clone()), config);
    }

    #[test]
    fn test_zero_step_cap_override_means_uncapped() {
        let overrides = ConfigOverrides {
            max_episode_steps: Some(0),
            ..Default::default()
        };
        let config = overrides.apply(LearningConfig::default());
        assert_eq!(config.max_episode_steps, None);
        assert!(config.validate().is_ok());

        let overrides = ConfigOverrides {
            max_episode_steps: Some(250),
            ..Default::default()
        };
        let config = overrides.apply(LearningConfig::default().with_max_episode_steps(None));
        assert_eq!(config.max_episode_steps, Some(250));
    }

    #[test]
    fn test_overrides_replace_each_field() {
        let overrides = ConfigOverrides {
            episodes: Some(12),
            learning_rate: Some(0.3),
            discount_factor: Some(0.5),
            epsilon: Some(0.0),
            seed: Some(99),
            max_episode_steps: Some(40),
            path_step_cap: Some(8),
        };
        let config = overrides.apply(LearningConfig::default());
        assert_eq!(config.episodes, 12);
        assert_eq!(config.learning_rate, 0.3);
        assert_eq!(config.discount_factor, 0.5);
        assert_eq!(config.epsilon, 0.0);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.max_episode_steps, Some(40));
        assert_eq!(config.path_step_cap, 8);
    }

    #[test]
    fn test_resolve_validates_overridden_values() {
        let overrides = ConfigOverrides {
            epsilon: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(overrides.resolve(None), Err(Error::Config(_))));

        let overrides = ConfigOverrides {
            episodes: Some(3),
            ..Default::default()
        };
        assert_eq!(overrides.resolve(None).unwrap().episodes, 3);
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = LearningConfig::load_from_file(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
