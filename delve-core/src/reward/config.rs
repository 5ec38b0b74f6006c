//! Configuration of [`RewardShaper`](super::RewardShaper).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Constants of reward shaping.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RewardConfig {
    /// Added to every decision interval.
    pub step_cost: f32,

    /// Bonus when the goal is visible.
    pub goal_visible_bonus: f32,

    /// Bonus when a collectible, but not the goal, is visible.
    pub collectible_visible_bonus: f32,

    /// Weight of the decrease of the distance to the goal.
    pub goal_progress_weight: f32,

    /// Added when the distance to the goal decreased while the goal was not visible.
    pub blind_progress_penalty: f32,

    /// Weight of the decrease of the distance to the nearest collectible.
    pub collectible_progress_weight: f32,

    /// Reward for touching the goal.
    pub goal_reward: f32,

    /// Reward for touching a hazard.
    pub hazard_reward: f32,

    /// Reward for collecting a collectible, added to the step reward.
    pub collectible_reward: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step_cost: -0.01,
            goal_visible_bonus: 0.2,
            collectible_visible_bonus: 0.1,
            goal_progress_weight: 0.05,
            blind_progress_penalty: -0.1,
            collectible_progress_weight: 0.05,
            goal_reward: 100.0,
            hazard_reward: -100.0,
            collectible_reward: 2.5,
        }
    }
}

impl RewardConfig {
    /// Sets the step cost.
    pub fn step_cost(mut self, v: f32) -> Self {
        self.step_cost = v;
        self
    }

    /// Sets the reward for touching the goal.
    pub fn goal_reward(mut self, v: f32) -> Self {
        self.goal_reward = v;
        self
    }

    /// Sets the reward for touching a hazard.
    pub fn hazard_reward(mut self, v: f32) -> Self {
        self.hazard_reward = v;
        self
    }

    /// Sets the reward for collecting a collectible.
    pub fn collectible_reward(mut self, v: f32) -> Self {
        self.collectible_reward = v;
        self
    }

    /// Constructs [`RewardConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RewardConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
