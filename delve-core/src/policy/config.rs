//! Configuration of action selection and sensing.
use crate::error::DelveError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ActionPolicy`](super::ActionPolicy). Read-only at runtime.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PolicyConfig {
    /// Probability of choosing a uniformly random action, in `[0, 1]`.
    pub exploration_probability: f32,

    /// Maximum distance of probes.
    pub max_probe_distance: f32,

    /// Number of probes per sweep.
    pub num_probes: usize,

    /// Fall back to full exploration while no trained model is available.
    pub exploration_fallback: bool,

    /// Seed of the random number generator.
    pub seed: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            exploration_probability: 0.3,
            max_probe_distance: 1000.0,
            num_probes: 16,
            exploration_fallback: true,
            seed: 42,
        }
    }
}

impl PolicyConfig {
    /// Sets the exploration probability.
    pub fn exploration_probability(mut self, v: f32) -> Self {
        self.exploration_probability = v;
        self
    }

    /// Sets the maximum probe distance.
    pub fn max_probe_distance(mut self, v: f32) -> Self {
        self.max_probe_distance = v;
        self
    }

    /// Sets the number of probes.
    pub fn num_probes(mut self, v: usize) -> Self {
        self.num_probes = v;
        self
    }

    /// Enables or disables the exploration fallback.
    pub fn exploration_fallback(mut self, v: bool) -> Self {
        self.exploration_fallback = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Checks the ranges of the parameters.
    pub fn validate(&self) -> Result<(), DelveError> {
        if !(0.0..=1.0).contains(&self.exploration_probability) {
            return Err(DelveError::Configuration(format!(
                "exploration probability must be in [0, 1], got {}",
                self.exploration_probability
            )));
        }
        if !(self.max_probe_distance > 0.0) {
            return Err(DelveError::Configuration(format!(
                "max probe distance must be positive, got {}",
                self.max_probe_distance
            )));
        }
        if self.num_probes == 0 {
            return Err(DelveError::Configuration(
                "number of probes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`PolicyConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PolicyConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
