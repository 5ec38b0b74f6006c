use anyhow::Result;
use delve_core::TrainParams;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`TrainingCoordinator`](crate::TrainingCoordinator).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CoordinatorConfig {
    /// Number of buffered experiences which triggers a training round.
    pub max_batch_size: usize,

    /// Hyperparameters of training rounds.
    pub train: TrainParams,

    /// Persist the model after each successful round.
    pub save_after_round: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 100,
            train: TrainParams::default(),
            save_after_round: true,
        }
    }
}

impl CoordinatorConfig {
    /// Sets the batch size triggering a training round.
    pub fn max_batch_size(mut self, v: usize) -> Self {
        self.max_batch_size = v;
        self
    }

    /// Sets the hyperparameters of training rounds.
    pub fn train(mut self, v: TrainParams) -> Self {
        self.train = v;
        self
    }

    /// Enables or disables saving after each round.
    pub fn save_after_round(mut self, v: bool) -> Self {
        self.save_after_round = v;
        self
    }

    /// Constructs [`CoordinatorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CoordinatorConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
