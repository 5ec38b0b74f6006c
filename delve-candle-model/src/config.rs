//! Configuration of [`NavigatorModel`](crate::NavigatorModel).
use anyhow::Result;
use delve_core::ModelArchitecture;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`NavigatorModel`](crate::NavigatorModel).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct NavigatorConfig {
    /// Architecture of the network.
    pub architecture: ModelArchitecture,

    /// Directory where the model is persisted.
    pub model_dir: Option<String>,

    /// Temperature of advantage weights.
    pub temperature: f32,

    /// Upper bound of advantage weights.
    pub max_weight: f32,

    /// Seed for shuffling mini-batches.
    pub seed: u64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            architecture: ModelArchitecture::navigator(16),
            model_dir: None,
            temperature: 1.0,
            max_weight: 20.0,
            seed: 42,
        }
    }
}

impl NavigatorConfig {
    /// Sets the architecture.
    pub fn architecture(mut self, v: ModelArchitecture) -> Self {
        self.architecture = v;
        self
    }

    /// Sets the directory where the model is persisted.
    pub fn model_dir(mut self, v: impl Into<String>) -> Self {
        self.model_dir = Some(v.into());
        self
    }

    /// Sets the temperature of advantage weights.
    pub fn temperature(mut self, v: f32) -> Self {
        self.temperature = v;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Path of the weights, if `model_dir` is set.
    pub fn weights_path(&self) -> Option<PathBuf> {
        self.model_dir
            .as_ref()
            .map(|dir| Path::new(dir).join("navigator.safetensors"))
    }

    /// Path of the metadata, if `model_dir` is set.
    pub fn meta_path(&self) -> Option<PathBuf> {
        self.model_dir
            .as_ref()
            .map(|dir| Path::new(dir).join("navigator.yaml"))
    }

    /// Constructs [`NavigatorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`NavigatorConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
