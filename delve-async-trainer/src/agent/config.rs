use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Agent`](crate::Agent).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AgentConfig {
    /// Length of a decision interval in seconds.
    pub swap_interval: f32,

    /// Movement speed in distance units per second.
    pub move_speed: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            swap_interval: 10.0,
            move_speed: 1000.0,
        }
    }
}

impl AgentConfig {
    /// Sets the length of a decision interval.
    pub fn swap_interval(mut self, v: f32) -> Self {
        self.swap_interval = v;
        self
    }

    /// Sets the movement speed.
    pub fn move_speed(mut self, v: f32) -> Self {
        self.move_speed = v;
        self
    }

    /// Constructs [`AgentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AgentConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
