use anyhow::Result;
use delve_core::Vec3;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Where agents and scene objects are (re)spawned.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SpawnConfig {
    /// Candidate positions of agents. Must not be empty.
    pub spawn_points: Vec<Vec3>,

    /// Candidate positions of the goal.
    pub goal_points: Vec<Vec3>,

    /// Positions of collectibles.
    pub collectible_points: Vec<Vec3>,

    /// Host template of agents.
    pub agent_template: String,

    /// Host template of the goal.
    pub goal_template: String,

    /// Host template of collectibles.
    pub collectible_template: String,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            spawn_points: vec![],
            goal_points: vec![],
            collectible_points: vec![],
            agent_template: "agent".to_string(),
            goal_template: "goal".to_string(),
            collectible_template: "collectible".to_string(),
        }
    }
}

impl SpawnConfig {
    /// Sets the spawn points of agents.
    pub fn spawn_points(mut self, v: Vec<Vec3>) -> Self {
        self.spawn_points = v;
        self
    }

    /// Sets the candidate positions of the goal.
    pub fn goal_points(mut self, v: Vec<Vec3>) -> Self {
        self.goal_points = v;
        self
    }

    /// Sets the positions of collectibles.
    pub fn collectible_points(mut self, v: Vec<Vec3>) -> Self {
        self.collectible_points = v;
        self
    }

    /// Constructs [`SpawnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SpawnConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
