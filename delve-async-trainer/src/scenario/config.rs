use crate::{AgentConfig, CoordinatorConfig, SpawnConfig};
use anyhow::Result;
use delve_core::{error::DelveError, PolicyConfig, RewardConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// How agents of a scenario choose their actions.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ScenarioType {
    /// A single agent with uniformly random actions. Nothing is trained.
    Random,

    /// Agents driven by the shared decision model.
    Learning,
}

/// Configuration of [`Scenario`](crate::Scenario).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ScenarioConfig {
    /// Type of the scenario.
    pub scenario_type: ScenarioType,

    /// Collect experiences and train the model while running.
    ///
    /// Without it, a learning scenario is live play: actions always come
    /// from the model and nothing is trained.
    pub live_learning: bool,

    /// The number of agents of a learning scenario.
    pub num_agents: usize,

    /// Route action selection of every agent through the coordinator's shared policy.
    pub shared_policy: bool,

    /// The number of threads ticking agents.
    pub tick_threads: usize,

    /// Action selection and sensing.
    pub policy: PolicyConfig,

    /// Reward shaping.
    pub reward: RewardConfig,

    /// Agents.
    pub agent: AgentConfig,

    /// Training rounds.
    pub coordinator: CoordinatorConfig,

    /// Spawn points and templates.
    pub spawn: SpawnConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            scenario_type: ScenarioType::Learning,
            live_learning: true,
            num_agents: 100,
            shared_policy: false,
            tick_threads: 4,
            policy: PolicyConfig::default(),
            reward: RewardConfig::default(),
            agent: AgentConfig::default(),
            coordinator: CoordinatorConfig::default(),
            spawn: SpawnConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Sets the scenario type.
    pub fn scenario_type(mut self, v: ScenarioType) -> Self {
        self.scenario_type = v;
        self
    }

    /// Enables or disables training while running.
    pub fn live_learning(mut self, v: bool) -> Self {
        self.live_learning = v;
        self
    }

    /// Sets the number of agents.
    pub fn num_agents(mut self, v: usize) -> Self {
        self.num_agents = v;
        self
    }

    /// Enables or disables the shared policy.
    pub fn shared_policy(mut self, v: bool) -> Self {
        self.shared_policy = v;
        self
    }

    /// Sets the number of ticking threads.
    pub fn tick_threads(mut self, v: usize) -> Self {
        self.tick_threads = v;
        self
    }

    /// Sets the policy configuration.
    pub fn policy(mut self, v: PolicyConfig) -> Self {
        self.policy = v;
        self
    }

    /// Sets the reward configuration.
    pub fn reward(mut self, v: RewardConfig) -> Self {
        self.reward = v;
        self
    }

    /// Sets the agent configuration.
    pub fn agent(mut self, v: AgentConfig) -> Self {
        self.agent = v;
        self
    }

    /// Sets the coordinator configuration.
    pub fn coordinator(mut self, v: CoordinatorConfig) -> Self {
        self.coordinator = v;
        self
    }

    /// Sets the spawn configuration.
    pub fn spawn(mut self, v: SpawnConfig) -> Self {
        self.spawn = v;
        self
    }

    /// Returns `true` if experiences are collected and the model is trained.
    pub fn is_training(&self) -> bool {
        self.scenario_type == ScenarioType::Learning && self.live_learning
    }

    /// The number of agents actually spawned.
    pub fn agent_count(&self) -> usize {
        match self.scenario_type {
            ScenarioType::Random => 1,
            ScenarioType::Learning => self.num_agents,
        }
    }

    /// Checks the configuration before a scenario starts.
    pub fn validate(&self) -> Result<(), DelveError> {
        self.policy.validate()?;
        if self.spawn.spawn_points.is_empty() {
            return Err(DelveError::Configuration("no spawn point".into()));
        }
        if self.spawn.goal_points.is_empty() {
            return Err(DelveError::Configuration("no goal point".into()));
        }
        if self.coordinator.max_batch_size == 0 {
            return Err(DelveError::Configuration(
                "max_batch_size must be positive".into(),
            ));
        }
        if self.agent_count() == 0 {
            return Err(DelveError::Configuration("no agent".into()));
        }
        if !(self.agent.swap_interval > 0.0) {
            return Err(DelveError::Configuration(format!(
                "swap interval must be positive, got {}",
                self.agent.swap_interval
            )));
        }
        Ok(())
    }

    /// Constructs [`ScenarioConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ScenarioConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
