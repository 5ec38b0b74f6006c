//! Episode and scenario resets.
mod config;
pub use config::SpawnConfig;

use crate::Agent;
use delve_core::{error::DelveError, ActorId, Policy, Vec3, World};
use log::{debug, info};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

/// Repositions agents and respawns scene objects.
pub struct EpisodeResetOrchestrator {
    config: SpawnConfig,
    rng: SmallRng,

    /// The goal spawned by the last scenario reset.
    goal: Option<ActorId>,

    /// Collectibles spawned by the last scenario reset.
    collectibles: Vec<ActorId>,
}

impl EpisodeResetOrchestrator {
    /// Constructs the orchestrator.
    ///
    /// Fails with [`DelveError::Configuration`] if there is no spawn point.
    pub fn new(config: &SpawnConfig, seed: u64) -> Result<Self, DelveError> {
        if config.spawn_points.is_empty() {
            return Err(DelveError::Configuration("no spawn point".into()));
        }
        Ok(Self {
            config: config.clone(),
            rng: SmallRng::seed_from_u64(seed),
            goal: None,
            collectibles: vec![],
        })
    }

    /// A uniformly chosen spawn point.
    pub fn spawn_point(&mut self) -> Result<Vec3, DelveError> {
        self.config
            .spawn_points
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| DelveError::Configuration("no spawn point".into()))
    }

    /// The goal spawned by the last scenario reset.
    pub fn goal(&self) -> Option<ActorId> {
        self.goal
    }

    /// Moves the agent to a random spawn point with zero orientation and clears its episode state.
    pub fn reset_agent<P: Policy>(
        &mut self,
        agent: &mut Agent<P>,
        world: &dyn World,
    ) -> Result<(), DelveError> {
        let position = self.spawn_point()?;
        world.set_pose(agent.actor(), position, 0.0);
        agent.reset();
        debug!("Reset agent {} at {:?}", agent.id(), position);
        Ok(())
    }

    /// Respawns the goal and every collectible, then resets all agents.
    ///
    /// The goal is placed at a random goal point, one collectible at each collectible point.
    pub fn reset_scenario<P: Policy>(
        &mut self,
        agents: &mut [Agent<P>],
        world: &dyn World,
    ) -> anyhow::Result<()> {
        if let Some(goal) = self.goal.take() {
            world.destroy(goal);
        }
        for c in self.collectibles.drain(..) {
            world.destroy(c);
        }

        if let Some(point) = self.config.goal_points.choose(&mut self.rng).copied() {
            self.goal = Some(world.spawn(&self.config.goal_template, point, 0.0)?);
        }
        for point in self.config.collectible_points.iter() {
            let c = world.spawn(&self.config.collectible_template, *point, 0.0)?;
            self.collectibles.push(c);
        }
        info!(
            "Respawned goal and {} collectibles, resetting {} agents",
            self.collectibles.len(),
            agents.len()
        );

        for agent in agents.iter_mut() {
            agent.set_goal(self.goal);
            self.reset_agent(agent, world)?;
        }
        Ok(())
    }
}
