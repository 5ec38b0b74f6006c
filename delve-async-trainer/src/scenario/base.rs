use super::{ScenarioConfig, ScenarioPolicy, ScenarioStat, ScenarioType};
use crate::{
    Agent, AgentEvent, CoordinatorStat, EpisodeEvent, EpisodeResetOrchestrator, LearnedPolicy,
    ModelHandle, RoundReport, TrainingCoordinator,
};
use anyhow::{anyhow, Result};
use crossbeam_channel::{unbounded, Receiver};
use delve_core::{
    error::DelveError, record::Recorder, DecisionModel, RandomPolicy, RewardShaper, World,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Agents, the training coordinator and the reset orchestrator of one scenario.
///
/// The host drives the scenario by calling [`Scenario::tick`] once per frame.
/// Agents are ticked in parallel; events and round reports are handled on the
/// calling thread afterwards.
pub struct Scenario<M: DecisionModel, W: World> {
    config: ScenarioConfig,
    world: Arc<W>,
    agents: Vec<Agent<ScenarioPolicy<M>>>,
    coordinator: Arc<TrainingCoordinator<M>>,
    orchestrator: EpisodeResetOrchestrator,
    event_receiver: Receiver<AgentEvent>,
    report_receiver: Receiver<RoundReport>,
    stat: ScenarioStat,
}

impl<M, W> Scenario<M, W>
where
    M: DecisionModel + Send,
    M::Config: 'static,
    W: World,
{
    /// Builds a scenario.
    ///
    /// Fails with [`DelveError::Configuration`] on an invalid configuration.
    /// A model which can be neither loaded nor created is not an error: agents
    /// explore until a training round produces one.
    pub fn build(
        config: ScenarioConfig,
        model_config: M::Config,
        world: Arc<W>,
        recorder: Box<dyn Recorder + Send>,
    ) -> Result<Self> {
        config.validate()?;
        let training = config.is_training();

        let model = Arc::new(match config.scenario_type {
            ScenarioType::Random => ModelHandle::empty(),
            ScenarioType::Learning => Self::load_model(&model_config),
        });

        let (event_sender, event_receiver) = unbounded();
        let (report_sender, report_receiver) = unbounded();
        let coordinator = Arc::new(TrainingCoordinator::build(
            &config.coordinator,
            model_config,
            model.clone(),
            &config.policy,
            training,
            recorder,
            report_sender,
        )?);
        let mut orchestrator = EpisodeResetOrchestrator::new(&config.spawn, config.policy.seed)?;

        let mut agents = Vec::with_capacity(config.agent_count());
        for id in 0..config.agent_count() {
            let position = orchestrator.spawn_point()?;
            let actor = world.spawn(&config.spawn.agent_template, position, 0.0)?;
            let seed = config.policy.seed + 1 + id as u64;
            let policy = match config.scenario_type {
                ScenarioType::Random => ScenarioPolicy::Random(RandomPolicy::new(seed)),
                ScenarioType::Learning => ScenarioPolicy::Learned(
                    LearnedPolicy::new(model.clone(), &config.policy, training).with_seed(seed),
                ),
            };
            let mut agent = Agent::new(
                id,
                actor,
                &config.agent,
                &config.policy,
                RewardShaper::new(config.reward.clone()),
                policy,
            );

            let sender = event_sender.clone();
            agent.register_on_reset_callback(move |event| {
                if sender.send(event).is_err() {
                    debug!("Event receiver dropped");
                }
            });
            if training {
                let coordinator = coordinator.clone();
                agent.register_training_data_callback(move |exp| coordinator.ingest(exp));
            }
            if config.shared_policy && config.scenario_type == ScenarioType::Learning {
                let coordinator = coordinator.clone();
                agent.set_action_selector(move |snapshot| coordinator.select_motion(snapshot));
            }
            agents.push(agent);
        }

        orchestrator.reset_scenario(&mut agents, &*world)?;
        info!(
            "Started {:?} scenario with {} agents (training: {})",
            config.scenario_type,
            agents.len(),
            training
        );

        Ok(Self {
            config,
            world,
            agents,
            coordinator,
            orchestrator,
            event_receiver,
            report_receiver,
            stat: ScenarioStat::default(),
        })
    }

    /// Loads the persisted model, or creates a fresh one.
    ///
    /// Returns an empty handle if neither works.
    fn load_model(model_config: &M::Config) -> ModelHandle<M> {
        if M::exists(model_config) {
            match M::load(model_config) {
                Ok(model) => {
                    info!("Loaded the model (version {})", model.version());
                    return ModelHandle::with_model(model, true);
                }
                Err(e) => warn!("Failed to load the model: {}", e),
            }
        }

        match M::create(model_config) {
            Ok(model) => {
                info!("Created a fresh model");
                ModelHandle::with_model(model, false)
            }
            Err(e) => {
                warn!("{}", DelveError::ModelUnavailable(e.to_string()));
                ModelHandle::empty()
            }
        }
    }

    /// Advances all agents by `dt` seconds, then handles their events and finished training rounds.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        let world = &*self.world;
        let n_threads = self.config.tick_threads.max(1);

        if n_threads == 1 || self.agents.len() <= 1 {
            for agent in self.agents.iter_mut() {
                agent.tick(dt, world)?;
            }
        } else {
            let chunk_size = (self.agents.len() + n_threads - 1) / n_threads;
            let results: Vec<Result<()>> = std::thread::scope(|s| {
                let handles = self
                    .agents
                    .chunks_mut(chunk_size)
                    .map(|agents| {
                        s.spawn(move || -> Result<()> {
                            for agent in agents.iter_mut() {
                                agent.tick(dt, world)?;
                            }
                            Ok(())
                        })
                    })
                    .collect::<Vec<_>>();
                handles
                    .into_iter()
                    .map(|h| {
                        h.join()
                            .unwrap_or_else(|_| Err(anyhow!("agent thread panicked")))
                    })
                    .collect()
            });
            for result in results {
                result?;
            }
        }
        self.stat.ticks += 1;

        self.handle_events()?;
        self.handle_reports()
    }

    fn handle_events(&mut self) -> Result<()> {
        let events: Vec<AgentEvent> = self.event_receiver.try_iter().collect();
        let mut restore_scene = false;
        for event in events {
            match event.kind {
                EpisodeEvent::Died => self.stat.deaths += 1,
                EpisodeEvent::FoundGoal => self.stat.goals += 1,
                EpisodeEvent::FoundCollectible(_) => self.stat.collectibles += 1,
            }
            if !event.kind.requests_reset() {
                continue;
            }
            // Without training rounds nothing else restores the goal and the collectibles.
            if !self.config.is_training() {
                restore_scene = true;
            } else if let Some(agent) = self.agents.get_mut(event.agent) {
                self.orchestrator.reset_agent(agent, &*self.world)?;
            }
        }
        if restore_scene {
            debug!("Episode ended outside training, restoring the scene");
            self.orchestrator.reset_scenario(&mut self.agents, &*self.world)?;
        }
        Ok(())
    }

    fn handle_reports(&mut self) -> Result<()> {
        let reports: Vec<RoundReport> = self.report_receiver.try_iter().collect();
        if reports.is_empty() {
            return Ok(());
        }
        for report in reports.iter() {
            self.stat.rounds += 1;
            match report.error.as_ref() {
                None => info!(
                    "Round {} trained on {} experiences, model version {}",
                    report.round, report.batch_size, report.model_version
                ),
                Some(e) => warn!("Round {} failed: {}", report.round, e),
            }
        }
        self.orchestrator
            .reset_scenario(&mut self.agents, &*self.world)
    }

    /// The agents.
    pub fn agents(&self) -> &[Agent<ScenarioPolicy<M>>] {
        &self.agents
    }

    /// The training coordinator.
    pub fn coordinator(&self) -> &Arc<TrainingCoordinator<M>> {
        &self.coordinator
    }

    /// The host world.
    pub fn world(&self) -> &Arc<W> {
        &self.world
    }

    /// Episode stats so far.
    pub fn stat(&self) -> &ScenarioStat {
        &self.stat
    }

    /// Waits for the outstanding training round and returns the stats.
    pub fn shutdown(self) -> (ScenarioStat, CoordinatorStat) {
        self.coordinator.shutdown();
        let coordinator_stat = self.coordinator.stat();
        info!("Stats of the scenario");
        info!("{}", self.stat.fmt());
        info!("Stats of the training coordinator");
        info!("{}", coordinator_stat.fmt());
        (self.stat, coordinator_stat)
    }
}
