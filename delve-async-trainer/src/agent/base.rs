use super::AgentConfig;
use crate::{AgentEvent, EpisodeEvent};
use anyhow::Result;
use delve_core::{
    Action, ActorId, AgentId, Contact, Experience, PerceptionSnapshot, Policy, PolicyConfig,
    RewardObservation, RewardShaper, Tag, World,
};
use log::trace;
use std::collections::HashSet;

/// Phase of an [`Agent`] within a decision interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentPhase {
    /// Just spawned or reset, no action chosen yet.
    Idle,

    /// Refreshing the perception.
    Sensing,

    /// Choosing the next action.
    Deciding,

    /// Executing the last chosen action.
    Moving,

    /// Computing the reward of the finished interval.
    Evaluating,

    /// The episode ended, waiting for a reset.
    Terminal,
}

type EventHandler = Box<dyn FnMut(AgentEvent) + Send>;
type ExperienceHandler = Box<dyn FnMut(Experience) + Send>;
type ActionSelector = Box<dyn FnMut(&PerceptionSnapshot) -> Result<(Action, f32)> + Send>;

/// An agent navigating the host world.
///
/// Each call to [`Agent::tick`] either continues the last action or, once the
/// decision interval has elapsed, closes the interval: the shaped reward is
/// computed, one [`Experience`] is emitted and the next action is chosen.
///
/// Touching the goal or a hazard emits a final experience and ends the episode
/// until [`Agent::reset`] is called. Touching a collectible emits an experience
/// and removes the collectible, at most once per collectible and episode.
///
/// Actions are chosen by the policy `P` unless an action selector has been
/// set with [`Agent::set_action_selector`].
pub struct Agent<P: Policy> {
    id: AgentId,
    actor: ActorId,
    config: AgentConfig,
    num_probes: usize,
    max_probe_distance: f32,
    policy: P,
    shaper: RewardShaper,
    phase: AgentPhase,

    /// Time since the last decision.
    elapsed: f32,

    goal: Option<ActorId>,

    /// Most recent perception.
    perception: Option<PerceptionSnapshot>,

    /// Perception at the time the last action was chosen.
    decision_perception: Option<PerceptionSnapshot>,

    last_action: Action,
    last_action_value: f32,

    /// Reward-relevant observation at the last decision.
    prev_obs: Option<RewardObservation>,

    visited: HashSet<ActorId>,

    on_event: Option<EventHandler>,
    on_experience: Option<ExperienceHandler>,
    selector: Option<ActionSelector>,
}

impl<P: Policy> Agent<P> {
    /// Creates an agent controlling `actor`.
    pub fn new(
        id: AgentId,
        actor: ActorId,
        config: &AgentConfig,
        policy_config: &PolicyConfig,
        shaper: RewardShaper,
        policy: P,
    ) -> Self {
        Self {
            id,
            actor,
            config: config.clone(),
            num_probes: policy_config.num_probes,
            max_probe_distance: policy_config.max_probe_distance,
            policy,
            shaper,
            phase: AgentPhase::Idle,
            elapsed: 0.0,
            goal: None,
            perception: None,
            decision_perception: None,
            last_action: Action::None,
            last_action_value: 0.0,
            prev_obs: None,
            visited: HashSet::new(),
            on_event: None,
            on_experience: None,
            selector: None,
        }
    }

    /// Registers the handler of [`AgentEvent`]s.
    ///
    /// Events for which [`EpisodeEvent::requests_reset`] holds ask the owner to
    /// reset the agent.
    pub fn register_on_reset_callback(&mut self, handler: impl FnMut(AgentEvent) + Send + 'static) {
        self.on_event = Some(Box::new(handler));
    }

    /// Registers the consumer of emitted experiences.
    pub fn register_training_data_callback(
        &mut self,
        handler: impl FnMut(Experience) + Send + 'static,
    ) {
        self.on_experience = Some(Box::new(handler));
    }

    /// Replaces the policy by an external action selector.
    pub fn set_action_selector(
        &mut self,
        selector: impl FnMut(&PerceptionSnapshot) -> Result<(Action, f32)> + Send + 'static,
    ) {
        self.selector = Some(Box::new(selector));
    }

    /// Sets the goal whose distance is sensed.
    pub fn set_goal(&mut self, goal: Option<ActorId>) {
        self.goal = goal;
    }

    /// Clears the state of the episode.
    ///
    /// Called after the actor has been repositioned.
    pub fn reset(&mut self) {
        self.visited.clear();
        self.elapsed = 0.0;
        self.phase = AgentPhase::Idle;
        self.perception = None;
        self.decision_perception = None;
        self.prev_obs = None;
        self.last_action = Action::None;
        self.last_action_value = 0.0;
    }

    /// Advances the agent by `dt` seconds.
    pub fn tick(&mut self, dt: f32, world: &dyn World) -> Result<()> {
        match self.phase {
            AgentPhase::Terminal => Ok(()),
            AgentPhase::Idle => {
                let snapshot = self.sense(world);
                self.prev_obs = Some(self.observe(&snapshot, world));
                self.decide(snapshot)
            }
            _ if self.elapsed < self.config.swap_interval => {
                self.phase = AgentPhase::Moving;
                world.move_in_direction(self.actor, self.last_action, self.config.move_speed * dt);
                self.elapsed += dt;

                self.sense(world);
                for contact in world.overlaps(self.actor) {
                    self.handle_contact(contact, world);
                    if self.phase == AgentPhase::Terminal {
                        return Ok(());
                    }
                }
                self.phase = AgentPhase::Moving;
                Ok(())
            }
            _ => {
                self.elapsed = 0.0;
                let snapshot = self.sense(world);

                self.phase = AgentPhase::Evaluating;
                let curr = self.observe(&snapshot, world);
                if let Some(prev) = self.prev_obs.as_ref() {
                    let reward = self.shaper.compute(prev, &curr);
                    self.emit(reward, false);
                }
                self.prev_obs = Some(curr);

                self.decide(snapshot)
            }
        }
    }

    /// Handles an overlap reported by the host.
    pub fn handle_contact(&mut self, contact: Contact, world: &dyn World) {
        if self.phase == AgentPhase::Terminal {
            return;
        }

        match contact.tag {
            Tag::Hazard | Tag::Goal => {
                let curr = self.current_obs(world);
                let prev = self.prev_obs.unwrap_or(curr);
                let reward = self.shaper.contact(contact.tag, &prev, &curr);
                self.emit(reward, true);
                self.phase = AgentPhase::Terminal;
                let kind = match contact.tag {
                    Tag::Hazard => EpisodeEvent::Died,
                    _ => EpisodeEvent::FoundGoal,
                };
                self.notify(kind);
            }
            Tag::Collectible => {
                if self.visited.contains(&contact.actor) {
                    return;
                }
                let curr = self.current_obs(world);
                self.visited.insert(contact.actor);
                let prev = self.prev_obs.unwrap_or(curr);
                let reward = self.shaper.contact(Tag::Collectible, &prev, &curr);
                self.emit(reward, false);
                self.prev_obs = Some(curr);
                world.destroy(contact.actor);
                self.notify(EpisodeEvent::FoundCollectible(contact.actor));
            }
        }
    }

    /// The identifier of the agent.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The actor controlled by the agent.
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// The current phase.
    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    /// The last chosen action and its raw value.
    pub fn last_action(&self) -> (Action, f32) {
        (self.last_action, self.last_action_value)
    }

    /// The most recent perception.
    pub fn perception(&self) -> Option<&PerceptionSnapshot> {
        self.perception.as_ref()
    }

    /// Collectibles visited in the current episode.
    pub fn visited(&self) -> &HashSet<ActorId> {
        &self.visited
    }

    fn decide(&mut self, snapshot: PerceptionSnapshot) -> Result<()> {
        self.phase = AgentPhase::Deciding;
        let (action, value) = match self.selector.as_mut() {
            Some(selector) => selector(&snapshot)?,
            None => self.policy.select(&snapshot)?,
        };
        trace!("agent {} chose {:?} ({})", self.id, action, value);
        self.last_action = action;
        self.last_action_value = value;
        self.decision_perception = Some(snapshot);
        self.phase = AgentPhase::Moving;
        Ok(())
    }

    fn sense(&mut self, world: &dyn World) -> PerceptionSnapshot {
        self.phase = AgentPhase::Sensing;
        let probes = world.cast_probes(
            self.actor,
            self.num_probes,
            self.max_probe_distance,
            &self.visited,
        );
        let snapshot = PerceptionSnapshot::new(probes, self.target_distance(world));
        self.perception = Some(snapshot.clone());
        snapshot
    }

    fn observe(&self, snapshot: &PerceptionSnapshot, world: &dyn World) -> RewardObservation {
        RewardObservation::from_snapshot(snapshot, self.nearest_collectible_distance(world))
    }

    fn current_obs(&self, world: &dyn World) -> RewardObservation {
        match self.perception.as_ref() {
            Some(snapshot) => self.observe(snapshot, world),
            None => RewardObservation {
                target_distance: self.target_distance(world),
                nearest_collectible_distance: self.nearest_collectible_distance(world),
                visible_hazard: false,
                visible_collectible: false,
                visible_goal: false,
            },
        }
    }

    fn target_distance(&self, world: &dyn World) -> f32 {
        let goal = self
            .goal
            .or_else(|| world.find_all_by_tag(Tag::Goal).into_iter().next());
        match (world.position(self.actor), goal.and_then(|g| world.position(g))) {
            (Some(p), Some(g)) => p.distance(&g),
            _ => 0.0,
        }
    }

    fn nearest_collectible_distance(&self, world: &dyn World) -> f32 {
        let origin = match world.position(self.actor) {
            Some(p) => p,
            None => return f32::INFINITY,
        };
        world
            .find_all_by_tag(Tag::Collectible)
            .into_iter()
            .filter(|c| !self.visited.contains(c))
            .filter_map(|c| world.position(c))
            .map(|p| origin.distance(&p))
            .fold(f32::INFINITY, f32::min)
    }

    fn emit(&mut self, reward: f32, is_terminal: bool) {
        let perception = match self
            .decision_perception
            .clone()
            .or_else(|| self.perception.clone())
        {
            Some(p) => p,
            None => return,
        };
        let exp = Experience {
            agent: self.id,
            perception,
            action: self.last_action,
            action_value: self.last_action_value,
            reward,
            is_terminal,
        };
        match self.on_experience.as_mut() {
            Some(handler) => handler(exp),
            None => trace!("agent {} has no training data callback", self.id),
        }
    }

    fn notify(&mut self, kind: EpisodeEvent) {
        let event = AgentEvent {
            agent: self.id,
            kind,
        };
        if let Some(handler) = self.on_event.as_mut() {
            handler(event);
        }
    }
}
