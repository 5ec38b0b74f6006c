//! Messages between agents, the training coordinator and the scenario.
use delve_core::{ActorId, AgentId};

/// What happened to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeEvent {
    /// The agent touched a hazard.
    Died,

    /// The agent touched the goal.
    FoundGoal,

    /// The agent collected a collectible, which has been removed from the scene.
    FoundCollectible(ActorId),
}

impl EpisodeEvent {
    /// Returns `true` if the event ends the episode of the agent.
    pub fn requests_reset(&self) -> bool {
        matches!(self, Self::Died | Self::FoundGoal)
    }
}

/// An [`EpisodeEvent`] tagged with the agent it happened to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentEvent {
    /// The agent.
    pub agent: AgentId,

    /// The event.
    pub kind: EpisodeEvent,
}

/// Result of a training round, sent when the round is over.
///
/// Receiving it requests a reset of the whole scenario, regardless of `success`.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundReport {
    /// Round number, starting from 1.
    pub round: usize,

    /// Number of experiences in the batch.
    pub batch_size: usize,

    /// `true` if the trained model has been published.
    pub success: bool,

    /// Generation of the model after the round.
    pub model_version: usize,

    /// The error if the round failed.
    pub error: Option<String>,
}
