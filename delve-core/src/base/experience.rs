//! Experiences emitted by agents.
use super::{Action, AgentId, PerceptionSnapshot};
use serde::{Deserialize, Serialize};

/// One `(state, action, reward)` tuple of a completed decision interval.
///
/// Ownership moves from the agent to the experience sink on emission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    /// The agent which produced this experience.
    pub agent: AgentId,

    /// Perception at the time the action was chosen.
    pub perception: PerceptionSnapshot,

    /// The discretized action.
    pub action: Action,

    /// The raw value the action was discretized from.
    pub action_value: f32,

    /// Shaped reward of the interval.
    pub reward: f32,

    /// `true` if the experience ends the episode of the agent.
    pub is_terminal: bool,
}

/// Batch of experiences handed over to a training job.
pub type TrainingBatch = Vec<Experience>;

/// Consumer of experiences emitted by agents.
///
/// Implementations must be safe under concurrent callers.
pub trait ExperienceSink: Send + Sync {
    /// Takes ownership of an experience.
    fn ingest(&self, exp: Experience) -> anyhow::Result<()>;
}
