//! Policy.
use super::{Action, PerceptionSnapshot};
use anyhow::Result;

/// Maps a perception to the next action of an agent.
///
/// The second element of the returned tuple is the continuous action value
/// kept as the training target.
pub trait Policy {
    /// Selects an action.
    fn select(&mut self, snapshot: &PerceptionSnapshot) -> Result<(Action, f32)>;
}
