use crate::LearnedPolicy;
use anyhow::Result;
use delve_core::{Action, DecisionModel, PerceptionSnapshot, Policy, RandomPolicy};

/// The policy of agents in a [`Scenario`](crate::Scenario), chosen by the scenario type.
pub enum ScenarioPolicy<M> {
    /// Uniformly random actions.
    Random(RandomPolicy),

    /// Epsilon-greedy actions from the shared model.
    Learned(LearnedPolicy<M>),
}

impl<M: DecisionModel> Policy for ScenarioPolicy<M> {
    fn select(&mut self, snapshot: &PerceptionSnapshot) -> Result<(Action, f32)> {
        match self {
            Self::Random(p) => p.select(snapshot),
            Self::Learned(p) => p.select(snapshot),
        }
    }
}
