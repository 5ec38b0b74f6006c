//! Epsilon-greedy policy backed by the shared decision model.
use crate::ModelHandle;
use anyhow::Result;
use delve_core::{
    Action, ActionPolicy, DecisionModel, EpsilonGreedy, Infer, PerceptionSnapshot, Policy,
    PolicyConfig,
};
use std::sync::Arc;

/// A [`Policy`] querying the shared model through a [`ModelHandle`].
///
/// While training, actions are explored with the configured probability.
/// If the exploration fallback is enabled and no trained model is available,
/// every action is explored. Outside training the model is always consulted.
pub struct LearnedPolicy<M> {
    model: Arc<ModelHandle<M>>,
    inner: ActionPolicy,
    exploration_probability: f32,
    exploration_fallback: bool,
    training: bool,
}

impl<M: DecisionModel> LearnedPolicy<M> {
    /// Constructs a policy.
    pub fn new(model: Arc<ModelHandle<M>>, config: &PolicyConfig, training: bool) -> Self {
        Self {
            model,
            inner: ActionPolicy::new(config.num_probes, config.seed),
            exploration_probability: config.exploration_probability,
            exploration_fallback: config.exploration_fallback,
            training,
        }
    }

    /// Overrides the seed-derived random state, e.g., to decorrelate agents.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.inner = ActionPolicy::new(self.inner.encoder().num_probes(), seed);
        self
    }

    /// Probability of exploration in effect for the next decision.
    pub fn effective_exploration(&self) -> f32 {
        if !self.training {
            0.0
        } else if self.exploration_fallback && !self.model.is_ready() {
            1.0
        } else {
            self.exploration_probability
        }
    }

    /// Returns `true` in training mode.
    pub fn is_training(&self) -> bool {
        self.training
    }
}

impl<M: DecisionModel> Policy for LearnedPolicy<M> {
    fn select(&mut self, snapshot: &PerceptionSnapshot) -> Result<(Action, f32)> {
        let eg = EpsilonGreedy::new(self.effective_exploration());
        let explore = eg.should_explore(self.inner.rng());
        let model = self.model.current();
        let model = model.as_deref().map(|m| m as &dyn Infer);
        Ok(self.inner.select_action(snapshot, explore, model)?)
    }
}
