//! Exploration decision.
use rand::Rng;

/// Decides whether an action is explored or exploited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpsilonGreedy {
    exploration_probability: f32,
}

impl EpsilonGreedy {
    /// Constructs with the probability of exploration.
    pub fn new(exploration_probability: f32) -> Self {
        Self {
            exploration_probability,
        }
    }

    /// Returns the probability of exploration.
    pub fn exploration_probability(&self) -> f32 {
        self.exploration_probability
    }

    /// Draws one uniform sample `u` in `[0, 1)` and explores if `u < ε`.
    ///
    /// With `ε == 1` this always explores, with `ε == 0` never.
    pub fn should_explore(&self, rng: &mut impl Rng) -> bool {
        if self.exploration_probability >= 1.0 {
            return true;
        }
        let u: f32 = rng.gen();
        u < self.exploration_probability
    }
}
