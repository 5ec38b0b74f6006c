use crate::{Action, PerceptionSnapshot, Policy};
use anyhow::Result;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Chooses uniformly random actions regardless of perception.
pub struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    /// Constructs with a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn select(&mut self, _snapshot: &PerceptionSnapshot) -> Result<(Action, f32)> {
        let action = Action::ALL[self.rng.gen_range(0..Action::COUNT)];
        Ok((action, action.as_value()))
    }
}
