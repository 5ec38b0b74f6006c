use crate::{error::DelveError, Action, Infer, PerceptionSnapshot, StateEncoder};
use log::warn;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Selects discrete actions by exploration or by querying a decision model.
pub struct ActionPolicy {
    encoder: StateEncoder,
    rng: SmallRng,
}

impl ActionPolicy {
    /// Constructs a policy for snapshots with `num_probes` probes.
    pub fn new(num_probes: usize, seed: u64) -> Self {
        Self {
            encoder: StateEncoder::new(num_probes),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The encoder used before inference.
    pub fn encoder(&self) -> &StateEncoder {
        &self.encoder
    }

    /// Mutable access to the random number generator, e.g., to decide exploration.
    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    /// Returns `(action, action_value)` for a snapshot.
    ///
    /// * `explore == true`: a uniformly random action, its numeric value as `action_value`.
    ///   The model is not consulted.
    /// * no model: `(Action::None, 0.0)`.
    /// * otherwise the raw model output discretized with [`Action::from_value`].
    ///   A failing inference is logged and treated like an absent model.
    ///
    /// Fails only with [`DelveError::InvalidInput`] when exploiting a snapshot
    /// with the wrong number of probes.
    pub fn select_action(
        &mut self,
        snapshot: &PerceptionSnapshot,
        explore: bool,
        model: Option<&dyn Infer>,
    ) -> Result<(Action, f32), DelveError> {
        if explore {
            let ix = self.rng.gen_range(0..Action::COUNT);
            let action = Action::ALL[ix];
            return Ok((action, action.as_value()));
        }

        let model = match model {
            Some(model) => model,
            None => return Ok((Action::None, 0.0)),
        };

        let features = self.encoder.encode(snapshot)?;
        match model.infer(&features) {
            Ok(raw) => Ok((Action::from_value(raw), raw)),
            Err(e) => {
                warn!("Inference failed, falling back to no action: {}", e);
                Ok((Action::None, 0.0))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{HitClass, Probe};
    use anyhow::Result;

    struct Constant(f32);

    impl Infer for Constant {
        fn infer(&self, features: &[f32]) -> Result<f32> {
            assert_eq!(features.len(), 9);
            Ok(self.0)
        }
    }

    struct Broken;

    impl Infer for Broken {
        fn infer(&self, _features: &[f32]) -> Result<f32> {
            anyhow::bail!("no weights")
        }
    }

    fn snapshot(n: usize) -> PerceptionSnapshot {
        PerceptionSnapshot::new(vec![Probe::from_hit(10.0, 100.0, HitClass::Generic); n], 5.0)
    }

    #[test]
    fn test_uniform_exploration() {
        let mut policy = ActionPolicy::new(4, 42);
        let mut counts = [0usize; Action::COUNT];
        for _ in 0..10_000 {
            let (action, value) = policy.select_action(&snapshot(4), true, None).unwrap();
            assert_eq!(value, action.as_value());
            counts[action as usize] += 1;
        }
        // 2000 expected per action, standard deviation 40
        for c in counts {
            assert!((1800..2200).contains(&c), "{:?}", counts);
        }
    }

    #[test]
    fn test_exploration_ignores_model() {
        let mut policy = ActionPolicy::new(4, 0);
        let model = Broken;
        for _ in 0..100 {
            assert!(policy.select_action(&snapshot(4), true, Some(&model)).is_ok());
        }
    }

    #[test]
    fn test_no_model() {
        let mut policy = ActionPolicy::new(4, 0);
        for _ in 0..100 {
            assert_eq!(
                policy.select_action(&snapshot(4), false, None),
                Ok((Action::None, 0.0))
            );
        }
    }

    #[test]
    fn test_exploit() {
        let mut policy = ActionPolicy::new(4, 0);
        let (action, value) = policy
            .select_action(&snapshot(4), false, Some(&Constant(2.7)))
            .unwrap();
        assert_eq!(action, Action::Left);
        assert_eq!(value, 2.7);

        let (action, value) = policy
            .select_action(&snapshot(4), false, Some(&Constant(-3.0)))
            .unwrap();
        assert_eq!(action, Action::None);
        assert_eq!(value, -3.0);
    }

    #[test]
    fn test_inference_failure_is_absorbed() {
        let mut policy = ActionPolicy::new(4, 0);
        assert_eq!(
            policy.select_action(&snapshot(4), false, Some(&Broken)),
            Ok((Action::None, 0.0))
        );
    }

    #[test]
    fn test_invalid_snapshot() {
        let mut policy = ActionPolicy::new(4, 0);
        assert_eq!(
            policy.select_action(&snapshot(3), false, Some(&Constant(1.0))),
            Err(DelveError::InvalidInput {
                expected: 4,
                actual: 3
            })
        );
    }
}
