//! Reward shaping.
mod config;
use crate::{HitClass, PerceptionSnapshot, Tag};
pub use config::RewardConfig;
use serde::{Deserialize, Serialize};

/// Quantities of a perception relevant to reward shaping.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewardObservation {
    /// Distance to the goal.
    pub target_distance: f32,

    /// Distance to the nearest collectible not visited yet.
    ///
    /// [`f32::INFINITY`] when there is none.
    pub nearest_collectible_distance: f32,

    /// A hazard is hit by some probe.
    pub visible_hazard: bool,

    /// A collectible is hit by some probe.
    pub visible_collectible: bool,

    /// The goal is hit by some probe.
    pub visible_goal: bool,
}

impl RewardObservation {
    /// Extracts the observation from a snapshot.
    pub fn from_snapshot(snapshot: &PerceptionSnapshot, nearest_collectible_distance: f32) -> Self {
        Self {
            target_distance: snapshot.target_distance,
            nearest_collectible_distance,
            visible_hazard: snapshot.sees(HitClass::Hazard),
            visible_collectible: snapshot.sees(HitClass::Collectible),
            visible_goal: snapshot.sees(HitClass::Goal),
        }
    }
}

/// Computes shaped rewards of decision intervals.
///
/// All methods are pure functions of their arguments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RewardShaper {
    config: RewardConfig,
}

impl RewardShaper {
    /// Constructs a shaper.
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Reward of an interval which ended without touching anything.
    pub fn compute(&self, prev: &RewardObservation, curr: &RewardObservation) -> f32 {
        let c = &self.config;
        let mut reward = c.step_cost;

        if curr.visible_goal {
            reward += c.goal_visible_bonus;
        } else if curr.visible_collectible {
            reward += c.collectible_visible_bonus;
        }

        let goal_delta = delta(prev.target_distance, curr.target_distance);
        reward += c.goal_progress_weight * goal_delta;
        if !curr.visible_goal && goal_delta > 0.0 {
            reward += c.blind_progress_penalty;
        }

        let collectible_delta = delta(
            prev.nearest_collectible_distance,
            curr.nearest_collectible_distance,
        );
        reward += c.collectible_progress_weight * collectible_delta.max(0.0);

        if reward.is_finite() {
            reward
        } else {
            c.step_cost
        }
    }

    /// Reward of touching a tagged object.
    ///
    /// Goal and hazard replace the step formula. A collectible stacks its
    /// reward on top of the step formula over `(prev, curr)`.
    pub fn contact(&self, tag: Tag, prev: &RewardObservation, curr: &RewardObservation) -> f32 {
        match tag {
            Tag::Goal => self.config.goal_reward,
            Tag::Hazard => self.config.hazard_reward,
            Tag::Collectible => self.compute(prev, curr) + self.config.collectible_reward,
        }
    }
}

// Decrease from `prev` to `curr`, zero if either is not finite.
fn delta(prev: f32, curr: f32) -> f32 {
    let d = prev - curr;
    if d.is_finite() {
        d
    } else {
        0.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn obs(target_distance: f32, visible_goal: bool) -> RewardObservation {
        RewardObservation {
            target_distance,
            nearest_collectible_distance: f32::INFINITY,
            visible_hazard: false,
            visible_collectible: false,
            visible_goal,
        }
    }

    #[test]
    fn test_visible_goal_progress() {
        let shaper = RewardShaper::default();
        let r = shaper.compute(&obs(100.0, true), &obs(90.0, true));
        assert!((r - (-0.01 + 0.2 + 0.05 * 10.0)).abs() < 1e-6);
        assert!(r > 0.2);
    }

    #[test]
    fn test_blind_progress_is_penalized() {
        let shaper = RewardShaper::default();
        let r = shaper.compute(&obs(100.0, false), &obs(90.0, false));
        assert!((r - (-0.01 + 0.5 - 0.1)).abs() < 1e-6);
        let r = shaper.compute(&obs(90.0, false), &obs(100.0, false));
        assert!((r - (-0.01 - 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_collectible_terms() {
        let shaper = RewardShaper::default();
        let mut prev = obs(50.0, false);
        let mut curr = obs(50.0, false);
        prev.nearest_collectible_distance = 30.0;
        curr.nearest_collectible_distance = 10.0;
        curr.visible_collectible = true;
        let r = shaper.compute(&prev, &curr);
        assert!((r - (-0.01 + 0.1 + 1.0)).abs() < 1e-6);

        // Moving away from a collectible is not penalized.
        let r = shaper.compute(&curr, &prev);
        assert!((r - (-0.01)).abs() < 1e-6);

        let r = shaper.contact(Tag::Collectible, &prev, &curr);
        assert!((r - (-0.01 + 0.1 + 1.0 + 2.5)).abs() < 1e-6);
    }

    #[test]
    fn test_terminal_overrides() {
        let shaper = RewardShaper::default();
        for (p, c) in [
            (obs(0.0, false), obs(1e9, true)),
            (obs(f32::NAN, true), obs(3.0, false)),
            (obs(5.0, true), obs(5.0, true)),
        ] {
            assert_eq!(shaper.contact(Tag::Goal, &p, &c), 100.0);
            assert_eq!(shaper.contact(Tag::Hazard, &p, &c), -100.0);
        }
    }

    #[test]
    fn test_purity_and_finiteness() {
        let shaper = RewardShaper::default();
        let prev = obs(f32::INFINITY, false);
        let curr = obs(12.0, true);
        let a = shaper.compute(&prev, &curr);
        let b = shaper.compute(&prev, &curr);
        assert_eq!(a.to_bits(), b.to_bits());
        assert!(a.is_finite());
    }
}
