use anyhow::Result;
use delve_core::{
    Action, ActionPolicy, HitClass, Infer, PerceptionSnapshot, Probe, RewardConfig,
    RewardObservation, RewardShaper,
};
use tempdir::TempDir;
use test_log::test;

/// Outputs the hit class of the first probe.
struct FirstProbeClass;

impl Infer for FirstProbeClass {
    fn infer(&self, features: &[f32]) -> Result<f32> {
        Ok(features[1])
    }
}

fn snapshot(first: HitClass, target_distance: f32) -> PerceptionSnapshot {
    let mut probes = vec![Probe::miss(); 4];
    probes[0] = Probe::from_hit(300.0, 1000.0, first);
    PerceptionSnapshot::new(probes, target_distance)
}

#[test]
fn test_perception_to_action_to_reward() -> Result<()> {
    let mut policy = ActionPolicy::new(4, 0);
    let model = FirstProbeClass;

    let before = snapshot(HitClass::Goal, 1000.0);
    let (action, value) = policy.select_action(&before, false, Some(&model))?;
    assert_eq!((action, value), (Action::Right, 4.0));

    let hazard = snapshot(HitClass::Hazard, 1000.0);
    let (action, _) = policy.select_action(&hazard, false, Some(&model))?;
    assert_eq!(action, Action::Backward);

    let shaper = RewardShaper::new(RewardConfig::default());
    let after = snapshot(HitClass::Goal, 900.0);
    let prev = RewardObservation::from_snapshot(&before, f32::INFINITY);
    let curr = RewardObservation::from_snapshot(&after, f32::INFINITY);
    let reward = shaper.compute(&prev, &curr);
    // step cost, visible goal bonus and progress toward the goal
    assert!((reward - (-0.01 + 0.2 + 0.05 * 100.0)).abs() < 1e-4, "{}", reward);
    Ok(())
}

#[test]
fn test_reward_config_round_trip() -> Result<()> {
    let config = RewardConfig::default().goal_reward(50.0).step_cost(-0.5);
    let dir = TempDir::new("reward_config")?;
    let path = dir.path().join("reward.yaml");
    config.save(&path)?;
    assert_eq!(RewardConfig::load(&path)?, config);
    Ok(())
}
