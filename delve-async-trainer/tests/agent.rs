mod common;
use common::{FixedPolicy, MockConfig, MockModel, MockWorld};
use crossbeam_channel::unbounded;
use delve_async_trainer::{
    Agent, AgentConfig, AgentEvent, AgentPhase, EpisodeEvent, LearnedPolicy, ModelHandle,
};
use delve_core::{
    Action, Actors, Contact, DecisionModel, Experience, HitClass, Policy, PolicyConfig, Probe,
    RewardShaper, Tag, Vec3,
};
use std::sync::{Arc, Mutex};
use test_log::test;

const NUM_PROBES: usize = 4;

fn policy_config() -> PolicyConfig {
    PolicyConfig::default()
        .num_probes(NUM_PROBES)
        .max_probe_distance(1000.0)
}

fn spawn_agent<P: Policy>(
    world: &MockWorld,
    policy: P,
) -> (Agent<P>, Arc<Mutex<Vec<Experience>>>) {
    let actor = world.spawn("agent", Vec3::new(0.0, 0.0, 0.0), 0.0).unwrap();
    let config = AgentConfig::default().swap_interval(1.0).move_speed(10.0);
    let mut agent = Agent::new(
        0,
        actor,
        &config,
        &policy_config(),
        RewardShaper::default(),
        policy,
    );
    let experiences = Arc::new(Mutex::new(vec![]));
    let sink = experiences.clone();
    agent.register_training_data_callback(move |exp| sink.lock().unwrap().push(exp));
    (agent, experiences)
}

#[test]
fn test_visible_goal_progress_is_rewarded() {
    let world = MockWorld::new();
    let goal = world.add_tagged(Tag::Goal, Vec3::new(100.0, 0.0, 0.0));
    world.set_probes(vec![
        Probe::from_hit(100.0, 1000.0, HitClass::Goal),
        Probe::miss(),
        Probe::from_hit(300.0, 1000.0, HitClass::Generic),
        Probe::miss(),
    ]);
    let (mut agent, experiences) = spawn_agent(&world, FixedPolicy(Action::Forward));
    agent.set_goal(Some(goal));

    agent.tick(1.0, &world).unwrap();
    assert_eq!(agent.phase(), AgentPhase::Moving);
    assert_eq!(agent.perception().unwrap().target_distance, 100.0);
    agent.tick(1.0, &world).unwrap();
    assert!(experiences.lock().unwrap().is_empty());
    agent.tick(1.0, &world).unwrap();

    let experiences = experiences.lock().unwrap();
    assert_eq!(experiences.len(), 1);
    let exp = &experiences[0];
    assert!((exp.reward - (-0.01 + 0.2 + 0.05 * 10.0)).abs() < 1e-5);
    assert!(exp.reward > 0.2);
    assert_eq!(exp.action, Action::Forward);
    assert_eq!(exp.action_value, 1.0);
    assert!(!exp.is_terminal);
    // The perception at the time the action was chosen.
    assert_eq!(exp.perception.target_distance, 100.0);
    assert_eq!(agent.perception().unwrap().target_distance, 90.0);
}

#[test]
fn test_no_model_and_no_exploration() {
    let world = MockWorld::new();
    let handle = Arc::new(ModelHandle::<MockModel>::empty());
    let config = policy_config()
        .exploration_probability(0.0)
        .exploration_fallback(false);
    let policy = LearnedPolicy::new(handle, &config, true);
    let (mut agent, experiences) = spawn_agent(&world, policy);

    for _ in 0..11 {
        agent.tick(1.0, &world).unwrap();
        assert_eq!(agent.last_action(), (Action::None, 0.0));
    }
    let experiences = experiences.lock().unwrap();
    assert_eq!(experiences.len(), 5);
    for exp in experiences.iter() {
        assert_eq!((exp.action, exp.action_value), (Action::None, 0.0));
    }
}

#[test]
fn test_exploration_fallback() {
    let model_config = MockConfig::default();
    let handle = Arc::new(ModelHandle::with_model(
        MockModel::create(&model_config).unwrap(),
        false,
    ));

    let training = LearnedPolicy::new(handle.clone(), &policy_config(), true);
    let live = LearnedPolicy::new(handle.clone(), &policy_config(), false);
    let no_fallback = LearnedPolicy::new(
        handle.clone(),
        &policy_config().exploration_fallback(false),
        true,
    );
    assert_eq!(training.effective_exploration(), 1.0);
    assert_eq!(live.effective_exploration(), 0.0);
    assert_eq!(no_fallback.effective_exploration(), 0.3);

    handle.publish(MockModel::create(&model_config).unwrap());
    assert_eq!(training.effective_exploration(), 0.3);
    assert_eq!(live.effective_exploration(), 0.0);
}

#[test]
fn test_live_play_consults_model() {
    let world = MockWorld::new();
    let model_config = MockConfig {
        output: 3.2,
        ..MockConfig::default()
    };
    let handle = Arc::new(ModelHandle::with_model(
        MockModel::create(&model_config).unwrap(),
        true,
    ));
    let policy = LearnedPolicy::new(handle, &policy_config().exploration_probability(1.0), false);
    let (mut agent, _) = spawn_agent(&world, policy);

    agent.tick(1.0, &world).unwrap();
    assert_eq!(agent.last_action(), (Action::Left, 3.2));
}

#[test]
fn test_hazard_ends_episode() {
    let world = MockWorld::new();
    let hazard = world.add_tagged(Tag::Hazard, Vec3::new(5.0, 0.0, 0.0));
    let (mut agent, experiences) = spawn_agent(&world, FixedPolicy(Action::Forward));
    let (s, r) = unbounded();
    agent.register_on_reset_callback(move |e| s.send(e).unwrap());

    agent.tick(1.0, &world).unwrap();
    world.push_contact(
        agent.actor(),
        Contact {
            actor: hazard,
            tag: Tag::Hazard,
        },
    );
    agent.tick(1.0, &world).unwrap();

    assert_eq!(agent.phase(), AgentPhase::Terminal);
    {
        let experiences = experiences.lock().unwrap();
        assert_eq!(experiences.len(), 1);
        assert_eq!(experiences[0].reward, -100.0);
        assert!(experiences[0].is_terminal);
    }
    assert_eq!(
        r.try_recv().unwrap(),
        AgentEvent {
            agent: 0,
            kind: EpisodeEvent::Died
        }
    );

    // Nothing happens until the agent is reset.
    let position = world.position(agent.actor()).unwrap();
    for _ in 0..5 {
        agent.tick(1.0, &world).unwrap();
    }
    assert_eq!(world.position(agent.actor()).unwrap(), position);
    assert_eq!(experiences.lock().unwrap().len(), 1);

    agent.reset();
    assert_eq!(agent.phase(), AgentPhase::Idle);
    agent.tick(1.0, &world).unwrap();
    assert_eq!(agent.phase(), AgentPhase::Moving);
}

#[test]
fn test_goal_ends_episode() {
    let world = MockWorld::new();
    let goal = world.add_tagged(Tag::Goal, Vec3::new(5.0, 0.0, 0.0));
    let (mut agent, experiences) = spawn_agent(&world, FixedPolicy(Action::Forward));
    let events = Arc::new(Mutex::new(vec![]));
    let sink = events.clone();
    agent.register_on_reset_callback(move |e| sink.lock().unwrap().push(e));

    agent.tick(1.0, &world).unwrap();
    agent.handle_contact(
        Contact {
            actor: goal,
            tag: Tag::Goal,
        },
        &world,
    );

    assert_eq!(experiences.lock().unwrap()[0].reward, 100.0);
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].kind.requests_reset());
}

#[test]
fn test_collectible_is_rewarded_once() {
    let world = MockWorld::new();
    let coin = world.add_tagged(Tag::Collectible, Vec3::new(50.0, 0.0, 0.0));
    let (mut agent, experiences) = spawn_agent(&world, FixedPolicy(Action::Forward));
    let events = Arc::new(Mutex::new(vec![]));
    let sink = events.clone();
    agent.register_on_reset_callback(move |e| sink.lock().unwrap().push(e));

    agent.tick(1.0, &world).unwrap();
    let contact = Contact {
        actor: coin,
        tag: Tag::Collectible,
    };
    world.push_contact(agent.actor(), contact);
    world.push_contact(agent.actor(), contact);
    agent.tick(1.0, &world).unwrap();
    agent.handle_contact(contact, &world);

    {
        let experiences = experiences.lock().unwrap();
        assert_eq!(experiences.len(), 1);
        // step cost, 10 units closer to the collectible, collection
        assert!((experiences[0].reward - (-0.01 + 0.5 + 2.5)).abs() < 1e-5);
        assert!(!experiences[0].is_terminal);
    }
    assert_eq!(world.destroyed(), vec![coin]);
    assert_eq!(
        events.lock().unwrap().clone(),
        vec![AgentEvent {
            agent: 0,
            kind: EpisodeEvent::FoundCollectible(coin)
        }]
    );
    assert_ne!(agent.phase(), AgentPhase::Terminal);
    assert!(agent.visited().contains(&coin));

    // Visited collectibles are excluded from sensing.
    agent.tick(1.0, &world).unwrap();
    assert!(world.last_ignored().contains(&coin));

    agent.reset();
    assert!(agent.visited().is_empty());
}

#[test]
fn test_action_selector_overrides_policy() {
    let world = MockWorld::new();
    let (mut agent, _) = spawn_agent(&world, FixedPolicy(Action::Forward));
    agent.set_action_selector(|snapshot| {
        assert_eq!(snapshot.len(), NUM_PROBES);
        Ok((Action::Right, 4.0))
    });

    agent.tick(1.0, &world).unwrap();
    assert_eq!(agent.last_action(), (Action::Right, 4.0));
    agent.tick(1.0, &world).unwrap();
    assert_eq!(
        world.position(agent.actor()).unwrap(),
        Vec3::new(0.0, 10.0, 0.0)
    );
}
