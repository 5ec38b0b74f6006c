#![allow(dead_code)]
use anyhow::{bail, Result};
use delve_core::{
    record::{BufferedRecorder, Record, Recorder},
    Action, ActorId, Actors, Contact, DecisionModel, Infer, PerceptionSnapshot, Policy, Probe,
    Sensing, Tag, TrainParams, TrainingBatch, Vec3,
};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

/// A scripted host world.
///
/// Probes are fixed by the test, overlaps are one-shot and movement is along the x axis.
#[derive(Default)]
pub struct MockWorld {
    state: Mutex<WorldState>,
}

#[derive(Default)]
struct WorldState {
    next_id: u64,
    actors: HashMap<ActorId, (Vec3, Option<Tag>)>,
    probes: Vec<Probe>,
    contacts: HashMap<ActorId, Vec<Contact>>,
    ignored: Vec<HashSet<ActorId>>,
    poses: Vec<(ActorId, Vec3, f32)>,
    destroyed: Vec<ActorId>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_probes(&self, probes: Vec<Probe>) {
        self.state.lock().unwrap().probes = probes;
    }

    pub fn push_contact(&self, actor: ActorId, contact: Contact) {
        self.state
            .lock()
            .unwrap()
            .contacts
            .entry(actor)
            .or_default()
            .push(contact);
    }

    pub fn add_tagged(&self, tag: Tag, position: Vec3) -> ActorId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = ActorId(state.next_id);
        state.actors.insert(id, (position, Some(tag)));
        id
    }

    pub fn last_ignored(&self) -> HashSet<ActorId> {
        self.state
            .lock()
            .unwrap()
            .ignored
            .last()
            .cloned()
            .unwrap_or_default()
    }

    pub fn poses(&self) -> Vec<(ActorId, Vec3, f32)> {
        self.state.lock().unwrap().poses.clone()
    }

    pub fn destroyed(&self) -> Vec<ActorId> {
        self.state.lock().unwrap().destroyed.clone()
    }

    pub fn count(&self, tag: Tag) -> usize {
        self.find_all_by_tag(tag).len()
    }
}

impl Sensing for MockWorld {
    fn cast_probes(
        &self,
        _origin: ActorId,
        num_probes: usize,
        _max_distance: f32,
        ignore: &HashSet<ActorId>,
    ) -> Vec<Probe> {
        let mut state = self.state.lock().unwrap();
        state.ignored.push(ignore.clone());
        if state.probes.len() == num_probes {
            state.probes.clone()
        } else {
            vec![Probe::miss(); num_probes]
        }
    }
}

impl Actors for MockWorld {
    fn spawn(&self, template: &str, position: Vec3, _yaw: f32) -> Result<ActorId> {
        let tag = match template {
            "goal" => Some(Tag::Goal),
            "collectible" => Some(Tag::Collectible),
            "hazard" => Some(Tag::Hazard),
            _ => None,
        };
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = ActorId(state.next_id);
        state.actors.insert(id, (position, tag));
        Ok(id)
    }

    fn destroy(&self, actor: ActorId) {
        let mut state = self.state.lock().unwrap();
        if state.actors.remove(&actor).is_some() {
            state.destroyed.push(actor);
        }
    }

    fn position(&self, actor: ActorId) -> Option<Vec3> {
        self.state.lock().unwrap().actors.get(&actor).map(|a| a.0)
    }

    fn find_all_by_tag(&self, tag: Tag) -> Vec<ActorId> {
        let state = self.state.lock().unwrap();
        let mut ids: Vec<ActorId> = state
            .actors
            .iter()
            .filter(|(_, a)| a.1 == Some(tag))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    fn set_pose(&self, actor: ActorId, position: Vec3, yaw: f32) {
        let mut state = self.state.lock().unwrap();
        if let Some(a) = state.actors.get_mut(&actor) {
            a.0 = position;
        }
        state.poses.push((actor, position, yaw));
    }

    fn move_in_direction(&self, actor: ActorId, action: Action, distance: f32) {
        let mut state = self.state.lock().unwrap();
        if let Some(a) = state.actors.get_mut(&actor) {
            match action {
                Action::Forward => a.0.x += distance,
                Action::Backward => a.0.x -= distance,
                Action::Left => a.0.y -= distance,
                Action::Right => a.0.y += distance,
                Action::None => {}
            }
        }
    }

    fn overlaps(&self, actor: ActorId) -> Vec<Contact> {
        self.state
            .lock()
            .unwrap()
            .contacts
            .remove(&actor)
            .unwrap_or_default()
    }
}

/// Always chooses the same action.
pub struct FixedPolicy(pub Action);

impl Policy for FixedPolicy {
    fn select(&mut self, _snapshot: &PerceptionSnapshot) -> Result<(Action, f32)> {
        Ok((self.0, self.0.as_value()))
    }
}

/// How [`MockModel::train`] behaves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrainBehavior {
    Succeed,
    Fail,
    Panic,
}

/// Configuration of [`MockModel`], shared by all forks.
#[derive(Clone)]
pub struct MockConfig {
    pub output: f32,
    pub exists: bool,
    pub create_fails: bool,
    pub train_time: Duration,
    pub behavior: Arc<Mutex<TrainBehavior>>,
    pub intervals: Arc<Mutex<Vec<(Instant, Instant)>>>,
    pub saves: Arc<AtomicUsize>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            output: 1.0,
            exists: false,
            create_fails: false,
            train_time: Duration::from_millis(0),
            behavior: Arc::new(Mutex::new(TrainBehavior::Succeed)),
            intervals: Arc::new(Mutex::new(vec![])),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockConfig {
    pub fn set_behavior(&self, behavior: TrainBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }
}

/// A model recording the time spans of its trainings.
pub struct MockModel {
    config: MockConfig,
    version: usize,
}

impl Infer for MockModel {
    fn infer(&self, _features: &[f32]) -> Result<f32> {
        Ok(self.config.output)
    }
}

impl DecisionModel for MockModel {
    type Config = MockConfig;

    fn exists(config: &Self::Config) -> bool {
        config.exists
    }

    fn load(config: &Self::Config) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            version: 7,
        })
    }

    fn create(config: &Self::Config) -> Result<Self> {
        if config.create_fails {
            bail!("cannot create model");
        }
        Ok(Self {
            config: config.clone(),
            version: 0,
        })
    }

    fn save(&self) -> Result<()> {
        self.config.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn fork(&self) -> Result<Self> {
        Ok(Self {
            config: self.config.clone(),
            version: self.version,
        })
    }

    fn train(&mut self, _batch: &TrainingBatch, _params: &TrainParams) -> Result<()> {
        let start = Instant::now();
        std::thread::sleep(self.config.train_time);
        let behavior = *self.config.behavior.lock().unwrap();
        self.config
            .intervals
            .lock()
            .unwrap()
            .push((start, Instant::now()));
        match behavior {
            TrainBehavior::Succeed => {
                self.version += 1;
                Ok(())
            }
            TrainBehavior::Fail => bail!("diverged"),
            TrainBehavior::Panic => panic!("training exploded"),
        }
    }

    fn version(&self) -> usize {
        self.version
    }
}

/// A recorder whose records stay inspectable after it has been boxed.
#[derive(Clone, Default)]
pub struct SharedRecorder(pub Arc<Mutex<BufferedRecorder>>);

impl Recorder for SharedRecorder {
    fn write(&mut self, record: Record) {
        self.0.lock().unwrap().write(record);
    }
}
