use crate::{direction, ray_circle, ray_walls, ArenaConfig};
use anyhow::Result;
use delve_core::{
    error::DelveError, Action, ActorId, Actors, Contact, HitClass, Probe, Sensing, Tag, Vec3,
};
use log::{debug, trace};
use std::{
    collections::{BTreeMap, HashSet},
    sync::{Mutex, MutexGuard, PoisonError},
};

#[derive(Clone, Debug)]
struct Body {
    position: Vec3,
    yaw: f32,
    radius: f32,
    tag: Option<Tag>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    bodies: BTreeMap<ActorId, Body>,
}

fn hit_class(tag: Tag) -> HitClass {
    match tag {
        Tag::Hazard => HitClass::Hazard,
        Tag::Goal => HitClass::Goal,
        Tag::Collectible => HitClass::Collectible,
    }
}

/// A square arena of circular bodies.
///
/// All operations take a lock on the actor registry, so agents may be ticked
/// from several threads.
pub struct Arena {
    config: ArenaConfig,
    registry: Mutex<Registry>,
}

impl Arena {
    /// Builds the arena and places its hazards.
    pub fn build(config: &ArenaConfig) -> Result<Self> {
        if !(config.half_extent > 0.0) {
            return Err(DelveError::Configuration(format!(
                "half_extent must be positive, got {}",
                config.half_extent
            ))
            .into());
        }
        let arena = Self {
            config: config.clone(),
            registry: Mutex::new(Registry::default()),
        };
        for p in config.hazard_points.iter() {
            arena.spawn(&config.hazard_template, *p, 0.0)?;
        }
        debug!("Built arena with {} hazards", config.hazard_points.len());
        Ok(arena)
    }

    /// The configuration.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// The number of bodies.
    pub fn len(&self) -> usize {
        self.registry().bodies.len()
    }

    /// Returns `true` if there is no body.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Yaw of an actor in degrees.
    pub fn yaw(&self, actor: ActorId) -> Option<f32> {
        self.registry().bodies.get(&actor).map(|b| b.yaw)
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Keeps a body of the given radius inside the walls.
    fn clamp(&self, p: Vec3, radius: f32) -> Vec3 {
        let limit = (self.config.half_extent - radius).max(0.0);
        Vec3::new(p.x.clamp(-limit, limit), p.y.clamp(-limit, limit), p.z)
    }
}

impl Sensing for Arena {
    fn cast_probes(
        &self,
        origin: ActorId,
        num_probes: usize,
        max_distance: f32,
        ignore: &HashSet<ActorId>,
    ) -> Vec<Probe> {
        let registry = self.registry();
        let body = match registry.bodies.get(&origin) {
            Some(b) => b,
            None => return vec![Probe::miss(); num_probes],
        };
        let o = body.position;

        (0..num_probes)
            .map(|i| {
                let dir = direction(body.yaw + 360.0 * i as f32 / num_probes as f32);
                let mut nearest = (ray_walls(&o, dir, self.config.half_extent), HitClass::Generic);
                for (id, other) in registry.bodies.iter() {
                    let tag = match other.tag {
                        Some(tag) if *id != origin && !ignore.contains(id) => tag,
                        _ => continue,
                    };
                    if let Some(d) = ray_circle(&o, dir, &other.position, other.radius) {
                        if d < nearest.0 {
                            nearest = (d, hit_class(tag));
                        }
                    }
                }
                if nearest.0 <= max_distance {
                    Probe::from_hit(nearest.0, max_distance, nearest.1)
                } else {
                    Probe::miss()
                }
            })
            .collect()
    }
}

impl Actors for Arena {
    fn spawn(&self, template: &str, position: Vec3, yaw: f32) -> Result<ActorId> {
        let t = self.config.template(template).ok_or_else(|| {
            DelveError::Configuration(format!("unknown template {}", template))
        })?;
        let body = Body {
            position: self.clamp(position, t.radius),
            yaw,
            radius: t.radius,
            tag: t.tag,
        };

        let mut registry = self.registry();
        registry.next_id += 1;
        let id = ActorId(registry.next_id);
        registry.bodies.insert(id, body);
        trace!("Spawned {} as {}", template, id);
        Ok(id)
    }

    fn destroy(&self, actor: ActorId) {
        if self.registry().bodies.remove(&actor).is_some() {
            trace!("Destroyed {}", actor);
        }
    }

    fn position(&self, actor: ActorId) -> Option<Vec3> {
        self.registry().bodies.get(&actor).map(|b| b.position)
    }

    fn find_all_by_tag(&self, tag: Tag) -> Vec<ActorId> {
        self.registry()
            .bodies
            .iter()
            .filter(|(_, b)| b.tag == Some(tag))
            .map(|(id, _)| *id)
            .collect()
    }

    fn set_pose(&self, actor: ActorId, position: Vec3, yaw: f32) {
        let mut registry = self.registry();
        let radius = match registry.bodies.get(&actor) {
            Some(b) => b.radius,
            None => return,
        };
        let position = self.clamp(position, radius);
        if let Some(b) = registry.bodies.get_mut(&actor) {
            b.position = position;
            b.yaw = yaw;
        }
    }

    fn move_in_direction(&self, actor: ActorId, action: Action, distance: f32) {
        let mut registry = self.registry();
        let body = match registry.bodies.get(&actor) {
            Some(b) => b.clone(),
            None => return,
        };
        let (fx, fy) = direction(body.yaw);
        let (dx, dy) = match action {
            Action::None => return,
            Action::Forward => (fx, fy),
            Action::Backward => (-fx, -fy),
            Action::Left => (fy, -fx),
            Action::Right => (-fy, fx),
        };
        let p = Vec3::new(
            body.position.x + dx * distance,
            body.position.y + dy * distance,
            body.position.z,
        );
        let p = self.clamp(p, body.radius);
        if let Some(b) = registry.bodies.get_mut(&actor) {
            b.position = p;
        }
    }

    fn overlaps(&self, actor: ActorId) -> Vec<Contact> {
        let registry = self.registry();
        let body = match registry.bodies.get(&actor) {
            Some(b) => b,
            None => return vec![],
        };
        registry
            .bodies
            .iter()
            .filter(|(id, _)| **id != actor)
            .filter_map(|(id, other)| {
                let tag = other.tag?;
                let touching =
                    body.position.distance(&other.position) < body.radius + other.radius;
                if touching {
                    Some(Contact { actor: *id, tag })
                } else {
                    None
                }
            })
            .collect()
    }
}
