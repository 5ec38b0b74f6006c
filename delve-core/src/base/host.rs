//! Interfaces of the host simulation.
//!
//! The host owns rendering, physics and the actor lifecycle. The training
//! harness only talks to it through [`Sensing`] and [`Actors`].
use super::{Action, Probe};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

/// Identifier of an actor in the host scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Identifier of an agent, unique within a scenario.
pub type AgentId = usize;

/// A point in the host scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X coordinate.
    pub x: f32,

    /// Y coordinate.
    pub y: f32,

    /// Z coordinate.
    pub z: f32,
}

impl Vec3 {
    /// Constructs a point.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Vec3) -> f32 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Gameplay tags of scene objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Touching it ends the episode with a penalty.
    Hazard,

    /// Touching it ends the episode with a reward.
    Goal,

    /// Touching it gives a small reward and removes it from the scene.
    Collectible,
}

/// An overlap between an agent and a tagged actor, reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    /// The other actor.
    pub actor: ActorId,

    /// Tag of the other actor.
    pub tag: Tag,
}

/// Ray-cast service of the host.
pub trait Sensing: Send + Sync {
    /// Casts `num_probes` probes evenly spread around `origin`.
    ///
    /// Probe `i` is cast at bearing `360 * i / num_probes` degrees relative to the
    /// actor. The origin actor itself and the actors in `ignore` do not occlude probes.
    fn cast_probes(
        &self,
        origin: ActorId,
        num_probes: usize,
        max_distance: f32,
        ignore: &HashSet<ActorId>,
    ) -> Vec<Probe>;
}

/// Actor lifecycle of the host.
pub trait Actors: Send + Sync {
    /// Spawns an actor from a template.
    fn spawn(&self, template: &str, position: Vec3, yaw: f32) -> Result<ActorId>;

    /// Destroys an actor. Unknown actors are ignored.
    fn destroy(&self, actor: ActorId);

    /// Returns the position of an actor, `None` if it does not exist.
    fn position(&self, actor: ActorId) -> Option<Vec3>;

    /// Returns all actors with the given tag.
    fn find_all_by_tag(&self, tag: Tag) -> Vec<ActorId>;

    /// Teleports an actor and sets its orientation.
    fn set_pose(&self, actor: ActorId, position: Vec3, yaw: f32);

    /// Moves an actor by `distance` in the direction of `action`, relative to its orientation.
    fn move_in_direction(&self, actor: ActorId, action: Action, distance: f32);

    /// Returns the tagged actors overlapping with the given actor.
    fn overlaps(&self, actor: ActorId) -> Vec<Contact>;
}

/// A host providing both sensing and the actor lifecycle.
pub trait World: Sensing + Actors {}

impl<T: Sensing + Actors> World for T {}
