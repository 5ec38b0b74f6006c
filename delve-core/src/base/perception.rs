//! Perception of an agent at a point in time.
use super::{HitClass, Probe};
use serde::{Deserialize, Serialize};

/// Probes of a full sweep around an agent plus the distance to its target.
///
/// Probe `i` always corresponds to the same relative bearing, so that the
/// feature layout is stable across ticks and agents. The number of probes
/// is validated by [`StateEncoder`](crate::StateEncoder).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerceptionSnapshot {
    /// Probes in angular order.
    pub probes: Vec<Probe>,

    /// Distance to the target (goal), not normalized.
    pub target_distance: f32,
}

impl PerceptionSnapshot {
    /// Constructs a snapshot.
    ///
    /// A negative or non-finite target distance is stored as `0`.
    pub fn new(probes: Vec<Probe>, target_distance: f32) -> Self {
        let target_distance = if target_distance.is_finite() {
            target_distance.max(0.0)
        } else {
            0.0
        };

        Self {
            probes,
            target_distance,
        }
    }

    /// Returns the number of probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Returns `true` if the snapshot has no probes.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Returns `true` if any probe hit an object of the given class.
    pub fn sees(&self, class: HitClass) -> bool {
        self.probes.iter().any(|p| p.hit_class == class)
    }
}
