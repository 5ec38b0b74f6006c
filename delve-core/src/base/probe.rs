//! Radial distance probes.
use serde::{Deserialize, Serialize};

/// Classification of what a probe hit.
///
/// The numeric value of each class is part of the feature layout
/// consumed by the decision model, see [`HitClass::as_feature`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitClass {
    /// The probe reached its maximum distance without hitting anything.
    None,

    /// The probe hit geometry without a known tag, e.g., a wall.
    Generic,

    /// The probe hit a hazard.
    Hazard,

    /// The probe hit a collectible.
    Collectible,

    /// The probe hit the goal.
    Goal,
}

impl HitClass {
    /// Returns the value of this class in the feature vector.
    pub fn as_feature(&self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Generic => 1.0,
            Self::Hazard => 2.0,
            Self::Collectible => 3.0,
            Self::Goal => 4.0,
        }
    }
}

impl Default for HitClass {
    fn default() -> Self {
        Self::None
    }
}

/// A single radial distance sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    /// Distance to the first hit divided by the maximum probe distance, in `[0, 1]`.
    pub normalized_distance: f32,

    /// What the probe hit.
    pub hit_class: HitClass,
}

impl Probe {
    /// Creates a probe from a raw hit distance.
    ///
    /// The distance is normalized by `max_distance` and clamped into `[0, 1]`.
    /// `max_distance` must be positive.
    pub fn from_hit(distance: f32, max_distance: f32, hit_class: HitClass) -> Self {
        let normalized_distance = if distance.is_finite() {
            (distance / max_distance).clamp(0.0, 1.0)
        } else {
            1.0
        };

        Self {
            normalized_distance,
            hit_class,
        }
    }

    /// A probe that hit nothing within its range.
    pub fn miss() -> Self {
        Self {
            normalized_distance: 1.0,
            hit_class: HitClass::None,
        }
    }
}
