//! Discrete movement actions.
use serde::{Deserialize, Serialize};

/// A movement action of an agent.
///
/// The model outputs a continuous value which is discretized with
/// [`Action::from_value`]. The discriminants define that mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Stay in place.
    None = 0,

    /// Move along the forward vector.
    Forward = 1,

    /// Move against the forward vector.
    Backward = 2,

    /// Move against the right vector.
    Left = 3,

    /// Move along the right vector.
    Right = 4,
}

impl Action {
    /// Number of actions.
    pub const COUNT: usize = 5;

    /// All actions in the order of their numeric values.
    pub const ALL: [Action; Self::COUNT] = [
        Action::None,
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
    ];

    /// Discretizes a raw model output.
    ///
    /// `round(value)` is clamped into the valid range; `NaN` maps to [`Action::None`].
    pub fn from_value(value: f32) -> Self {
        if value.is_nan() {
            return Self::None;
        }
        let ix = value.round().clamp(0.0, (Self::COUNT - 1) as f32) as usize;
        Self::ALL[ix]
    }

    /// Returns the action for an index in `0..COUNT`.
    pub fn from_index(ix: usize) -> Option<Self> {
        Self::ALL.get(ix).copied()
    }

    /// The numeric value of the action.
    pub fn as_value(&self) -> f32 {
        *self as usize as f32
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(Action::from_value(0.4), Action::None);
        assert_eq!(Action::from_value(0.6), Action::Forward);
        assert_eq!(Action::from_value(2.49), Action::Backward);
        assert_eq!(Action::from_value(3.5), Action::Right);
        assert_eq!(Action::from_value(-7.0), Action::None);
        assert_eq!(Action::from_value(42.0), Action::Right);
        assert_eq!(Action::from_value(f32::NAN), Action::None);
        assert_eq!(Action::from_value(f32::INFINITY), Action::Right);
    }

    #[test]
    fn test_value_is_consistent_with_discretization() {
        for act in Action::ALL {
            assert_eq!(Action::from_value(act.as_value()), act);
        }
    }
}
