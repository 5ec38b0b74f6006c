//! Featurization of perception snapshots.
use crate::{error::DelveError, PerceptionSnapshot};

/// Converts a [`PerceptionSnapshot`] into the feature vector consumed by the decision model.
///
/// The layout is `[d_0, c_0, d_1, c_1, ..., d_{N-1}, c_{N-1}, target_distance]`, where
/// `d_i` is the normalized distance of probe `i` and `c_i` is
/// [`HitClass::as_feature`](crate::HitClass::as_feature) of its hit class.
/// The same layout must be used at inference and training time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateEncoder {
    num_probes: usize,
}

impl StateEncoder {
    /// Constructs an encoder for snapshots with `num_probes` probes.
    pub fn new(num_probes: usize) -> Self {
        Self { num_probes }
    }

    /// The number of probes a snapshot must have.
    pub fn num_probes(&self) -> usize {
        self.num_probes
    }

    /// Length of the feature vector, `2 * num_probes + 1`.
    pub fn feature_dim(&self) -> usize {
        2 * self.num_probes + 1
    }

    /// Encodes a snapshot.
    ///
    /// Fails with [`DelveError::InvalidInput`] if the snapshot does not have
    /// exactly `num_probes` probes.
    pub fn encode(&self, snapshot: &PerceptionSnapshot) -> Result<Vec<f32>, DelveError> {
        if snapshot.len() != self.num_probes {
            return Err(DelveError::InvalidInput {
                expected: self.num_probes,
                actual: snapshot.len(),
            });
        }

        let mut features = Vec::with_capacity(self.feature_dim());
        for probe in snapshot.probes.iter() {
            features.push(probe.normalized_distance);
            features.push(probe.hit_class.as_feature());
        }
        features.push(snapshot.target_distance);

        Ok(features)
    }
}
