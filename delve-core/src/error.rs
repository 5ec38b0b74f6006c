//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DelveError {
    /// Invalid setup of a scenario, e.g., an empty set of spawn points.
    ///
    /// This error is fatal and aborts the start of a scenario.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The decision model could not be loaded or created.
    ///
    /// Agents keep running with full exploration.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// A training job failed. The model keeps its last published state.
    #[error("Training job failed: {0}")]
    TrainingJob(String),

    /// A perception snapshot with an unexpected number of probes.
    #[error("Invalid input: expected {expected} probes, got {actual}")]
    InvalidInput {
        /// The configured number of probes.
        expected: usize,

        /// The number of probes in the snapshot.
        actual: usize,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
