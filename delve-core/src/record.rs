//! Records of training metrics.
//!
//! A [`Record`] is a set of key-value pairs written to a [`Recorder`] once per
//! training round.
//!
//! ```rust
//! use delve_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("round", 1.0);
//! record.insert("mean_reward", RecordValue::Scalar(-0.01));
//! assert_eq!(record.get_scalar("round").unwrap(), 1.0);
//! ```
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
