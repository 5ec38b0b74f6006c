use super::{Record, Recorder};
use log::info;

/// Writes each record as a single log line at `info` level.
///
/// Keys are sorted so that lines of successive rounds line up.
#[derive(Default)]
pub struct LogRecorder {
    prefix: String,
}

impl LogRecorder {
    /// Constructs the recorder. `prefix` starts every line.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn format(&self, record: &Record) -> String {
        let mut kvs = record
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>();
        kvs.sort();
        format!("{}{}", self.prefix, kvs.join(", "))
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        info!("{}", self.format(&record));
    }
}
