use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use crate::util::lock;

/// Stats of [`TrainingCoordinator`](crate::TrainingCoordinator).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoordinatorStat {
    /// The number of ingested experiences.
    pub ingested: usize,

    /// The number of experiences handed over to training rounds.
    pub flushed: usize,

    /// The number of finished training rounds.
    pub rounds: usize,

    /// The number of failed training rounds.
    pub failed_rounds: usize,

    /// Cumulated duration of training rounds.
    pub train_duration: Duration,
}

impl CoordinatorStat {
    /// Returns a formatted string.
    pub fn fmt(&self) -> String {
        let mut s = "ingested, flushed, rounds, failed rounds, training [sec]\n".to_string();
        s += format!(
            "{}, {}, {}, {}, {}\n",
            self.ingested,
            self.flushed,
            self.rounds,
            self.failed_rounds,
            self.train_duration.as_secs_f32()
        )
        .as_str();
        s
    }
}

/// Counters shared between the coordinator and its training jobs.
#[derive(Default)]
pub(crate) struct Counters {
    pub ingested: AtomicUsize,
    pub flushed: AtomicUsize,
    pub rounds: AtomicUsize,
    pub failed_rounds: AtomicUsize,
    pub train_duration: Mutex<Duration>,
}

impl Counters {
    pub fn snapshot(&self) -> CoordinatorStat {
        CoordinatorStat {
            ingested: self.ingested.load(Ordering::Acquire),
            flushed: self.flushed.load(Ordering::Acquire),
            rounds: self.rounds.load(Ordering::Acquire),
            failed_rounds: self.failed_rounds.load(Ordering::Acquire),
            train_duration: *lock(&self.train_duration),
        }
    }
}
