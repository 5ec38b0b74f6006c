use super::{stat::Counters, CoordinatorConfig, CoordinatorStat};
use crate::{util::lock, LearnedPolicy, ModelHandle, RoundReport};
use anyhow::Result;
use chrono::Local;
use delve_core::{
    error::DelveError,
    record::{Record, RecordValue, Recorder},
    Action, DecisionModel, Experience, ExperienceSink, PerceptionSnapshot, Policy, PolicyConfig,
    TrainParams, TrainingBatch,
};
use crossbeam_channel::Sender;
use log::{debug, info, warn};
use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Collects experiences from all agents and trains the shared model in the background.
///
/// ```mermaid
/// flowchart LR
///   A1[Agent 1]-- Experience -->B[(buffer)]
///   A2[Agent N]-- Experience -->B
///   B-- swap when full -->J[training job]
///   J-- fork, train, publish -->M[ModelHandle]
///   M-- snapshot -->A1
///   M-- snapshot -->A2
///   J-- RoundReport -->S[Scenario]
/// ```
///
/// Appending an experience, checking the size of the buffer and swapping it
/// out happen under one lock, so that concurrent agents neither lose
/// experiences nor trigger two flushes for the same threshold crossing.
/// Ingestion continues into the fresh buffer while a round is trained.
///
/// At most one training job is in flight. A flush waits for the previous job
/// to finish before starting the next one, blocking the agent which
/// triggered it. Jobs train a fork of the current model and publish it when
/// done, so inference never races with a weight update. A failed or panicking
/// job leaves the published model untouched and still releases the job slot.
///
/// Dropping the coordinator waits for the outstanding job.
pub struct TrainingCoordinator<M: DecisionModel> {
    config: CoordinatorConfig,

    /// Used to create a fresh model if none could be loaded at startup.
    model_config: M::Config,

    model: Arc<ModelHandle<M>>,

    buffer: Mutex<TrainingBatch>,

    /// The outstanding training job.
    job: Mutex<Option<JoinHandle<()>>>,

    /// Policy used by agents without a private one.
    shared_policy: Mutex<LearnedPolicy<M>>,

    rounds_started: AtomicUsize,

    counters: Arc<Counters>,

    recorder: Arc<Mutex<Box<dyn Recorder + Send>>>,

    /// Sender of [`RoundReport`]s.
    report_sender: Sender<RoundReport>,
}

impl<M> TrainingCoordinator<M>
where
    M: DecisionModel + Send,
    M::Config: 'static,
{
    /// Builds a coordinator around the shared model.
    ///
    /// `training` selects the behavior of the shared policy, see [`LearnedPolicy`].
    pub fn build(
        config: &CoordinatorConfig,
        model_config: M::Config,
        model: Arc<ModelHandle<M>>,
        policy_config: &PolicyConfig,
        training: bool,
        recorder: Box<dyn Recorder + Send>,
        report_sender: Sender<RoundReport>,
    ) -> Result<Self> {
        if config.max_batch_size == 0 {
            return Err(DelveError::Configuration("max_batch_size must be positive".into()).into());
        }

        Ok(Self {
            config: config.clone(),
            model_config,
            shared_policy: Mutex::new(LearnedPolicy::new(model.clone(), policy_config, training)),
            model,
            buffer: Mutex::new(Vec::with_capacity(config.max_batch_size)),
            job: Mutex::new(None),
            rounds_started: AtomicUsize::new(0),
            counters: Arc::new(Counters::default()),
            recorder: Arc::new(Mutex::new(recorder)),
            report_sender,
        })
    }

    /// Appends an experience, flushing the buffer once it holds `max_batch_size` experiences.
    pub fn ingest(&self, exp: Experience) {
        let batch = {
            let mut buffer = lock(&self.buffer);
            buffer.push(exp);
            self.counters.ingested.fetch_add(1, Ordering::AcqRel);
            if buffer.len() >= self.config.max_batch_size {
                let mut batch = Vec::with_capacity(self.config.max_batch_size);
                std::mem::swap(&mut *buffer, &mut batch);
                Some(batch)
            } else {
                None
            }
        };

        if let Some(batch) = batch {
            self.launch(batch);
        }
    }

    /// Hands over the buffered experiences to a training round, even if the buffer is not full.
    ///
    /// Returns `false` if the buffer was empty.
    pub fn flush(&self) -> bool {
        let batch = std::mem::take(&mut *lock(&self.buffer));
        if batch.is_empty() {
            return false;
        }
        self.launch(batch);
        true
    }

    /// Selects an action with the shared policy.
    pub fn select_motion(&self, snapshot: &PerceptionSnapshot) -> Result<(Action, f32)> {
        lock(&self.shared_policy).select(snapshot)
    }

    /// Generation of the published model, `0` if there is none.
    pub fn model_version(&self) -> usize {
        self.model.current().map_or(0, |m| m.version())
    }

    /// The shared model.
    pub fn model(&self) -> &Arc<ModelHandle<M>> {
        &self.model
    }

    /// Number of experiences waiting for the next round.
    pub fn buffered_len(&self) -> usize {
        lock(&self.buffer).len()
    }

    /// Returns `true` while a training job has been launched and not joined yet.
    pub fn job_outstanding(&self) -> bool {
        lock(&self.job).as_ref().map_or(false, |h| !h.is_finished())
    }

    /// Stats so far.
    pub fn stat(&self) -> CoordinatorStat {
        self.counters.snapshot()
    }

    fn launch(&self, batch: TrainingBatch) {
        let mut job = lock(&self.job);

        if let Some(handle) = job.take() {
            if !handle.is_finished() {
                debug!("Waiting for the previous training job");
            }
            if handle.join().is_err() {
                warn!("Training job thread terminated abnormally");
            }
        }

        let round = self.rounds_started.fetch_add(1, Ordering::AcqRel) + 1;
        self.counters.flushed.fetch_add(batch.len(), Ordering::AcqRel);
        info!("Starts training round {} with {} experiences", round, batch.len());

        let ctx = JobContext {
            model: self.model.clone(),
            model_config: self.model_config.clone(),
            params: self.config.train.clone(),
            save_after_round: self.config.save_after_round,
            counters: self.counters.clone(),
            recorder: self.recorder.clone(),
            report_sender: self.report_sender.clone(),
        };
        *job = Some(std::thread::spawn(move || ctx.run(round, batch)));
    }
}

impl<M> ExperienceSink for TrainingCoordinator<M>
where
    M: DecisionModel + Send,
    M::Config: 'static,
{
    fn ingest(&self, exp: Experience) -> Result<()> {
        TrainingCoordinator::ingest(self, exp);
        Ok(())
    }
}

impl<M: DecisionModel> TrainingCoordinator<M> {
    /// Waits for the outstanding training job, if any.
    ///
    /// Buffered experiences which did not reach a flush are kept.
    pub fn shutdown(&self) {
        let handle = lock(&self.job).take();
        if let Some(handle) = handle {
            info!("Waiting for the outstanding training job");
            if handle.join().is_err() {
                warn!("Training job thread terminated abnormally");
            }
        }
    }
}

impl<M: DecisionModel> Drop for TrainingCoordinator<M> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Everything a training job needs, moved into its thread.
struct JobContext<M: DecisionModel> {
    model: Arc<ModelHandle<M>>,
    model_config: M::Config,
    params: TrainParams,
    save_after_round: bool,
    counters: Arc<Counters>,
    recorder: Arc<Mutex<Box<dyn Recorder + Send>>>,
    report_sender: Sender<RoundReport>,
}

impl<M: DecisionModel> JobContext<M> {
    fn run(self, round: usize, batch: TrainingBatch) {
        let batch_size = batch.len();
        let mean_reward = batch.iter().map(|e| e.reward).sum::<f32>() / batch_size.max(1) as f32;
        let t = Instant::now();

        let result = match catch_unwind(AssertUnwindSafe(|| self.train(&batch))) {
            Ok(result) => result,
            Err(_) => Err(DelveError::TrainingJob("training job panicked".into()).into()),
        };
        let train_secs = t.elapsed();
        self.add_train_duration(train_secs);

        let (success, model_version, error) = match result {
            Ok(model_version) => {
                info!("Finished training round {} (model version {})", round, model_version);
                (true, model_version, None)
            }
            Err(e) => {
                self.counters.failed_rounds.fetch_add(1, Ordering::AcqRel);
                warn!("Training round {} failed: {}", round, e);
                let model_version = self.model.current().map_or(0, |m| m.version());
                (false, model_version, Some(e.to_string()))
            }
        };
        self.counters.rounds.fetch_add(1, Ordering::AcqRel);

        let record = Record::from_slice(&[
            ("round", RecordValue::Scalar(round as f32)),
            ("batch_size", RecordValue::Scalar(batch_size as f32)),
            ("mean_reward", RecordValue::Scalar(mean_reward)),
            ("train_secs", RecordValue::Scalar(train_secs.as_secs_f32())),
            ("model_version", RecordValue::Scalar(model_version as f32)),
            ("success", RecordValue::Scalar(if success { 1.0 } else { 0.0 })),
            ("datetime", RecordValue::DateTime(Local::now())),
        ]);
        lock(&self.recorder).write(record);

        let report = RoundReport {
            round,
            batch_size,
            success,
            model_version,
            error,
        };
        if self.report_sender.send(report).is_err() {
            debug!("No receiver of round reports");
        }
    }

    /// Trains a fork of the current model and publishes it. Returns the new generation.
    fn train(&self, batch: &TrainingBatch) -> Result<usize> {
        let mut model = match self.model.current() {
            Some(current) => current.fork()?,
            None => {
                info!("No model available, creating a fresh one");
                M::create(&self.model_config)
                    .map_err(|e| DelveError::ModelUnavailable(e.to_string()))?
            }
        };

        model
            .train(batch, &self.params)
            .map_err(|e| DelveError::TrainingJob(e.to_string()))?;
        let model_version = model.version();

        if self.save_after_round {
            match model.save() {
                Ok(()) => info!("Saved the model (version {})", model_version),
                Err(_) => info!("Failed to save model."),
            }
        }
        self.model.publish(model);

        Ok(model_version)
    }

    fn add_train_duration(&self, d: Duration) {
        *lock(&self.counters.train_duration) += d;
    }
}
