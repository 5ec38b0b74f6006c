//! Versioned single-slot publication of the decision model.
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, RwLock,
};

/// Shared reference to the decision model of a scenario.
///
/// Published models are immutable snapshots. Training works on a fork and
/// replaces the snapshot with [`ModelHandle::publish`], so inference never
/// observes a partially updated model. Readers holding an older snapshot keep
/// it alive until they drop it.
pub struct ModelHandle<M> {
    current: RwLock<Option<Arc<M>>>,

    /// Number of publications.
    version: AtomicUsize,

    /// `true` once a loaded or trained model is available.
    ready: AtomicBool,
}

impl<M> ModelHandle<M> {
    /// An empty handle.
    pub fn empty() -> Self {
        Self {
            current: RwLock::new(None),
            version: AtomicUsize::new(0),
            ready: AtomicBool::new(false),
        }
    }

    /// A handle holding an initial model.
    ///
    /// `ready` tells if the model was trained, e.g., loaded from a file,
    /// or is a fresh, untrained one.
    pub fn with_model(model: M, ready: bool) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(model))),
            version: AtomicUsize::new(0),
            ready: AtomicBool::new(ready),
        }
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> Option<Arc<M>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replaces the snapshot and marks the handle ready.
    ///
    /// Returns the number of publications so far.
    pub fn publish(&self, model: M) -> usize {
        let model = Arc::new(model);
        match self.current.write() {
            Ok(mut guard) => *guard = Some(model),
            Err(poisoned) => *poisoned.into_inner() = Some(model),
        }
        self.ready.store(true, Ordering::Release);
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Returns `true` if a trained model is available.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Returns `true` if any model, trained or not, is available.
    pub fn has_model(&self) -> bool {
        self.current().is_some()
    }

    /// Number of publications.
    pub fn version(&self) -> usize {
        self.version.load(Ordering::Acquire)
    }
}

impl<M> Default for ModelHandle<M> {
    fn default() -> Self {
        Self::empty()
    }
}
