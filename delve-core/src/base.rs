//! Core functionalities.
mod action;
mod experience;
mod host;
mod model;
mod perception;
mod policy;
mod probe;
pub use action::Action;
pub use experience::{Experience, ExperienceSink, TrainingBatch};
pub use host::{ActorId, Actors, AgentId, Contact, Sensing, Tag, Vec3, World};
pub use model::{Activation, DecisionModel, Infer, Layer, ModelArchitecture, TrainParams};
pub use perception::PerceptionSnapshot;
pub use policy::Policy;
pub use probe::{HitClass, Probe};
