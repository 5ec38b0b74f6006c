#![warn(missing_docs)]
//! Core types and traits of a multi-agent training harness.
//!
//! Agents sense their surroundings with radial [`Probe`]s, choose an [`Action`]
//! and emit one [`Experience`] per decision interval. This crate defines the data
//! model, featurization ([`StateEncoder`]), reward shaping ([`RewardShaper`]),
//! action selection ([`ActionPolicy`]) and the interfaces of the host simulation
//! ([`World`]) and of the decision model ([`DecisionModel`]).
pub mod error;
pub mod policy;
pub mod record;
pub mod reward;

mod base;
pub use base::{
    Action, Activation, ActorId, Actors, AgentId, Contact, DecisionModel, Experience,
    ExperienceSink, HitClass, Infer, Layer, ModelArchitecture, PerceptionSnapshot, Policy, Probe,
    Sensing, Tag, TrainParams, TrainingBatch, Vec3, World,
};

mod encoder;
pub use encoder::StateEncoder;
pub use policy::{ActionPolicy, EpsilonGreedy, PolicyConfig, RandomPolicy};
pub use reward::{RewardConfig, RewardObservation, RewardShaper};
