#![warn(missing_docs)]
//! Multi-agent experience collection and asynchronous training.
//!
//! Agents tick in parallel and hand their experiences to a
//! [`TrainingCoordinator`], which trains the shared model in background rounds.
//! After each round the whole scenario is reset by the
//! [`EpisodeResetOrchestrator`].
//!
//! # Messages
//! * From [`Agent`]s to the [`Scenario`]: [`AgentEvent`]
//! * From training jobs to the [`Scenario`]: [`RoundReport`]
mod agent;
mod coordinator;
mod learned_policy;
mod messages;
mod model_handle;
mod reset;
mod scenario;
mod util;
pub use agent::{Agent, AgentConfig, AgentPhase};
pub use coordinator::{CoordinatorConfig, CoordinatorStat, TrainingCoordinator};
pub use learned_policy::LearnedPolicy;
pub use messages::{AgentEvent, EpisodeEvent, RoundReport};
pub use model_handle::ModelHandle;
pub use reset::{EpisodeResetOrchestrator, SpawnConfig};
pub use scenario::{Scenario, ScenarioConfig, ScenarioPolicy, ScenarioStat, ScenarioType};
