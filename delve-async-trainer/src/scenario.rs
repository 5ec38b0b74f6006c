//! Scenario wiring.
mod base;
mod config;
mod policy;
mod stat;
pub use base::Scenario;
pub use config::{ScenarioConfig, ScenarioType};
pub use policy::ScenarioPolicy;
pub use stat::ScenarioStat;
