//! Per-instance agent state machine.
mod base;
mod config;
pub use base::{Agent, AgentPhase};
pub use config::AgentConfig;
