//! Aggregation of experiences and dispatch of training rounds.
mod base;
mod config;
mod stat;
pub use base::TrainingCoordinator;
pub use config::CoordinatorConfig;
pub use stat::CoordinatorStat;
