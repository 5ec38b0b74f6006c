//! Action selection.
//!
//! [`ActionPolicy`] is the epsilon-greedy selector shared by learned policies.
//! [`RandomPolicy`] ignores perception altogether and is used for bulk data
//! generation.
mod action_policy;
mod config;
mod epsilon_greedy;
mod random_policy;
pub use action_policy::ActionPolicy;
pub use config::PolicyConfig;
pub use epsilon_greedy::EpsilonGreedy;
pub use random_policy::RandomPolicy;
