#![warn(missing_docs)]
//! A headless 2D arena hosting delve scenarios.
//!
//! [`Arena`] implements [`Sensing`](delve_core::Sensing) and
//! [`Actors`](delve_core::Actors). Every actor is a circle on the `xy` plane
//! inside a square bounded by walls. Yaw is in degrees; an actor with yaw `0`
//! faces `+x` and its right vector is `+y`.
mod config;
mod geometry;
mod world;
pub use config::{ArenaConfig, Template};
pub use geometry::{direction, ray_circle, ray_walls};
pub use world::Arena;
