#![warn(missing_docs)]
//! Decision model built on [candle](https://github.com/huggingface/candle).
//!
//! [`NavigatorModel`] is a multilayer perceptron mapping the feature vector of a
//! perception to a continuous action value. It is trained by advantage-weighted
//! regression on the action values of a batch of experiences.
mod config;
mod mlp;
mod model;
mod returns;
pub use config::NavigatorConfig;
pub use mlp::Mlp;
pub use model::NavigatorModel;
pub use returns::{advantage_weights, discounted_returns};
