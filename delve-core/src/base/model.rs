//! Decision model interface.
use super::TrainingBatch;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Hyperparameters of a training round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainParams {
    /// Number of passes over the batch.
    pub epochs: usize,

    /// Size of the mini-batches a batch is split into.
    pub batch_size: usize,

    /// Learning rate of the optimizer.
    pub learning_rate: f64,

    /// Discount factor.
    pub gamma: f32,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            epochs: 32,
            batch_size: 4,
            learning_rate: 0.001,
            gamma: 0.95,
        }
    }
}

impl TrainParams {
    /// Sets the number of epochs.
    pub fn epochs(mut self, v: usize) -> Self {
        self.epochs = v;
        self
    }

    /// Sets the mini-batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the learning rate.
    pub fn learning_rate(mut self, v: f64) -> Self {
        self.learning_rate = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f32) -> Self {
        self.gamma = v;
        self
    }
}

/// Activation function of a dense layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Rectified linear unit.
    Relu,

    /// Identity.
    Linear,
}

/// A layer of the decision model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Layer {
    /// Flattens the input.
    Flatten,

    /// Fully connected layer.
    Dense {
        /// Number of output units.
        units: usize,

        /// Activation applied to the output.
        activation: Activation,
    },
}

/// Architecture of a fresh decision model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelArchitecture {
    /// Width of the feature vector.
    pub in_dim: usize,

    /// Layers applied in order.
    pub layers: Vec<Layer>,
}

impl ModelArchitecture {
    /// The navigator network:
    /// `flatten -> dense(64, relu) -> dense(256, relu) -> dense(128, relu) -> dense(1, linear)`.
    pub fn navigator(num_probes: usize) -> Self {
        let dense = |units, activation| Layer::Dense { units, activation };
        Self {
            in_dim: 2 * num_probes + 1,
            layers: vec![
                Layer::Flatten,
                dense(64, Activation::Relu),
                dense(256, Activation::Relu),
                dense(128, Activation::Relu),
                dense(1, Activation::Linear),
            ],
        }
    }

    /// Returns `(in_dim, out_dim, activation)` of the dense layers in order.
    pub fn dense_layers(&self) -> Vec<(usize, usize, Activation)> {
        let mut in_dim = self.in_dim;
        self.layers
            .iter()
            .filter_map(|layer| match layer {
                Layer::Flatten => None,
                Layer::Dense { units, activation } => {
                    let l = (in_dim, *units, *activation);
                    in_dim = *units;
                    Some(l)
                }
            })
            .collect()
    }

    /// Constructs [`ModelArchitecture`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ModelArchitecture`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Forward inference of a decision model.
pub trait Infer: Send + Sync {
    /// Returns the continuous action value for a feature vector.
    fn infer(&self, features: &[f32]) -> Result<f32>;
}

/// The shared decision model of a scenario.
///
/// The numeric implementation is opaque to the harness. A model is never
/// mutated while it is being used for inference: training works on a copy
/// obtained with [`DecisionModel::fork`], which is published afterwards.
pub trait DecisionModel: Infer + Sized + 'static {
    /// Configuration, typically holding the architecture and where the model is persisted.
    type Config: Clone + Send + Sync;

    /// Returns `true` if a persisted model exists.
    fn exists(config: &Self::Config) -> bool;

    /// Loads the persisted model.
    fn load(config: &Self::Config) -> Result<Self>;

    /// Creates a fresh, untrained model.
    fn create(config: &Self::Config) -> Result<Self>;

    /// Persists the model.
    fn save(&self) -> Result<()>;

    /// Returns a deep copy of the model.
    fn fork(&self) -> Result<Self>;

    /// Trains the model on a batch.
    fn train(&mut self, batch: &TrainingBatch, params: &TrainParams) -> Result<()>;

    /// Generation of the model, incremented by each successful training.
    fn version(&self) -> usize;
}
