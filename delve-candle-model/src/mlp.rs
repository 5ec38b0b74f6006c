//! Multilayer perceptron.
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::{linear, Linear, Module, VarBuilder};
use delve_core::{Activation, ModelArchitecture};

/// Multilayer perceptron with the layers of a [`ModelArchitecture`].
pub struct Mlp {
    in_dim: usize,
    layers: Vec<(Linear, Activation)>,
}

impl Mlp {
    /// Builds the network. Variables are named `ln0`, `ln1`, ... under the prefix of `vb`.
    pub fn build(vb: VarBuilder, architecture: &ModelArchitecture) -> Result<Self> {
        let layers = architecture
            .dense_layers()
            .into_iter()
            .enumerate()
            .map(|(i, (in_dim, out_dim, act))| {
                Ok((linear(in_dim, out_dim, vb.pp(format!("ln{}", i)))?, act))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            in_dim: architecture.in_dim,
            layers,
        })
    }

    /// Width of the input.
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    /// Applies the network to a batch of shape `[batch_size, in_dim]`.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let mut xs = xs.clone();
        for (layer, act) in self.layers.iter() {
            xs = layer.forward(&xs)?;
            if *act == Activation::Relu {
                xs = xs.relu()?;
            }
        }
        Ok(xs)
    }
}
