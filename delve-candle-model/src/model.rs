//! Navigator model.
use crate::{advantage_weights, discounted_returns, Mlp, NavigatorConfig};
use anyhow::{anyhow, bail, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use delve_core::{
    Action, DecisionModel, Infer, PerceptionSnapshot, StateEncoder, TrainParams, TrainingBatch,
};
use log::{debug, info};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    fs::{create_dir_all, File},
    io::{BufReader, Write},
};

#[derive(Debug, Deserialize, Serialize)]
struct NavigatorMeta {
    version: usize,
}

/// Multilayer perceptron mapping a perception to a continuous action value.
///
/// Training regresses the output on the action values of the batch. Each
/// experience is weighted by `exp(A / temperature)`, clipped at `max_weight`,
/// where `A` is the normalized discounted return of the experience. Actions
/// followed by high returns are thereby imitated more strongly.
pub struct NavigatorModel {
    config: NavigatorConfig,
    device: Device,
    varmap: VarMap,
    mlp: Mlp,
    encoder: StateEncoder,
    version: usize,
}

impl NavigatorModel {
    fn build(config: &NavigatorConfig) -> Result<Self> {
        let arch = &config.architecture;
        if arch.in_dim == 0 || arch.in_dim % 2 == 0 {
            bail!("input width must be 2 * num_probes + 1, got {}", arch.in_dim);
        }
        match arch.dense_layers().last() {
            Some((_, 1, _)) => {}
            _ => bail!("the last dense layer must have a single unit"),
        }

        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let mlp = Mlp::build(vb, arch)?;

        Ok(Self {
            config: config.clone(),
            device,
            varmap,
            mlp,
            encoder: StateEncoder::new((arch.in_dim - 1) / 2),
            version: 0,
        })
    }

    /// The configuration.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Action value for a perception.
    pub fn infer_snapshot(&self, snapshot: &PerceptionSnapshot) -> Result<f32> {
        let features = self.encoder.encode(snapshot)?;
        self.infer(&features)
    }

    fn features(&self, batch: &TrainingBatch) -> Result<Vec<Vec<f32>>> {
        batch
            .iter()
            .map(|exp| {
                self.encoder
                    .encode(&exp.perception)
                    .map_err(anyhow::Error::from)
            })
            .collect()
    }

    fn gather(
        &self,
        ixs: &[usize],
        xs: &[Vec<f32>],
        ys: &[f32],
        ws: &[f32],
    ) -> Result<(Tensor, Tensor, Tensor)> {
        let n = ixs.len();
        let in_dim = self.mlp.in_dim();
        let xs = ixs
            .iter()
            .flat_map(|&i| xs[i].iter().copied())
            .collect::<Vec<_>>();
        let ys = ixs.iter().map(|&i| ys[i]).collect::<Vec<_>>();
        let ws = ixs.iter().map(|&i| ws[i]).collect::<Vec<_>>();
        Ok((
            Tensor::from_vec(xs, (n, in_dim), &self.device)?,
            Tensor::from_vec(ys, n, &self.device)?,
            Tensor::from_vec(ws, n, &self.device)?,
        ))
    }
}

impl Infer for NavigatorModel {
    fn infer(&self, features: &[f32]) -> Result<f32> {
        let in_dim = self.mlp.in_dim();
        if features.len() != in_dim {
            bail!("expected {} features, got {}", in_dim, features.len());
        }
        let xs = Tensor::from_slice(features, (1, in_dim), &self.device)?;
        let ys = self.mlp.forward(&xs)?.flatten_all()?.to_vec1::<f32>()?;
        ys.first()
            .copied()
            .ok_or_else(|| anyhow!("the network produced no output"))
    }
}

impl DecisionModel for NavigatorModel {
    type Config = NavigatorConfig;

    fn exists(config: &NavigatorConfig) -> bool {
        match (config.weights_path(), config.meta_path()) {
            (Some(w), Some(m)) => w.is_file() && m.is_file(),
            _ => false,
        }
    }

    fn load(config: &NavigatorConfig) -> Result<Self> {
        let (weights, meta) = match (config.weights_path(), config.meta_path()) {
            (Some(w), Some(m)) => (w, m),
            _ => bail!("model_dir is not set"),
        };
        let mut model = Self::build(config)?;
        model.varmap.load(&weights)?;
        let meta: NavigatorMeta = serde_yaml::from_reader(BufReader::new(File::open(&meta)?))?;
        model.version = meta.version;
        info!("Loaded model from {:?} (version {})", weights, model.version);
        Ok(model)
    }

    fn create(config: &NavigatorConfig) -> Result<Self> {
        Self::build(config)
    }

    fn save(&self) -> Result<()> {
        let (weights, meta) = match (self.config.weights_path(), self.config.meta_path()) {
            (Some(w), Some(m)) => (w, m),
            _ => bail!("model_dir is not set"),
        };
        if let Some(dir) = self.config.model_dir.as_ref() {
            create_dir_all(dir)?;
        }
        self.varmap.save(&weights)?;
        let meta_str = serde_yaml::to_string(&NavigatorMeta {
            version: self.version,
        })?;
        File::create(&meta)?.write_all(meta_str.as_bytes())?;
        info!("Saved model to {:?} (version {})", weights, self.version);
        Ok(())
    }

    fn fork(&self) -> Result<Self> {
        let mut dest = Self::build(&self.config)?;
        {
            let src = self
                .varmap
                .data()
                .lock()
                .map_err(|_| anyhow!("variables of the source model are poisoned"))?;
            let dst = dest
                .varmap
                .data()
                .lock()
                .map_err(|_| anyhow!("variables of the forked model are poisoned"))?;
            for (name, v_dst) in dst.iter() {
                let v_src = src
                    .get(name)
                    .ok_or_else(|| anyhow!("variable {} is missing in the source model", name))?;
                v_dst.set(v_src.as_tensor())?;
            }
        }
        dest.version = self.version;
        Ok(dest)
    }

    fn train(&mut self, batch: &TrainingBatch, params: &TrainParams) -> Result<()> {
        if batch.is_empty() {
            bail!("empty training batch");
        }
        if params.batch_size == 0 {
            bail!("batch_size must be positive");
        }

        let xs = self.features(batch)?;
        let max_value = (Action::COUNT - 1) as f32;
        let ys = batch
            .iter()
            .map(|exp| {
                if exp.action_value.is_finite() {
                    exp.action_value.clamp(0.0, max_value)
                } else {
                    exp.action.as_value()
                }
            })
            .collect::<Vec<_>>();
        let returns = discounted_returns(batch, params.gamma);
        let ws = advantage_weights(&returns, self.config.temperature, self.config.max_weight);

        let mut opt = AdamW::new(
            self.varmap.all_vars(),
            ParamsAdamW {
                lr: params.learning_rate,
                ..Default::default()
            },
        )?;
        let mut rng = SmallRng::seed_from_u64(self.config.seed.wrapping_add(self.version as u64));
        let mut ixs = (0..batch.len()).collect::<Vec<_>>();
        let mut loss_sum = 0f32;
        let mut n_steps = 0usize;

        for _ in 0..params.epochs {
            ixs.shuffle(&mut rng);
            for chunk in ixs.chunks(params.batch_size) {
                let (x, y, w) = self.gather(chunk, &xs, &ys, &ws)?;
                let pred = self.mlp.forward(&x)?.squeeze(1)?;
                let loss = pred.sub(&y)?.sqr()?.mul(&w)?.mean_all()?;
                let loss_value = loss.to_scalar::<f32>()?;
                if !loss_value.is_finite() {
                    bail!("loss diverged");
                }
                opt.backward_step(&loss)?;
                loss_sum += loss_value;
                n_steps += 1;
            }
        }

        self.version += 1;
        debug!(
            "Trained on {} experiences, mean loss {}, version {}",
            batch.len(),
            loss_sum / n_steps.max(1) as f32,
            self.version
        );
        Ok(())
    }

    fn version(&self) -> usize {
        self.version
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use delve_core::{Experience, HitClass, ModelArchitecture, Probe};
    use tempdir::TempDir;

    fn config() -> NavigatorConfig {
        NavigatorConfig::default().architecture(ModelArchitecture::navigator(2))
    }

    fn features() -> Vec<f32> {
        vec![0.5, 1.0, 0.25, 2.0, 1.0]
    }

    fn snapshot() -> PerceptionSnapshot {
        let probes = vec![
            Probe::from_hit(500.0, 1000.0, HitClass::Generic),
            Probe::from_hit(250.0, 1000.0, HitClass::Hazard),
        ];
        PerceptionSnapshot::new(probes, 1.0)
    }

    fn batch(action_value: f32, reward: f32) -> TrainingBatch {
        (0..8)
            .map(|i| Experience {
                agent: i % 2,
                perception: snapshot(),
                action: Action::from_value(action_value),
                action_value,
                reward,
                is_terminal: false,
            })
            .collect()
    }

    #[test]
    fn test_infer() -> Result<()> {
        let model = NavigatorModel::create(&config())?;
        assert!(model.infer(&features())?.is_finite());
        assert_eq!(model.infer_snapshot(&snapshot())?, model.infer(&features())?);
        assert!(model
            .infer_snapshot(&PerceptionSnapshot::new(vec![], 1.0))
            .is_err());
        assert!(model.infer(&[0.0; 3]).is_err());
        assert_eq!(model.version(), 0);
        Ok(())
    }

    #[test]
    fn test_invalid_architecture() {
        let arch = ModelArchitecture {
            in_dim: 4,
            layers: vec![],
        };
        assert!(NavigatorModel::create(&NavigatorConfig::default().architecture(arch)).is_err());
    }

    #[test]
    fn test_fork_is_deep() -> Result<()> {
        let model = NavigatorModel::create(&config())?;
        let before = model.infer(&features())?;

        let mut forked = model.fork()?;
        assert_eq!(forked.infer(&features())?, before);

        forked.train(&batch(4.0, 1.0), &TrainParams::default().epochs(4))?;
        assert_eq!(forked.version(), 1);
        assert_eq!(model.version(), 0);
        assert_eq!(model.infer(&features())?, before);
        assert_ne!(forked.infer(&features())?, before);
        Ok(())
    }

    #[test]
    fn test_train_fits_action_value() -> Result<()> {
        let mut model = NavigatorModel::create(&config())?;
        let params = TrainParams::default()
            .epochs(200)
            .batch_size(8)
            .learning_rate(0.01);
        model.train(&batch(2.0, 1.0), &params)?;
        let value = model.infer_snapshot(&snapshot())?;
        assert!((value - 2.0).abs() < 0.5, "{}", value);
        Ok(())
    }

    #[test]
    fn test_empty_batch() -> Result<()> {
        let mut model = NavigatorModel::create(&config())?;
        assert!(model.train(&vec![], &TrainParams::default()).is_err());
        assert_eq!(model.version(), 0);
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let tmp = TempDir::new("navigator")?;
        let dir = tmp.path().join("model");
        let config = config().model_dir(dir.to_string_lossy());
        assert!(!NavigatorModel::exists(&config));

        let mut model = NavigatorModel::create(&config)?;
        model.train(&batch(1.0, 0.5), &TrainParams::default().epochs(2))?;
        model.save()?;
        assert!(NavigatorModel::exists(&config));

        let loaded = NavigatorModel::load(&config)?;
        assert_eq!(loaded.version(), 1);
        assert_eq!(loaded.infer(&features())?, model.infer(&features())?);
        Ok(())
    }

    #[test]
    fn test_save_without_dir() -> Result<()> {
        let model = NavigatorModel::create(&config())?;
        assert!(model.save().is_err());
        assert!(!NavigatorModel::exists(&config()));
        Ok(())
    }
}
