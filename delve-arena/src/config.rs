//! Configuration of [`Arena`](crate::Arena).
use anyhow::Result;
use delve_async_trainer::SpawnConfig;
use delve_core::{Tag, Vec3};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// A kind of body which can be spawned by name.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Template {
    /// Name passed to [`Actors::spawn`](delve_core::Actors::spawn).
    pub name: String,

    /// Radius of the body.
    pub radius: f32,

    /// Gameplay tag. Untagged bodies neither occlude probes nor report overlaps.
    pub tag: Option<Tag>,
}

impl Template {
    /// Constructs a template.
    pub fn new(name: impl Into<String>, radius: f32, tag: Option<Tag>) -> Self {
        Self {
            name: name.into(),
            radius,
            tag,
        }
    }
}

/// Configuration of [`Arena`](crate::Arena).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ArenaConfig {
    /// The arena spans `[-half_extent, half_extent]` on both axes.
    pub half_extent: f32,

    /// Spawnable bodies.
    pub templates: Vec<Template>,

    /// Hazards placed when the arena is built.
    pub hazard_points: Vec<Vec3>,

    /// Template of the hazards.
    pub hazard_template: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        let h = 5000.0;
        Self {
            half_extent: h,
            templates: vec![
                Template::new("agent", 50.0, None),
                Template::new("goal", 150.0, Some(Tag::Goal)),
                Template::new("collectible", 60.0, Some(Tag::Collectible)),
                Template::new("hazard", 300.0, Some(Tag::Hazard)),
            ],
            hazard_points: vec![
                Vec3::new(-0.2 * h, 0.35 * h, 0.0),
                Vec3::new(0.25 * h, -0.3 * h, 0.0),
                Vec3::new(0.4 * h, 0.45 * h, 0.0),
            ],
            hazard_template: "hazard".to_string(),
        }
    }
}

impl ArenaConfig {
    /// Sets the half extent.
    pub fn half_extent(mut self, v: f32) -> Self {
        self.half_extent = v;
        self
    }

    /// Sets the hazard points.
    pub fn hazard_points(mut self, v: Vec<Vec3>) -> Self {
        self.hazard_points = v;
        self
    }

    /// Returns the template with the given name.
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// A layout for this arena: agents start on the left, goals lie on the
    /// right and collectibles in between.
    pub fn spawn_config(&self) -> SpawnConfig {
        let h = self.half_extent;
        let column = |x: f32, ys: &[f32]| -> Vec<Vec3> {
            ys.iter().map(|y| Vec3::new(x * h, y * h, 0.0)).collect()
        };
        SpawnConfig::default()
            .spawn_points(column(-0.8, &[-0.5, 0.0, 0.5]))
            .goal_points(column(0.8, &[-0.6, 0.0, 0.6]))
            .collectible_points(
                [column(-0.3, &[-0.6, 0.0]), column(0.1, &[-0.1, 0.6])].concat(),
            )
    }

    /// Constructs [`ArenaConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ArenaConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_arena_config() -> Result<()> {
        let config = ArenaConfig::default().half_extent(1000.0);
        let dir = TempDir::new("arena_config")?;
        let path = dir.path().join("arena_config.yaml");

        config.save(&path)?;
        let config_ = ArenaConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_layout_is_inside() {
        let config = ArenaConfig::default();
        let spawn = config.spawn_config();
        assert!(!spawn.spawn_points.is_empty());
        assert!(!spawn.goal_points.is_empty());
        let inside = |p: &Vec3| p.x.abs() < config.half_extent && p.y.abs() < config.half_extent;
        assert!(spawn
            .spawn_points
            .iter()
            .chain(spawn.goal_points.iter())
            .chain(spawn.collectible_points.iter())
            .all(inside));
    }
}
