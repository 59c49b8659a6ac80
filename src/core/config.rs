//! Top-level world configuration, loaded from and saved to JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::generation::GenerationConfig;
use crate::mesh::MeshConfig;
use crate::streaming::StreamingConfig;
use crate::terrain::biome::MAX_BIOMES;
use crate::voxel::chunk::WORLD_HEIGHT;
use crate::voxel::procgen::lsystem::Grammar;

/// Everything needed to stand up a streamed world.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Generation parameters (seed, noise, biomes, feature passes).
    pub generation: GenerationConfig,
    /// Streaming parameters (view radius, per-tick budget, worker count).
    pub streaming: StreamingConfig,
    /// Mesh builder parameters (palette, color jitter).
    pub mesh: MeshConfig,
}

impl WorldConfig {
    /// Default configuration with a specific world seed.
    pub fn with_seed(seed: u32) -> Self {
        let mut config = Self::default();
        config.generation.seed = seed;
        config
    }

    /// Parse from a JSON string and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save to a JSON file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check values that would otherwise produce an empty or broken world.
    pub fn validate(&self) -> Result<()> {
        let streaming = &self.streaming;
        if streaming.view_radius == 0 {
            return Err(Error::Config("view_radius must be at least 1".into()));
        }
        if streaming.max_chunks_per_tick == 0 {
            return Err(Error::Config("max_chunks_per_tick must be at least 1".into()));
        }
        if streaming.worker_threads == Some(0) {
            return Err(Error::Config("worker_threads must be at least 1".into()));
        }

        let generation = &self.generation;
        if generation.water_level < 1 || generation.water_level >= WORLD_HEIGHT as i32 {
            return Err(Error::Config(format!(
                "water_level {} outside world height {}",
                generation.water_level, WORLD_HEIGHT
            )));
        }

        let terrain = &generation.terrain;
        let frequencies = [
            ("base_frequency", terrain.base_frequency),
            ("ridge_frequency", terrain.ridge_frequency),
            ("detail_frequency", terrain.detail_frequency),
            ("caves.frequency", generation.caves.frequency),
            ("clouds.frequency", generation.clouds.frequency),
        ];
        for (name, value) in frequencies {
            if !(value > 0.0) {
                return Err(Error::Config(format!("{} must be positive, got {}", name, value)));
            }
        }
        if terrain.margin >= WORLD_HEIGHT as u32 {
            return Err(Error::Config(format!("terrain margin {} leaves no room", terrain.margin)));
        }
        if terrain.base_weight + terrain.detail_weight <= 0.0 {
            return Err(Error::Config("base_weight + detail_weight must be positive".into()));
        }

        let caves = &generation.caves;
        if caves.min_steps > caves.max_steps || caves.min_radius > caves.max_radius {
            return Err(Error::Config("cave step and radius ranges must have min <= max".into()));
        }
        if caves.min_radius < 0 {
            return Err(Error::Config("cave radius must not be negative".into()));
        }
        if generation.clouds.height >= WORLD_HEIGHT {
            return Err(Error::Config(format!(
                "cloud height {} outside world height {}",
                generation.clouds.height, WORLD_HEIGHT
            )));
        }

        let biomes = &generation.biomes;
        if biomes.biomes.is_empty() {
            return Err(Error::Config("biome table is empty".into()));
        }
        if biomes.biomes.len() > MAX_BIOMES {
            return Err(Error::Config(format!(
                "biome table has {} entries, at most {} are addressable",
                biomes.biomes.len(),
                MAX_BIOMES
            )));
        }
        if !(biomes.cell_size > 0.0) {
            return Err(Error::Config("biome cell_size must be positive".into()));
        }
        for biome in &biomes.biomes {
            for grammar in &biome.tree_grammars {
                Grammar::parse(grammar).map_err(|e| {
                    Error::Config(format!("biome '{}' grammar '{}': {}", biome.name, grammar, e))
                })?;
            }
        }

        Ok(())
    }
}
