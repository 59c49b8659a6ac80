//! Generation configuration: seed, terrain, biomes and feature passes.

use serde::{Deserialize, Serialize};

use crate::terrain::biome::BiomeTable;
use crate::terrain::generator::TerrainParams;
use crate::voxel::chunk::{CHUNK_SIZE, CLOUD_HEIGHT, WORLD_HEIGHT};

/// Default water line: three eighths of the world height, minus one
pub const DEFAULT_WATER_LEVEL: i32 = (WORLD_HEIGHT * 3 / 8) as i32 - 1;

/// Configuration for the chunk generation pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for terrain, biomes and every feature pass.
    pub seed: u32,
    /// Y of the water line; columns below it become lakes.
    pub water_level: i32,
    /// Height composer parameters.
    pub terrain: TerrainParams,
    /// Biome definitions and Worley cell layout.
    pub biomes: BiomeTable,
    /// Shoreline sand pass.
    pub shore: ShoreParams,
    /// Worm cave carving.
    pub caves: CaveParams,
    /// Plant and tree placement.
    pub vegetation: VegetationParams,
    /// Cloud layer.
    pub clouds: CloudParams,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            water_level: DEFAULT_WATER_LEVEL,
            terrain: TerrainParams::default(),
            biomes: BiomeTable::default(),
            shore: ShoreParams::default(),
            caves: CaveParams::default(),
            vegetation: VegetationParams::default(),
            clouds: CloudParams::default(),
        }
    }
}

/// Shoreline sand perturbation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoreParams {
    /// Horizontal reach (voxels) from a submerged column that counts as shore.
    pub band: i32,
    /// Columns within this many voxels of the water line are candidates.
    pub vertical_band: i32,
    /// Shore noise above this turns the surface to sand.
    pub threshold: f64,
}

impl Default for ShoreParams {
    fn default() -> Self {
        Self { band: 2, vertical_band: 2, threshold: -0.2 }
    }
}

/// Worm cave parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveParams {
    /// Worms per chunk are drawn from `0..=max_worms`.
    pub max_worms: u32,
    pub min_steps: u32,
    pub max_steps: u32,
    /// Frequency of the 3-D direction field.
    pub frequency: f64,
    pub min_radius: i32,
    pub max_radius: i32,
    /// Walks stop once they reach this Y or below.
    pub min_depth: i32,
}

impl Default for CaveParams {
    fn default() -> Self {
        Self {
            max_worms: 1,
            min_steps: 200,
            max_steps: 400,
            frequency: 0.08,
            min_radius: 2,
            max_radius: 3,
            min_depth: 2,
        }
    }
}

/// Plant and tree sampling
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationParams {
    /// Random columns tried for plants per chunk.
    pub plant_samples: usize,
    /// Random columns tried for trees per chunk.
    pub tree_samples: usize,
}

impl Default for VegetationParams {
    fn default() -> Self {
        Self { plant_samples: CHUNK_SIZE / 2, tree_samples: 2 }
    }
}

/// Cloud layer parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParams {
    pub enabled: bool,
    pub height: usize,
    pub frequency: f64,
    /// Density above this becomes cloud.
    pub threshold: f64,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self { enabled: true, height: CLOUD_HEIGHT, frequency: 0.01, threshold: 0.35 }
    }
}

impl GenerationConfig {
    /// Default configuration with a specific seed.
    pub fn from_seed(seed: u32) -> Self {
        Self { seed, ..Self::default() }
    }
}
