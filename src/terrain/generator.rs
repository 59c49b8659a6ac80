//! Noise-based height composition
//!
//! Height is a weighted sum of three bands: a low-frequency continental
//! base, a high-frequency ridge band raised to the fourth power (narrow peaks,
//! mostly flat elsewhere) and a mid-frequency detail band.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::biome::{BiomeId, BiomeSelector, BiomeTable};
use super::noise::NoiseSet;
use crate::voxel::chunk::WORLD_HEIGHT;

/// Parameters controlling terrain height composition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub base_frequency: f64,   // Continents and valleys
    pub ridge_frequency: f64,  // Sharpened ridgelines
    pub detail_frequency: f64, // Mid-frequency detail
    pub base_weight: f64,
    pub ridge_weight: f64,
    pub detail_weight: f64,
    /// Headroom kept free at the top of the world
    pub margin: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            base_frequency: 0.002,
            ridge_frequency: 0.09,
            detail_frequency: 0.01,
            base_weight: 1.2,
            ridge_weight: 1.0,
            detail_weight: 0.1,
            margin: 16,
        }
    }
}

/// Height and biome of one world column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSample {
    pub height: i32,
    pub biome: BiomeId,
}

/// Procedural terrain generator: height composer plus biome selection
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: NoiseSet,
    biomes: BiomeSelector,
    water_level: i32,
}

impl TerrainGenerator {
    /// Create a new terrain generator with Perlin sources for `seed`
    pub fn new(seed: u32, params: TerrainParams, biomes: BiomeTable, water_level: i32) -> Self {
        Self::with_noise(NoiseSet::new(seed), seed, params, biomes, water_level)
    }

    /// Create with caller-supplied noise sources
    pub fn with_noise(
        noise: NoiseSet,
        seed: u32,
        params: TerrainParams,
        biomes: BiomeTable,
        water_level: i32,
    ) -> Self {
        Self {
            params,
            noise,
            biomes: BiomeSelector::new(seed, biomes),
            water_level,
        }
    }

    /// Get terrain parameters
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn noise(&self) -> &NoiseSet {
        &self.noise
    }

    pub fn biomes(&self) -> &BiomeSelector {
        &self.biomes
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    /// Highest height the composer can produce
    pub fn max_height(&self) -> f64 {
        (WORLD_HEIGHT as u32).saturating_sub(self.params.margin) as f64
    }

    /// Composed height before clamping, in voxels
    ///
    /// The signed bands span `[-(base + detail), base + detail]`; that range
    /// maps onto `[0, max_height]`. The ridge band only ever lifts terrain.
    pub fn raw_height(&self, x: f64, z: f64) -> f64 {
        let p = &self.params;
        let base = self.noise.primary.sample_2d(x * p.base_frequency, z * p.base_frequency);
        let ridge = self.noise.ridge.sample_2d(x * p.ridge_frequency, z * p.ridge_frequency);
        let detail = self.noise.detail.sample_2d(x * p.detail_frequency, z * p.detail_frequency);

        let combined = base * p.base_weight + ridge.abs().powi(4) * p.ridge_weight + detail * p.detail_weight;
        let span = p.base_weight + p.detail_weight;
        (combined + span) / (2.0 * span) * self.max_height()
    }

    /// Composed terrain height at a world column, clamped into the world
    pub fn height(&self, x: i32, z: i32) -> i32 {
        self.clamp_height(self.raw_height(x as f64, z as f64))
    }

    /// Final height and biome of a column, with biome profiles blended at cell borders
    pub fn column(&self, x: i32, z: i32) -> ColumnSample {
        let (fx, fz) = (x as f64, z as f64);
        let composed = self.raw_height(fx, fz);
        let sample = self.biomes.sample(fx, fz);
        let table = self.biomes.table();

        let primary = table
            .get(sample.primary)
            .height_profile
            .apply(composed, fx, fz, &self.noise, self.water_level);
        let weight = sample.secondary_weight(table.blend_width);
        let height = if weight > 0.0 {
            let secondary = table
                .get(sample.secondary)
                .height_profile
                .apply(composed, fx, fz, &self.noise, self.water_level);
            primary * (1.0 - weight) + secondary * weight
        } else {
            primary
        };

        ColumnSample { height: self.clamp_height(height), biome: sample.primary }
    }

    fn clamp_height(&self, h: f64) -> i32 {
        (h.round() as i32).clamp(0, self.max_height() as i32)
    }

    /// Unit direction for a cave worm at `pos`
    ///
    /// Three samples of one 3-D field at offset positions give a smoothly
    /// turning path. Falls back to straight down if the field is degenerate.
    pub fn cave_direction(&self, pos: Vec3, frequency: f64) -> Vec3 {
        let (x, y, z) = (pos.x as f64 * frequency, pos.y as f64 * frequency, pos.z as f64 * frequency);
        let source = &self.noise.primary;
        let dir = Vec3::new(
            source.sample_3d(x, y, z) as f32,
            source.sample_3d(x + 100.0, y + 100.0, z + 100.0) as f32,
            source.sample_3d(x + 200.0, y + 200.0, z + 200.0) as f32,
        );
        let dir = dir.normalize_or_zero();
        if dir == Vec3::ZERO { Vec3::NEG_Y } else { dir }
    }

    /// Low-frequency cloud field at a world column
    pub fn cloud_density(&self, x: i32, z: i32, frequency: f64) -> f64 {
        self.noise.ridge.sample_3d(x as f64 * frequency, 0.5, z as f64 * frequency)
    }

    /// Shoreline perturbation noise at a world column
    pub fn shore_noise(&self, x: i32, z: i32) -> f64 {
        self.noise.detail.sample_2d(x as f64 * 0.1 + 0.5, z as f64 * 0.1 + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::noise::NoiseSource;

    /// Constant-valued noise for exact height checks
    struct Constant(f64);

    impl NoiseSource for Constant {
        fn sample_2d(&self, _x: f64, _z: f64) -> f64 {
            self.0
        }
        fn sample_3d(&self, _x: f64, _y: f64, _z: f64) -> f64 {
            self.0
        }
    }

    fn constant_generator(base: f64, ridge: f64, detail: f64) -> TerrainGenerator {
        let noise = NoiseSet::from_sources(
            Box::new(Constant(base)),
            Box::new(Constant(ridge)),
            Box::new(Constant(detail)),
        );
        TerrainGenerator::with_noise(noise, 1, TerrainParams::default(), BiomeTable::default(), 41)
    }

    #[test]
    fn test_height_deterministic() {
        let a = TerrainGenerator::new(12345, TerrainParams::default(), BiomeTable::default(), 41);
        let b = TerrainGenerator::new(12345, TerrainParams::default(), BiomeTable::default(), 41);
        for i in -30..30 {
            assert_eq!(a.height(i * 7, i * -3), b.height(i * 7, i * -3));
            assert_eq!(a.column(i * 7, i * -3), b.column(i * 7, i * -3));
        }
    }

    #[test]
    fn test_height_in_range() {
        let terrain = TerrainGenerator::new(1, TerrainParams::default(), BiomeTable::default(), 41);
        let max = terrain.max_height() as i32;
        for x in (-500..500).step_by(37) {
            for z in (-500..500).step_by(41) {
                let h = terrain.height(x, z);
                assert!((0..=max).contains(&h));
                let c = terrain.column(x, z);
                assert!((0..=max).contains(&c.height));
            }
        }
    }

    #[test]
    fn test_normalization_endpoints() {
        let max = WORLD_HEIGHT as f64 - 16.0;
        assert_eq!(constant_generator(-1.0, 0.0, -1.0).raw_height(0.0, 0.0), 0.0);
        assert_eq!(constant_generator(1.0, 0.0, 1.0).raw_height(0.0, 0.0), max);
        assert_eq!(constant_generator(0.0, 0.0, 0.0).raw_height(0.0, 0.0), max / 2.0);
    }

    #[test]
    fn test_ridge_lifts_and_clamps() {
        let flat = constant_generator(0.0, 0.0, 0.0);
        let ridged = constant_generator(0.0, -1.0, 0.0);
        assert!(ridged.raw_height(0.0, 0.0) > flat.raw_height(0.0, 0.0));
        let peak = constant_generator(1.0, 1.0, 1.0);
        assert_eq!(peak.height(0, 0), peak.max_height() as i32);
    }

    #[test]
    fn test_cave_direction_is_unit() {
        let terrain = TerrainGenerator::new(3, TerrainParams::default(), BiomeTable::default(), 41);
        for i in 0..20 {
            let d = terrain.cave_direction(Vec3::new(i as f32 * 3.3, 30.0, i as f32 * 1.7), 0.08);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
        let zero = constant_generator(0.0, 0.0, 0.0);
        assert_eq!(zero.cave_direction(Vec3::ZERO, 0.08), Vec3::NEG_Y);
    }
}
