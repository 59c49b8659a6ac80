//! Biome selection based on a Worley (nearest feature point) partition
//!
//! The plane is cut into square cells. Each cell owns one pseudo-random
//! feature point and one biome, both derived from a hash of the cell indices
//! and the world seed, so selection is a pure function with no stored state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::terrain::noise::NoiseSet;
use crate::voxel::voxel::VoxelKind;

/// The curated tree grammar pool
pub const DEFAULT_TREE_GRAMMARS: [&str; 4] = [
    "F=F[FA(3)L][FA(3)L][FA(3)L]A(3)",
    "F=F[F+A(5)L][-A(5)L][/A(4)L][\\A(4)L]",
    "F=F[A(3)L]F[-A(2)L]F[/A(2)L]F[+A(1)L]",
    "F=FFF[FA(2)L][FA(3)L][FA(4)L]",
];

/// Largest table a [`BiomeId`] can address
pub const MAX_BIOMES: usize = u8::MAX as usize + 1;

/// Index into a [`BiomeTable`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiomeId(pub u8);

/// Per-biome height modifier applied on top of the composed height
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeightProfile {
    /// Composed height plus rolling mid-frequency hills
    Rolling { amplitude: f64 },
    /// Pulled toward just above the water line, with dune ripples
    Dunes { amplitude: f64, flatten: f64 },
    /// Pulled toward a plateau a few voxels above the water line
    Plains { flatten: f64 },
}

impl HeightProfile {
    /// Modify a composed height (voxel units) for one column
    pub fn apply(&self, height: f64, x: f64, z: f64, noise: &NoiseSet, water_level: i32) -> f64 {
        let water = water_level as f64;
        match *self {
            HeightProfile::Rolling { amplitude } => {
                height + amplitude * noise.detail.sample_2d(x * 0.03, z * 0.03)
            }
            HeightProfile::Dunes { amplitude, flatten } => {
                let base = lerp(height, water + 3.0, flatten);
                base + amplitude * noise.ridge.sample_2d(x * 0.02, z * 0.02).abs()
            }
            HeightProfile::Plains { flatten } => lerp(height, water + 6.0, flatten),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Static description of a biome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeProperties {
    pub name: String,
    /// Block at the exact surface height (above water)
    pub surface: VoxelKind,
    /// Block between the surface and the deep layer
    pub subsurface: VoxelKind,
    /// Decorative plant model ids; empty disables plants
    pub plant_models: Vec<u8>,
    /// L-system rule strings; empty disables trees
    pub tree_grammars: Vec<String>,
    /// Probability that a tree sample grows a tree
    pub tree_density: f64,
    pub height_profile: HeightProfile,
    /// Relative selection weight among cells
    pub weight: u32,
}

/// Swappable biome definitions plus cell layout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeTable {
    /// Worley cell edge in voxels
    pub cell_size: f64,
    /// Distance from a cell border over which heights are blended
    pub blend_width: f64,
    pub biomes: Vec<BiomeProperties>,
}

impl Default for BiomeTable {
    fn default() -> Self {
        let grammars: Vec<String> = DEFAULT_TREE_GRAMMARS.iter().map(|s| s.to_string()).collect();
        Self {
            cell_size: 128.0,
            blend_width: 12.0,
            biomes: vec![
                BiomeProperties {
                    name: "meadow".into(),
                    surface: VoxelKind::Grass,
                    subsurface: VoxelKind::Dirt,
                    plant_models: vec![0, 1, 2, 3],
                    tree_grammars: grammars.clone(),
                    tree_density: 0.25,
                    height_profile: HeightProfile::Rolling { amplitude: 4.0 },
                    weight: 3,
                },
                BiomeProperties {
                    name: "forest".into(),
                    surface: VoxelKind::Grass,
                    subsurface: VoxelKind::Dirt,
                    plant_models: vec![0, 1],
                    tree_grammars: grammars,
                    tree_density: 0.8,
                    height_profile: HeightProfile::Rolling { amplitude: 2.0 },
                    weight: 2,
                },
                BiomeProperties {
                    name: "desert".into(),
                    surface: VoxelKind::Sand,
                    subsurface: VoxelKind::Sand,
                    plant_models: Vec::new(),
                    tree_grammars: Vec::new(),
                    tree_density: 0.0,
                    height_profile: HeightProfile::Dunes { amplitude: 3.0, flatten: 0.5 },
                    weight: 1,
                },
            ],
        }
    }
}

impl BiomeTable {
    /// Table with a single biome everywhere (useful in tests)
    pub fn uniform(biome: BiomeProperties) -> Self {
        Self { biomes: vec![biome], ..Self::default() }
    }

    pub fn get(&self, id: BiomeId) -> &BiomeProperties {
        // Ids only come from `pick`, so this is in range for a non-empty table
        &self.biomes[(id.0 as usize).min(self.biomes.len().saturating_sub(1))]
    }

    /// Weighted choice driven by a cell's biome hash
    fn pick(&self, rng: &mut ChaCha8Rng) -> BiomeId {
        let total: u32 = self.biomes.iter().map(|b| b.weight.max(1)).sum();
        let mut roll = rng.gen_range(0..total.max(1));
        for (i, biome) in self.biomes.iter().enumerate() {
            let weight = biome.weight.max(1);
            if roll < weight {
                return BiomeId(i as u8);
            }
            roll -= weight;
        }
        BiomeId(0)
    }
}

/// Result of a Worley query
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeSample {
    /// Biome of the nearest feature point's cell
    pub primary: BiomeId,
    /// Biome of the runner-up cell
    pub secondary: BiomeId,
    /// Distance to the nearest feature point
    pub d1: f64,
    /// Distance to the second-nearest feature point
    pub d2: f64,
}

impl BiomeSample {
    /// Weight of the secondary biome: 0.5 on a border, 0 beyond `blend_width`
    pub fn secondary_weight(&self, blend_width: f64) -> f64 {
        if blend_width <= 0.0 || self.primary == self.secondary {
            return 0.0;
        }
        0.5 * (1.0 - ((self.d2 - self.d1) / blend_width).clamp(0.0, 1.0))
    }
}

/// Pure Worley biome lookup for one world seed
#[derive(Clone, Debug)]
pub struct BiomeSelector {
    seed: u32,
    table: BiomeTable,
}

impl BiomeSelector {
    pub fn new(seed: u32, table: BiomeTable) -> Self {
        Self { seed, table }
    }

    pub fn table(&self) -> &BiomeTable {
        &self.table
    }

    /// Biome properties at a world column
    pub fn biome_at(&self, x: f64, z: f64) -> &BiomeProperties {
        self.table.get(self.sample(x, z).primary)
    }

    /// Nearest and second-nearest feature cells around a world column
    ///
    /// Cells are scanned `dx` then `dz` from -1 to +1 and only a strictly
    /// closer point replaces the current best, so exact ties resolve to the
    /// lexicographically smaller cell index.
    pub fn sample(&self, x: f64, z: f64) -> BiomeSample {
        let size = self.table.cell_size;
        let cell_x = (x / size).floor() as i32;
        let cell_z = (z / size).floor() as i32;

        let mut best = (f64::MAX, cell_x, cell_z);
        let mut second = (f64::MAX, cell_x, cell_z);

        for dx in -1..=1 {
            for dz in -1..=1 {
                let cx = cell_x + dx;
                let cz = cell_z + dz;
                let (fx, fz) = self.feature_point(cx, cz);
                let d = ((fx - x).powi(2) + (fz - z).powi(2)).sqrt();
                if d < best.0 {
                    second = best;
                    best = (d, cx, cz);
                } else if d < second.0 {
                    second = (d, cx, cz);
                }
            }
        }

        BiomeSample {
            primary: self.cell_biome(best.1, best.2),
            secondary: self.cell_biome(second.1, second.2),
            d1: best.0,
            d2: second.0,
        }
    }

    /// World position of a cell's feature point
    pub fn feature_point(&self, cx: i32, cz: i32) -> (f64, f64) {
        let hash = (cx as i64).wrapping_mul(73_856_093)
            ^ (cz as i64).wrapping_mul(19_349_663)
            ^ self.seed as i64;
        let mut rng = ChaCha8Rng::seed_from_u64(hash as u64);
        let size = self.table.cell_size;
        let fx = (cx as f64 + rng.gen_range(0.0..1.0)) * size;
        let fz = (cz as f64 + rng.gen_range(0.0..1.0)) * size;
        (fx, fz)
    }

    /// Biome owned by a cell
    pub fn cell_biome(&self, cx: i32, cz: i32) -> BiomeId {
        let hash = (cx as i64).wrapping_mul(83_492_791)
            ^ (cz as i64).wrapping_mul(1_234_567)
            ^ self.seed as i64;
        let mut rng = ChaCha8Rng::seed_from_u64(hash as u64);
        self.table.pick(&mut rng)
    }
}
