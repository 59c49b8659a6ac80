//! World generation pipeline: builds voxel chunks pass by pass.
//!
//! The pipeline runs, in order:
//! 1. Terrain fill (height composer + biome surface/subsurface typing)
//! 2. Lake and shoreline sand passes (ground-level chunks)
//! 3. Replay of persisted writes and drain of pending writes
//! 4. Worm cave carving
//! 5. Plant placement (fresh or replayed)
//! 6. L-system tree growth (fresh or replayed)
//! 7. Cloud layer
//!
//! Every random decision comes from a ChaCha RNG seeded by (world seed,
//! chunk coordinate, pass), so generating the same coordinate twice yields
//! the same chunk.

pub mod config;
pub mod context;
pub mod terrain_gen;
pub mod water_gen;
pub mod cave_gen;
pub mod plant_gen;
pub mod tree_gen;
pub mod cloud_gen;

pub use config::{CaveParams, CloudParams, GenerationConfig, ShoreParams, VegetationParams};
pub use context::{ForeignWrites, GenerationContext};
pub use tree_gen::TreeGrower;

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::streaming::cache::ChunkCache;
use crate::terrain::generator::TerrainGenerator;
use crate::voxel::chunk::{Chunk, ChunkCoord, PlantRecord, TreeRecord};
use terrain_gen::HeightGrid;

const PASS_CAVES: u32 = 1;
const PASS_PLANTS: u32 = 2;
const PASS_TREES: u32 = 3;

/// Counters for one chunk generation
#[derive(Clone, Copy, Debug, Default)]
pub struct GenerationStats {
    pub water: usize,
    pub sand: usize,
    /// Persisted and pending writes applied after the terrain passes
    pub replayed_writes: usize,
    pub worms: usize,
    pub plants: usize,
    pub trees: usize,
    pub clouds: usize,
    /// Writes that landed in other chunks
    pub foreign_writes: usize,
    pub elapsed: Duration,
}

/// A generated chunk plus the writes it produced for other chunks
pub struct GeneratedChunk {
    pub chunk: Chunk,
    pub foreign_writes: ForeignWrites,
    pub stats: GenerationStats,
}

/// Orchestrates chunk generation: terrain → water → caves → plants → trees → clouds.
pub struct ChunkGenerator {
    config: GenerationConfig,
    terrain: TerrainGenerator,
    trees: TreeGrower,
}

impl ChunkGenerator {
    /// Create a new generator from configuration.
    pub fn new(config: &GenerationConfig) -> Self {
        let terrain = TerrainGenerator::new(
            config.seed,
            config.terrain.clone(),
            config.biomes.clone(),
            config.water_level,
        );
        Self::with_terrain(config, terrain)
    }

    /// Create with a pre-built terrain generator (custom noise sources).
    pub fn with_terrain(config: &GenerationConfig, terrain: TerrainGenerator) -> Self {
        let trees = TreeGrower::new(config.seed, &config.biomes);
        Self { config: config.clone(), terrain, trees }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// Generate a chunk.
    ///
    /// With `plants`/`trees` supplied, vegetation is re-stamped from those
    /// records instead of being sampled. Writes for other chunks are returned
    /// rather than applied; the cache applies them when installing the result.
    pub fn generate(
        &self,
        coord: ChunkCoord,
        cache: &ChunkCache,
        plants: Option<&[PlantRecord]>,
        trees: Option<&[TreeRecord]>,
    ) -> GeneratedChunk {
        let start = Instant::now();
        let seed = self.config.seed;
        let ground = coord.y == 0;
        let mut stats = GenerationStats::default();
        let mut chunk = Chunk::new(coord);

        if ground {
            let grid = HeightGrid::sample(&self.terrain, coord, self.config.shore.band);
            terrain_gen::fill_terrain(&mut chunk, &grid, &self.terrain);
            stats.water = water_gen::fill_water(&mut chunk, self.config.water_level);
            stats.sand = water_gen::place_sand(&mut chunk, &grid, &self.terrain, &self.config.shore);
        }

        for write in cache.take_writes_for_generation(coord) {
            if write.apply(&mut chunk) {
                stats.replayed_writes += 1;
            }
        }

        let mut ctx = GenerationContext::new(chunk, cache);

        if ground {
            let mut rng = pass_rng(seed, coord, PASS_CAVES);
            stats.worms = cave_gen::carve_caves(&mut ctx, &self.terrain, &self.config.caves, &mut rng).len();
        }

        let plant_records = match plants {
            Some(records) => {
                plant_gen::replay_plants(&mut ctx.chunk, records);
                records.to_vec()
            }
            None if ground => {
                let mut rng = pass_rng(seed, coord, PASS_PLANTS);
                plant_gen::place_plants(&mut ctx.chunk, &self.terrain, &self.config.vegetation, &mut rng)
            }
            None => Vec::new(),
        };

        let tree_records = match trees {
            Some(records) => {
                self.trees.replay(&mut ctx, records);
                records.to_vec()
            }
            None if ground => {
                let mut rng = pass_rng(seed, coord, PASS_TREES);
                self.trees.place_trees(&mut ctx, &self.terrain, &self.config.vegetation, &mut rng)
            }
            None => Vec::new(),
        };

        stats.clouds = cloud_gen::place_clouds(&mut ctx.chunk, &self.terrain, &self.config.clouds);
        stats.foreign_writes = ctx.foreign_write_count();

        let (mut chunk, foreign_writes) = ctx.finish();
        stats.plants = plant_records.len();
        stats.trees = tree_records.len();
        chunk.plants = plant_records;
        chunk.trees = tree_records;
        chunk.mark_dirty();

        stats.elapsed = start.elapsed();
        log::debug!(
            "Generated chunk ({}, {}, {}) in {:.2}ms: {} plants, {} trees, {} worms, {} foreign writes",
            coord.x, coord.y, coord.z,
            stats.elapsed.as_secs_f64() * 1000.0,
            stats.plants, stats.trees, stats.worms, stats.foreign_writes,
        );

        GeneratedChunk { chunk, foreign_writes, stats }
    }

    /// Composed terrain height at a world column (delegates to TerrainGenerator).
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        self.terrain.column(x, z).height
    }
}

/// RNG for one generation pass of one chunk
fn pass_rng(seed: u32, coord: ChunkCoord, pass: u32) -> ChaCha8Rng {
    let mut h = (coord.x as u32 as u64).wrapping_mul(374_761_393)
        .wrapping_add((coord.z as u32 as u64).wrapping_mul(668_265_263))
        .wrapping_add((coord.y as u32 as u64).wrapping_mul(2_246_822_519))
        .wrapping_add((seed as u64).wrapping_mul(1_274_126_177));
    h = (h ^ (h >> 13)).wrapping_mul(1_103_515_245);
    h ^= (pass as u64) << 48;
    ChaCha8Rng::seed_from_u64(h ^ (h >> 16))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::chunk::{CHUNK_SIZE, WORLD_HEIGHT};
    use crate::voxel::edit::write::{VoxelWrite, WriteMode};
    use crate::voxel::voxel::{Voxel, VoxelKind};
    use glam::IVec3;
    use std::collections::BTreeSet;

    fn generator(seed: u32) -> ChunkGenerator {
        ChunkGenerator::new(&GenerationConfig::from_seed(seed))
    }

    /// World positions of all voxels of the given kinds
    fn positions(chunk: &Chunk, kinds: &[VoxelKind]) -> BTreeSet<(usize, usize, usize)> {
        chunk
            .voxels()
            .iter()
            .enumerate()
            .filter(|(_, v)| kinds.contains(&v.kind))
            .map(|(i, _)| Chunk::position(i))
            .collect()
    }

    /// First coordinate (scanning outward) whose generation produced vegetation
    fn find_vegetated(generator: &ChunkGenerator) -> Option<(ChunkCoord, GeneratedChunk)> {
        for r in 0..12 {
            for x in -r..=r {
                for z in -r..=r {
                    let coord = ChunkCoord::ground(x, z);
                    let generated = generator.generate(coord, &ChunkCache::new(), None, None);
                    if !generated.chunk.trees.is_empty() && !generated.chunk.plants.is_empty() {
                        return Some((coord, generated));
                    }
                }
            }
        }
        None
    }

    #[test]
    fn test_generation_deterministic() {
        let chunk_gen = generator(12345);
        for coord in [ChunkCoord::ground(0, 0), ChunkCoord::ground(-3, 7)] {
            let a = chunk_gen.generate(coord, &ChunkCache::new(), None, None);
            let b = chunk_gen.generate(coord, &ChunkCache::new(), None, None);
            assert_eq!(a.chunk.voxels(), b.chunk.voxels());
            assert_eq!(a.chunk.height_map(), b.chunk.height_map());
            assert_eq!(a.chunk.plants, b.chunk.plants);
            assert_eq!(a.chunk.trees, b.chunk.trees);
            assert_eq!(a.foreign_writes, b.foreign_writes);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let coord = ChunkCoord::ground(1, 1);
        let a = generator(1).generate(coord, &ChunkCache::new(), None, None);
        let b = generator(2).generate(coord, &ChunkCache::new(), None, None);
        assert_ne!(a.chunk.height_map(), b.chunk.height_map());
    }

    #[test]
    fn test_replay_reproduces_vegetation() {
        let chunk_gen = generator(4242);
        let (coord, original) = find_vegetated(&chunk_gen).expect("no vegetated chunk near origin");

        let replayed = chunk_gen.generate(
            coord,
            &ChunkCache::new(),
            Some(&original.chunk.plants),
            Some(&original.chunk.trees),
        );

        let kinds = [VoxelKind::Plant, VoxelKind::Wood, VoxelKind::Leaves];
        assert_eq!(positions(&original.chunk, &kinds), positions(&replayed.chunk, &kinds));
        assert_eq!(original.chunk.plants, replayed.chunk.plants);
        assert_eq!(original.chunk.trees, replayed.chunk.trees);
        assert_eq!(original.foreign_writes, replayed.foreign_writes);
    }

    #[test]
    fn test_terrain_invariants() {
        let chunk_gen = generator(99);
        let water = chunk_gen.config().water_level;
        let generated = chunk_gen.generate(ChunkCoord::ground(2, -2), &ChunkCache::new(), None, None);
        let chunk = &generated.chunk;

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let h = chunk.height(x, z);
                assert!(h >= 0 && (h as usize) < WORLD_HEIGHT);
                // Lakes fill to the water line wherever terrain is lower
                if h < water && chunk.kind(x, water as usize, z) != VoxelKind::Air {
                    assert!(matches!(
                        chunk.kind(x, water as usize, z),
                        VoxelKind::Water | VoxelKind::Wood | VoxelKind::Leaves
                    ));
                }
            }
        }
        assert!(chunk.is_dirty());
    }

    #[test]
    fn test_plants_sit_on_grass_above_water() {
        let chunk_gen = generator(4242);
        let (_, generated) = find_vegetated(&chunk_gen).expect("no vegetated chunk near origin");
        let water = chunk_gen.config().water_level;
        for record in &generated.chunk.plants {
            assert!(record.local.y - 1 > water);
            let below = generated.chunk.get_local(record.local - IVec3::Y).unwrap();
            // A trunk grown later may replace the grass under a plant
            assert!(matches!(below.kind, VoxelKind::Grass | VoxelKind::Wood));
        }
    }

    #[test]
    fn test_queued_carve_never_drains_a_lake() {
        let mut config = GenerationConfig::from_seed(7);
        config.water_level = 90;
        let chunk_gen = ChunkGenerator::new(&config);
        let coord = ChunkCoord::ground(1, 0);

        let fresh = chunk_gen.generate(coord, &ChunkCache::new(), None, None);
        let lake: Vec<IVec3> = fresh
            .chunk
            .voxels()
            .iter()
            .enumerate()
            .filter(|(_, v)| v.kind == VoxelKind::Water)
            .map(|(i, _)| {
                let (x, y, z) = Chunk::position(i);
                IVec3::new(x as i32, y as i32, z as i32)
            })
            .collect();
        assert!(!lake.is_empty());

        // A worm from the west neighbour tunnelled through the lake's cells
        // before this chunk was ever generated
        let cache = ChunkCache::new();
        let mut west = GeneratedChunk {
            chunk: Chunk::new(ChunkCoord::ground(0, 0)),
            foreign_writes: ForeignWrites::new(),
            stats: GenerationStats::default(),
        };
        let carves = lake.iter().map(|&local| VoxelWrite::new(local, Voxel::AIR, WriteMode::Carve));
        west.foreign_writes.insert(coord, carves.collect());
        cache.install(west);
        assert_eq!(cache.pending_count(coord), lake.len());

        let generated = chunk_gen.generate(coord, &cache, None, None);
        assert_eq!(cache.pending_count(coord), 0);
        for local in &lake {
            assert_eq!(generated.chunk.get_local(*local).map(|v| v.kind), Some(VoxelKind::Water));
        }
    }

    #[test]
    fn test_sky_chunk_is_empty() {
        let chunk_gen = generator(3);
        let mut config = chunk_gen.config().clone();
        config.clouds.enabled = false;
        let chunk_gen = ChunkGenerator::new(&config);
        let generated = chunk_gen.generate(ChunkCoord::new(0, 1, 0), &ChunkCache::new(), None, None);
        assert_eq!(generated.chunk.count_kind(VoxelKind::Air), crate::voxel::chunk::CHUNK_VOLUME);
    }

    #[test]
    fn test_pass_rng_streams_differ() {
        use rand::Rng;
        let coord = ChunkCoord::ground(0, 0);
        let a: u64 = pass_rng(1, coord, PASS_CAVES).gen_range(0..u64::MAX);
        let b: u64 = pass_rng(1, coord, PASS_TREES).gen_range(0..u64::MAX);
        let c: u64 = pass_rng(1, ChunkCoord::ground(1, 0), PASS_CAVES).gen_range(0..u64::MAX);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
