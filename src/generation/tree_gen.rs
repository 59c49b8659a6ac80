//! Tree placement: picks tree sites and grows L-system trees at them.
//!
//! Only the origin and the unexpanded grammar are persisted. Growth draws its
//! randomness from an RNG seeded by (world seed, origin, grammar), so replaying
//! a record reproduces the same voxels.

use std::collections::HashMap;

use glam::IVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::VegetationParams;
use super::context::GenerationContext;
use crate::terrain::biome::BiomeTable;
use crate::terrain::generator::TerrainGenerator;
use crate::voxel::chunk::{TreeRecord, CHUNK_SIZE, WORLD_HEIGHT};
use crate::voxel::edit::write::VoxelSink;
use crate::voxel::procgen::lsystem::{Grammar, Instruction, TREE_ITERATIONS};
use crate::voxel::procgen::turtle::{Turtle, TurtleStats};
use crate::voxel::voxel::VoxelKind;

/// Grows trees from grammar strings, caching each grammar's instructions
pub struct TreeGrower {
    seed: u32,
    instructions: HashMap<String, Vec<Instruction>>,
}

impl TreeGrower {
    /// Pre-expand every grammar in the biome table
    pub fn new(seed: u32, table: &BiomeTable) -> Self {
        let mut instructions = HashMap::new();
        for grammar in table.biomes.iter().flat_map(|b| b.tree_grammars.iter()) {
            if instructions.contains_key(grammar) {
                continue;
            }
            match Grammar::parse(grammar) {
                Ok(parsed) => {
                    instructions.insert(grammar.clone(), parsed.instructions(TREE_ITERATIONS));
                }
                Err(e) => log::warn!("Skipping tree grammar '{}': {}", grammar, e),
            }
        }
        Self { seed, instructions }
    }

    /// Grow the tree a record describes
    pub fn grow<S: VoxelSink + ?Sized>(&self, sink: &mut S, record: &TreeRecord) -> TurtleStats {
        let mut rng = turtle_rng(self.seed, record.origin, &record.grammar);
        match self.instructions.get(&record.grammar) {
            Some(instructions) => Turtle::new(record.origin).run(instructions, &mut rng, sink),
            None => match Grammar::parse(&record.grammar) {
                Ok(grammar) => {
                    let instructions = grammar.instructions(TREE_ITERATIONS);
                    Turtle::new(record.origin).run(&instructions, &mut rng, sink)
                }
                Err(e) => {
                    log::warn!("Cannot grow tree at {:?}: {}", record.origin, e);
                    TurtleStats::default()
                }
            },
        }
    }

    /// Sample random columns and grow trees on eligible ones
    ///
    /// Eligibility is read from the chunk under construction; growth writes
    /// go through the context so branches can leave the chunk.
    pub fn place_trees<R: Rng>(
        &self,
        ctx: &mut GenerationContext<'_>,
        terrain: &TerrainGenerator,
        params: &VegetationParams,
        rng: &mut R,
    ) -> Vec<TreeRecord> {
        let water = terrain.water_level();
        let table = terrain.biomes().table();
        let mut records = Vec::new();

        for _ in 0..params.tree_samples {
            let x = rng.gen_range(0..CHUNK_SIZE);
            let z = rng.gen_range(0..CHUNK_SIZE);

            let chunk = &ctx.chunk;
            let props = table.get(chunk.biome(x, z));
            if props.tree_grammars.is_empty() || !rng.gen_bool(props.tree_density.clamp(0.0, 1.0)) {
                continue;
            }
            let grammar = &props.tree_grammars[rng.gen_range(0..props.tree_grammars.len())];

            let height = chunk.height(x, z);
            if height <= water || height + 1 >= WORLD_HEIGHT as i32 {
                continue;
            }
            let y = height as usize;
            if chunk.kind(x, y, z) != VoxelKind::Grass
                || !matches!(chunk.kind(x, y + 1, z), VoxelKind::Air | VoxelKind::Plant)
            {
                continue;
            }

            let origin = chunk.coord.voxel_origin() + IVec3::new(x as i32, height, z as i32);
            let record = TreeRecord { origin, grammar: grammar.clone() };
            self.grow(ctx, &record);
            records.push(record);
        }
        records
    }

    /// Re-grow persisted trees
    pub fn replay<S: VoxelSink + ?Sized>(&self, sink: &mut S, records: &[TreeRecord]) {
        for record in records {
            self.grow(sink, record);
        }
    }
}

/// RNG for growing one tree, independent of placement order
pub fn turtle_rng(seed: u32, origin: IVec3, grammar: &str) -> ChaCha8Rng {
    // FNV-1a over the grammar, folded with the origin
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in grammar.bytes() {
        h ^= byte as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h ^= (origin.x as i64 as u64).wrapping_mul(73_856_093);
    h ^= (origin.y as i64 as u64).wrapping_mul(19_349_663);
    h ^= (origin.z as i64 as u64).wrapping_mul(83_492_791);
    h ^= (seed as u64) << 32;
    ChaCha8Rng::seed_from_u64(h)
}
