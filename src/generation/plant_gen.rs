//! Plant placement: decorative single-voxel plants on grass.

use glam::IVec3;
use rand::Rng;

use super::config::VegetationParams;
use crate::terrain::generator::TerrainGenerator;
use crate::voxel::chunk::{Chunk, PlantRecord, CHUNK_SIZE, WORLD_HEIGHT};
use crate::voxel::voxel::{Voxel, VoxelKind};

/// Sample random columns and place plants on eligible grass.
///
/// A column is eligible when its surface is grass above the water line, the
/// cell above is air and the biome has plant models.
pub fn place_plants<R: Rng>(
    chunk: &mut Chunk,
    terrain: &TerrainGenerator,
    params: &VegetationParams,
    rng: &mut R,
) -> Vec<PlantRecord> {
    let water = terrain.water_level();
    let table = terrain.biomes().table();
    let mut records = Vec::new();

    for _ in 0..params.plant_samples {
        let x = rng.gen_range(0..CHUNK_SIZE);
        let z = rng.gen_range(0..CHUNK_SIZE);
        let height = chunk.height(x, z);
        if height <= water || height + 1 >= WORLD_HEIGHT as i32 {
            continue;
        }
        let y = height as usize;
        if chunk.kind(x, y, z) != VoxelKind::Grass || chunk.kind(x, y + 1, z) != VoxelKind::Air {
            continue;
        }
        let models = &table.get(chunk.biome(x, z)).plant_models;
        if models.is_empty() {
            continue;
        }
        let model = models[rng.gen_range(0..models.len())];

        chunk.set(x, y + 1, z, Voxel::plant(model));
        records.push(PlantRecord { local: IVec3::new(x as i32, height + 1, z as i32), model });
    }
    records
}

/// Re-stamp persisted plants exactly where they were recorded.
///
/// A plant is only stamped while its cell is air and the voxel below is
/// still grass, the same rule fresh placement uses; an edit that paved over
/// the ground hides the plant without dropping its record. Returns the number
/// of plants stamped.
pub fn replay_plants(chunk: &mut Chunk, records: &[PlantRecord]) -> usize {
    let mut stamped = 0;
    for record in records {
        let below = chunk.get_local(record.local - IVec3::Y).map(|v| v.kind);
        let cell = chunk.get_local(record.local).map(|v| v.kind);
        if below != Some(VoxelKind::Grass) || cell != Some(VoxelKind::Air) {
            continue;
        }
        chunk.set_local(record.local, Voxel::plant(record.model));
        stamped += 1;
    }
    stamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::biome::BiomeTable;
    use crate::terrain::generator::TerrainParams;
    use crate::voxel::chunk::ChunkCoord;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grass_chunk(height: usize) -> Chunk {
        let mut chunk = Chunk::new(ChunkCoord::ground(0, 0));
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for y in 0..height {
                    chunk.set(x, y, z, Voxel::new(VoxelKind::Dirt));
                }
                chunk.set(x, height, z, Voxel::new(VoxelKind::Grass));
                chunk.set_height(x, z, height as i32);
            }
        }
        chunk
    }

    fn meadow_terrain() -> TerrainGenerator {
        let meadow = BiomeTable::default().biomes[0].clone();
        TerrainGenerator::new(1, TerrainParams::default(), BiomeTable::uniform(meadow), 41)
    }

    #[test]
    fn test_plants_on_grass() {
        let terrain = meadow_terrain();
        let mut chunk = grass_chunk(50);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let params = VegetationParams { plant_samples: 8, tree_samples: 0 };
        let records = place_plants(&mut chunk, &terrain, &params, &mut rng);

        assert!(!records.is_empty());
        for r in &records {
            assert_eq!(r.local.y, 51);
            assert!(r.model < 4);
            let v = chunk.get_local(r.local).unwrap();
            assert_eq!(v, Voxel::plant(r.model));
        }
    }

    #[test]
    fn test_no_plants_below_water() {
        let terrain = meadow_terrain();
        let mut chunk = grass_chunk(30);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let records = place_plants(&mut chunk, &terrain, &VegetationParams::default(), &mut rng);
        assert!(records.is_empty());
        assert_eq!(chunk.count_kind(VoxelKind::Plant), 0);
    }

    #[test]
    fn test_replay_matches() {
        let terrain = meadow_terrain();
        let mut first = grass_chunk(50);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let records = place_plants(&mut first, &terrain, &VegetationParams::default(), &mut rng);

        let mut second = grass_chunk(50);
        assert_eq!(replay_plants(&mut second, &records), records.len());
        assert_eq!(first.voxels(), second.voxels());
    }

    #[test]
    fn test_replay_skips_paved_ground() {
        let terrain = meadow_terrain();
        let mut first = grass_chunk(50);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let records = place_plants(&mut first, &terrain, &VegetationParams::default(), &mut rng);
        let paved = records[0].local;

        let mut second = grass_chunk(50);
        second.set_local(paved - IVec3::Y, Voxel::new(VoxelKind::Stone));
        let stamped = replay_plants(&mut second, &records);

        let others = records.iter().filter(|r| r.local != paved).count();
        assert_eq!(stamped, others);
        assert_eq!(second.get_local(paved).map(|v| v.kind), Some(VoxelKind::Air));
    }
}
