//! Cloud layer: a single Y slice of non-solid cloud voxels.

use super::config::CloudParams;
use crate::terrain::generator::TerrainGenerator;
use crate::voxel::chunk::{Chunk, CHUNK_SIZE, WORLD_HEIGHT};
use crate::voxel::voxel::{Voxel, VoxelKind};

/// Mark cloud cells where the cloud field exceeds the threshold.
///
/// Cells already holding a solid voxel are left alone. Returns the number
/// of cloud voxels placed.
pub fn place_clouds(chunk: &mut Chunk, terrain: &TerrainGenerator, params: &CloudParams) -> usize {
    if !params.enabled || params.height >= WORLD_HEIGHT {
        return 0;
    }
    let origin = chunk.coord.voxel_origin();
    let y = params.height;
    let mut placed = 0;

    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let density = terrain.cloud_density(origin.x + x as i32, origin.z + z as i32, params.frequency);
            if density <= params.threshold || chunk.kind(x, y, z).is_solid() {
                continue;
            }
            chunk.set(x, y, z, Voxel::new(VoxelKind::Cloud));
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::biome::BiomeTable;
    use crate::terrain::generator::TerrainParams;
    use crate::voxel::chunk::ChunkCoord;

    #[test]
    fn test_clouds_only_on_layer_and_never_over_solid() {
        let terrain = TerrainGenerator::new(5, TerrainParams::default(), BiomeTable::default(), 41);
        let params = CloudParams { threshold: -1.5, ..CloudParams::default() };
        let mut chunk = Chunk::new(ChunkCoord::ground(3, 3));
        chunk.set(0, params.height, 0, Voxel::new(VoxelKind::Leaves));

        let placed = place_clouds(&mut chunk, &terrain, &params);
        assert_eq!(placed, CHUNK_SIZE * CHUNK_SIZE - 1);
        assert_eq!(chunk.kind(0, params.height, 0), VoxelKind::Leaves);
        assert_eq!(chunk.kind(1, params.height, 1), VoxelKind::Cloud);
        assert_eq!(chunk.count_kind(VoxelKind::Cloud), placed);
    }

    #[test]
    fn test_disabled() {
        let terrain = TerrainGenerator::new(5, TerrainParams::default(), BiomeTable::default(), 41);
        let params = CloudParams { enabled: false, threshold: -1.5, ..CloudParams::default() };
        let mut chunk = Chunk::new(ChunkCoord::ground(0, 0));
        assert_eq!(place_clouds(&mut chunk, &terrain, &params), 0);
    }
}
