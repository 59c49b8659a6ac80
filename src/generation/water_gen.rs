//! Lake and shoreline passes for ground-level chunks.

use super::config::ShoreParams;
use super::terrain_gen::HeightGrid;
use crate::terrain::generator::TerrainGenerator;
use crate::voxel::chunk::{Chunk, CHUNK_SIZE, WORLD_HEIGHT};
use crate::voxel::voxel::{Voxel, VoxelKind};

/// Fill every column whose water-line voxel is air down to solid ground.
///
/// Returns the number of water voxels placed.
pub fn fill_water(chunk: &mut Chunk, water_level: i32) -> usize {
    if water_level < 0 || water_level as usize >= WORLD_HEIGHT {
        return 0;
    }
    let top = water_level as usize;
    let mut placed = 0;

    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            if chunk.kind(x, top, z) != VoxelKind::Air {
                continue;
            }
            for y in (0..=top).rev() {
                if chunk.kind(x, y, z).is_solid() {
                    break;
                }
                chunk.set(x, y, z, Voxel::new(VoxelKind::Water));
                placed += 1;
            }
        }
    }
    placed
}

/// Turn surface blocks near the shoreline into sand.
///
/// A column is on the shore when its surface sits within `vertical_band` of
/// the water line and some column within `band` (possibly in a neighbouring
/// chunk) is below the water line. Noise decides which shore columns change.
pub fn place_sand(
    chunk: &mut Chunk,
    grid: &HeightGrid,
    terrain: &TerrainGenerator,
    params: &ShoreParams,
) -> usize {
    let water = terrain.water_level();
    let band = params.band.min(grid.border()).max(0);
    let origin = chunk.coord.voxel_origin();
    let mut changed = 0;

    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let (lx, lz) = (x as i32, z as i32);
            let Some(height) = grid.height(lx, lz) else { continue };
            if (height - water).abs() > params.vertical_band {
                continue;
            }

            let near_water = (-band..=band).any(|dx| {
                (-band..=band).any(|dz| grid.height(lx + dx, lz + dz).is_some_and(|h| h < water))
            });
            if !near_water {
                continue;
            }
            if terrain.shore_noise(origin.x + lx, origin.z + lz) <= params.threshold {
                continue;
            }

            let top = height.clamp(0, WORLD_HEIGHT as i32 - 1) as usize;
            for y in top.saturating_sub(1)..=top {
                if matches!(chunk.kind(x, y, z), VoxelKind::Grass | VoxelKind::Dirt) {
                    chunk.set(x, y, z, Voxel::new(VoxelKind::Sand));
                    changed += 1;
                }
            }
        }
    }
    changed
}
