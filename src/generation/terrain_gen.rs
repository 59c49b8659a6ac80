//! Terrain pass: solid/air classification and surface block typing.

use crate::terrain::biome::BiomeId;
use crate::terrain::generator::TerrainGenerator;
use crate::voxel::chunk::{Chunk, ChunkCoord, CHUNK_SIZE, WORLD_HEIGHT};
use crate::voxel::voxel::{Voxel, VoxelKind};

/// Depth below the surface at which columns switch to stone
pub const DEEP_LAYER: i32 = 5;

/// Column heights and biomes for a chunk plus a border ring
///
/// The border lets shoreline logic look into neighbouring columns with pure
/// lookups, whether or not those chunks exist yet.
pub struct HeightGrid {
    border: i32,
    side: usize,
    heights: Vec<i32>,
    biomes: Vec<BiomeId>,
}

impl HeightGrid {
    /// Sample every column of `coord` plus `border` columns on each side
    pub fn sample(terrain: &TerrainGenerator, coord: ChunkCoord, border: i32) -> Self {
        let border = border.max(0);
        let side = CHUNK_SIZE + 2 * border as usize;
        let origin = coord.voxel_origin();
        let mut heights = Vec::with_capacity(side * side);
        let mut biomes = Vec::with_capacity(side * side);

        for gx in 0..side as i32 {
            for gz in 0..side as i32 {
                let column = terrain.column(origin.x + gx - border, origin.z + gz - border);
                heights.push(column.height);
                biomes.push(column.biome);
            }
        }

        Self { border, side, heights, biomes }
    }

    pub fn border(&self) -> i32 {
        self.border
    }

    fn slot(&self, lx: i32, lz: i32) -> Option<usize> {
        let gx = lx + self.border;
        let gz = lz + self.border;
        if gx < 0 || gz < 0 || gx as usize >= self.side || gz as usize >= self.side {
            return None;
        }
        Some(gx as usize * self.side + gz as usize)
    }

    /// Height at a chunk-local column; `lx`/`lz` may reach into the border
    pub fn height(&self, lx: i32, lz: i32) -> Option<i32> {
        self.slot(lx, lz).map(|i| self.heights[i])
    }

    pub fn biome(&self, lx: i32, lz: i32) -> Option<BiomeId> {
        self.slot(lx, lz).map(|i| self.biomes[i])
    }
}

/// Block kind for voxel `y` of a column with surface `height`
pub fn column_kind(
    y: i32,
    height: i32,
    water_level: i32,
    surface: VoxelKind,
    subsurface: VoxelKind,
) -> VoxelKind {
    if y > height {
        VoxelKind::Air
    } else if y == height && y > water_level {
        surface
    } else if y <= height - DEEP_LAYER {
        VoxelKind::Stone
    } else {
        subsurface
    }
}

/// Fill solid columns and record the height and biome maps
pub fn fill_terrain(chunk: &mut Chunk, grid: &HeightGrid, terrain: &TerrainGenerator) {
    let water = terrain.water_level();
    let table = terrain.biomes().table();

    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let (Some(height), Some(biome)) = (grid.height(x as i32, z as i32), grid.biome(x as i32, z as i32))
            else {
                continue;
            };
            let props = table.get(biome);
            let top = height.min(WORLD_HEIGHT as i32 - 1);

            for y in 0..=top {
                let kind = column_kind(y, height, water, props.surface, props.subsurface);
                chunk.set(x, y as usize, z, Voxel::new(kind));
            }
            chunk.set_height(x, z, top);
            chunk.set_biome(x, z, biome);
        }
    }
}
