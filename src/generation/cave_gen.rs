//! Worm caves: noise-steered random walks that carve spheres of air.

use glam::{IVec3, Vec3};
use rand::Rng;

use super::config::CaveParams;
use super::context::GenerationContext;
use crate::terrain::generator::TerrainGenerator;
use crate::voxel::chunk::CHUNK_SIZE;
use crate::voxel::edit::write::{VoxelSink, WriteMode};
use crate::voxel::voxel::{Voxel, VoxelKind};

/// Why a worm stopped walking
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkEnd {
    /// Used every step it was given
    Exhausted,
    /// Reached the minimum depth
    TooDeep,
    /// Would have breached water
    HitWater,
}

/// Outcome of one worm
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WormStats {
    pub steps: u32,
    pub end: WalkEnd,
}

/// Carve a sphere of air around `center`, skipping water cells
pub fn carve_sphere<S: VoxelSink + ?Sized>(sink: &mut S, center: IVec3, radius: i32) {
    let r2 = radius * radius;
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            for dz in -radius..=radius {
                if dx * dx + dy * dy + dz * dz <= r2 {
                    sink.place(center + IVec3::new(dx, dy, dz), Voxel::AIR, WriteMode::Carve);
                }
            }
        }
    }
}

/// Whether any known cell of the sphere is water
fn sphere_touches_water<S: VoxelSink + ?Sized>(sink: &S, center: IVec3, radius: i32) -> bool {
    let r2 = radius * radius;
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            for dz in -radius..=radius {
                if dx * dx + dy * dy + dz * dz <= r2
                    && sink.kind_at(center + IVec3::new(dx, dy, dz)) == Some(VoxelKind::Water)
                {
                    return true;
                }
            }
        }
    }
    false
}

/// Walk one worm from `start`
pub fn walk_worm<S: VoxelSink + ?Sized, R: Rng>(
    sink: &mut S,
    terrain: &TerrainGenerator,
    params: &CaveParams,
    start: Vec3,
    rng: &mut R,
) -> WormStats {
    let max_steps = rng.gen_range(params.min_steps..=params.max_steps.max(params.min_steps));
    let mut pos = start;

    for step in 0..max_steps {
        let cell = pos.floor().as_ivec3();
        if cell.y <= params.min_depth {
            return WormStats { steps: step, end: WalkEnd::TooDeep };
        }
        let radius = rng.gen_range(params.min_radius..=params.max_radius.max(params.min_radius));
        if sphere_touches_water(sink, cell, radius) {
            return WormStats { steps: step, end: WalkEnd::HitWater };
        }
        carve_sphere(sink, cell, radius);
        pos += terrain.cave_direction(pos, params.frequency);
    }

    WormStats { steps: max_steps, end: WalkEnd::Exhausted }
}

/// Start worms at random dry surface columns of the chunk being generated
pub fn carve_caves<R: Rng>(
    ctx: &mut GenerationContext<'_>,
    terrain: &TerrainGenerator,
    params: &CaveParams,
    rng: &mut R,
) -> Vec<WormStats> {
    let worms = rng.gen_range(0..=params.max_worms);
    let origin = ctx.coord().voxel_origin();
    let mut stats = Vec::new();

    for _ in 0..worms {
        let x = rng.gen_range(0..CHUNK_SIZE);
        let z = rng.gen_range(0..CHUNK_SIZE);
        let height = ctx.chunk.height(x, z);
        if height <= terrain.water_level() {
            continue;
        }
        let start = Vec3::new(
            (origin.x + x as i32) as f32 + 0.5,
            height as f32 + 0.5,
            (origin.z + z as i32) as f32 + 0.5,
        );
        stats.push(walk_worm(ctx, terrain, params, start, rng));
    }
    stats
}
