//! Single-voxel writes and the sink trait structures write through.

use glam::IVec3;

use crate::voxel::chunk::{Chunk, WORLD_HEIGHT};
use crate::voxel::voxel::{Voxel, VoxelKind};

/// How a write combines with what is already there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Replace unconditionally
    Overwrite,
    /// Replace with air, leaving water untouched
    Carve,
    /// Only fill cells that are not solid and not water
    Fill,
}

impl WriteMode {
    /// Whether a write in this mode may replace `existing`
    pub fn allows(self, existing: VoxelKind) -> bool {
        match self {
            WriteMode::Overwrite => true,
            WriteMode::Carve => existing != VoxelKind::Water,
            WriteMode::Fill => !existing.is_solid() && existing != VoxelKind::Water,
        }
    }
}

/// A voxel mutation addressed at a chunk-local position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelWrite {
    pub local: IVec3,
    pub voxel: Voxel,
    pub mode: WriteMode,
}

impl VoxelWrite {
    pub fn new(local: IVec3, voxel: Voxel, mode: WriteMode) -> Self {
        Self { local, voxel, mode }
    }

    /// Apply to a chunk without touching its dirty flag.
    ///
    /// Returns true when a voxel actually changed.
    pub fn apply(&self, chunk: &mut Chunk) -> bool {
        match chunk.get_local(self.local) {
            Some(existing) if existing != self.voxel && self.mode.allows(existing.kind) => {
                chunk.set_local(self.local, self.voxel)
            }
            _ => false,
        }
    }

    /// The single write equivalent to applying `self` and then `next` to the
    /// same cell, so queued writes stay bounded by the chunk volume.
    ///
    /// Exact for every pair except a water `Fill` followed by a `Carve`,
    /// which resolves as the carve; generation never fills with water.
    pub fn then(self, next: VoxelWrite) -> VoxelWrite {
        match (self.mode, next.mode) {
            (_, WriteMode::Overwrite) | (WriteMode::Fill, WriteMode::Carve) => next,
            (mode, _) => {
                let voxel = if next.mode.allows(self.voxel.kind) { next.voxel } else { self.voxel };
                VoxelWrite { local: self.local, voxel, mode }
            }
        }
    }
}

/// Destination for world-addressed voxel writes.
///
/// Structures (trees, caves) only know world coordinates; the sink routes
/// each write to whichever chunk owns it.
pub trait VoxelSink {
    /// Write a voxel at a world position. Positions outside the world's
    /// vertical range are ignored.
    fn place(&mut self, world: IVec3, voxel: Voxel, mode: WriteMode);

    /// Kind currently at a world position, if known to the sink.
    fn kind_at(&self, world: IVec3) -> Option<VoxelKind>;
}

/// Whether a world Y lies inside the slab
#[inline]
pub fn in_world_height(y: i32) -> bool {
    y >= 0 && (y as usize) < WORLD_HEIGHT
}
