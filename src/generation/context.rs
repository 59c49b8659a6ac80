//! Write routing for a chunk under construction.
//!
//! Structures only know world coordinates. Writes that land in the chunk being
//! built go straight into it; writes that land elsewhere are collected and
//! handed to the cache when the chunk is installed, so no worker ever mutates
//! a chunk another worker may still be building.

use std::collections::HashMap;

use glam::IVec3;

use crate::streaming::cache::ChunkCache;
use crate::voxel::chunk::{Chunk, ChunkCoord};
use crate::voxel::edit::write::{in_world_height, VoxelSink, VoxelWrite, WriteMode};
use crate::voxel::voxel::{Voxel, VoxelKind};

/// Writes addressed to chunks other than the one being generated
pub type ForeignWrites = HashMap<ChunkCoord, Vec<VoxelWrite>>;

/// Sink used by every generation pass
pub struct GenerationContext<'a> {
    pub chunk: Chunk,
    cache: &'a ChunkCache,
    foreign: ForeignWrites,
    local_writes: usize,
}

impl<'a> GenerationContext<'a> {
    pub fn new(chunk: Chunk, cache: &'a ChunkCache) -> Self {
        Self { chunk, cache, foreign: HashMap::new(), local_writes: 0 }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.chunk.coord
    }

    /// Writes applied to the chunk under construction so far
    pub fn local_writes(&self) -> usize {
        self.local_writes
    }

    pub fn foreign_write_count(&self) -> usize {
        self.foreign.values().map(Vec::len).sum()
    }

    /// Hand back the chunk and the writes destined for other chunks
    pub fn finish(self) -> (Chunk, ForeignWrites) {
        (self.chunk, self.foreign)
    }
}

impl VoxelSink for GenerationContext<'_> {
    fn place(&mut self, world: IVec3, voxel: Voxel, mode: WriteMode) {
        if !in_world_height(world.y) {
            return;
        }
        let (coord, local) = ChunkCoord::split_voxel(world);
        let write = VoxelWrite::new(local, voxel, mode);
        if coord == self.chunk.coord {
            if write.apply(&mut self.chunk) {
                self.local_writes += 1;
            }
        } else {
            self.foreign.entry(coord).or_default().push(write);
        }
    }

    fn kind_at(&self, world: IVec3) -> Option<VoxelKind> {
        if !in_world_height(world.y) {
            return None;
        }
        let (coord, local) = ChunkCoord::split_voxel(world);
        if coord == self.chunk.coord {
            self.chunk.get_local(local).map(|v| v.kind)
        } else {
            self.cache.kind_at(world)
        }
    }
}
