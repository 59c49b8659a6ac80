//! Nearest-first ordering of chunk coordinates waiting for generation

use crate::core::types::Vec3;
use crate::voxel::chunk::ChunkCoord;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Priority information for a chunk
#[derive(Clone, Copy, Debug)]
pub struct ChunkPriority {
    pub coord: ChunkCoord,
    /// Squared horizontal distance to the observer's chunk, in chunks
    pub distance_sq: i32,
}

impl ChunkPriority {
    pub fn calculate(coord: ChunkCoord, center: ChunkCoord) -> Self {
        Self { coord, distance_sq: coord.distance_squared(center) }
    }
}

impl Eq for ChunkPriority {}

impl PartialEq for ChunkPriority {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Ord for ChunkPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: nearer chunks are "greater"; ties resolve on the coordinate
        // so a pass is reproducible regardless of scan order
        other
            .distance_sq
            .cmp(&self.distance_sq)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for ChunkPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue for chunk generation
pub struct ChunkPriorityQueue {
    heap: BinaryHeap<ChunkPriority>,
    radius: i32,
}

impl ChunkPriorityQueue {
    /// Queue limited to a Chebyshev radius around the observer
    pub fn new(radius: i32) -> Self {
        Self { heap: BinaryHeap::new(), radius }
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn push(&mut self, priority: ChunkPriority) {
        self.heap.push(priority);
    }

    /// Nearest queued chunk
    pub fn pop(&mut self) -> Option<ChunkPriority> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Rescan the square around `observer`, queueing every ground chunk
    /// for which `wanted` returns true
    pub fn update(&mut self, observer: Vec3, wanted: impl Fn(ChunkCoord) -> bool) {
        self.clear();
        let center = ChunkCoord::from_world_pos(observer);
        let center = ChunkCoord::ground(center.x, center.z);

        for dx in -self.radius..=self.radius {
            for dz in -self.radius..=self.radius {
                let coord = ChunkCoord::ground(center.x + dx, center.z + dz);
                if wanted(coord) {
                    self.push(ChunkPriority::calculate(coord, center));
                }
            }
        }
    }

    /// Pop up to `limit` chunks, nearest first
    pub fn take(&mut self, limit: usize) -> Vec<ChunkCoord> {
        std::iter::from_fn(|| self.pop()).take(limit).map(|p| p.coord).collect()
    }
}
