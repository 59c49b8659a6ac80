//! Per-tick world streaming around a moving observer.
//!
//! Each `stream` call runs these steps in a fixed order:
//! 1. pick missing or invalidated coordinates in view, nearest first, capped
//! 2. generate them in parallel on the worker pool and join the batch
//! 3. install the results (flushing cross-chunk writes)
//! 4. relink every active chunk's neighbours
//! 5. evict chunks outside the view radius
//! 6. rebuild dirty meshes on the calling thread

use std::time::{Duration, Instant};

use glam::{IVec3, Vec3};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::cache::{ChunkCache, ChunkStatus};
use super::config::StreamingConfig;
use super::priority::ChunkPriorityQueue;
use crate::core::config::WorldConfig;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::generation::{ChunkGenerator, GeneratedChunk};
use crate::mesh::MeshBuilder;
use crate::voxel::chunk::ChunkCoord;
use crate::voxel::voxel::Voxel;

/// What one streaming pass did
#[derive(Clone, Debug, Default)]
pub struct StreamReport {
    pub center: ChunkCoord,
    pub dispatched: Vec<ChunkCoord>,
    pub relinked: usize,
    pub evicted: Vec<ChunkCoord>,
    pub remeshed: usize,
    pub active: usize,
    pub elapsed: Duration,
}

/// Owns the cache, the generator and the worker pool
pub struct WorldStreamer {
    config: StreamingConfig,
    cache: ChunkCache,
    generator: ChunkGenerator,
    mesher: MeshBuilder,
    pool: ThreadPool,
    queue: ChunkPriorityQueue,
}

impl WorldStreamer {
    pub fn new(config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        let threads = config.streaming.resolved_threads();
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("chunk-gen-{}", i))
            .build()
            .map_err(|e| Error::Streaming(format!("failed to build worker pool: {}", e)))?;

        log::info!(
            "World streamer ready: seed {}, view radius {}, {} per tick, {} workers",
            config.generation.seed,
            config.streaming.view_radius,
            config.streaming.max_chunks_per_tick,
            threads,
        );

        Ok(Self {
            config: config.streaming.clone(),
            cache: ChunkCache::new(),
            generator: ChunkGenerator::new(&config.generation),
            mesher: MeshBuilder::new(config.mesh.clone()),
            pool,
            queue: ChunkPriorityQueue::new(config.streaming.view_radius),
        })
    }

    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    pub fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Generate `coord`, replaying its persisted vegetation when it has any
    fn generate(&self, coord: ChunkCoord) -> GeneratedChunk {
        match self.cache.records(coord) {
            Some(records) => {
                self.generator
                    .generate(coord, &self.cache, Some(&records.plants), Some(&records.trees))
            }
            None => self.generator.generate(coord, &self.cache, None, None),
        }
    }

    /// Run one streaming pass around `observer`
    pub fn stream(&mut self, observer: Vec3) -> StreamReport {
        let start = Instant::now();
        let center = ChunkCoord::from_world_pos(observer);
        let center = ChunkCoord::ground(center.x, center.z);

        let cache = &self.cache;
        self.queue.update(observer, |coord| {
            matches!(cache.status(coord), ChunkStatus::Absent | ChunkStatus::Invalidated)
        });
        let dispatched = self.queue.take(self.config.max_chunks_per_tick);

        if !dispatched.is_empty() {
            self.cache.begin_generation(&dispatched);
            let results: Vec<GeneratedChunk> = self
                .pool
                .install(|| dispatched.par_iter().map(|&coord| self.generate(coord)).collect());
            for result in results {
                self.cache.install(result);
            }
        }

        let relinked = self.cache.relink_neighbors();
        let evicted = self.cache.evict_outside(center, self.config.view_radius);
        let remeshed = self.cache.rebuild_dirty_meshes(&self.mesher);

        let report = StreamReport {
            center,
            dispatched,
            relinked,
            evicted,
            remeshed,
            active: self.cache.len(),
            elapsed: start.elapsed(),
        };
        log::debug!(
            "Stream tick at ({}, {}): {} generated, {} relinked, {} evicted, {} remeshed, {} active in {:.2}ms",
            center.x,
            center.z,
            report.dispatched.len(),
            report.relinked,
            report.evicted.len(),
            report.remeshed,
            report.active,
            report.elapsed.as_secs_f64() * 1000.0,
        );
        report
    }

    /// Generate or regenerate one coordinate synchronously and install it.
    ///
    /// A coordinate generated before replays its plants and trees, then
    /// receives its logged and pending writes, so nothing reshuffles.
    pub fn get_or_regenerate(&self, coord: ChunkCoord) -> u64 {
        self.cache.begin_generation(&[coord]);
        let result = self.generate(coord);
        self.cache.install(result)
    }

    /// Schedule an active chunk for regeneration on a later tick
    pub fn invalidate(&self, coord: ChunkCoord) -> bool {
        self.cache.invalidate(coord)
    }

    /// See `ChunkCache::write_voxel_global`
    pub fn write_voxel_global(&self, world: IVec3, voxel: Voxel) {
        self.cache.write_voxel_global(world, voxel);
    }
}
