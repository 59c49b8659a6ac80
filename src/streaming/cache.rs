//! Shared chunk store
//!
//! One `RwLock` guards every piece of shared world state: the active chunks,
//! the set of coordinates being generated, persisted vegetation records,
//! pending writes for chunks that do not exist yet and the log of writes
//! already applied on behalf of other chunks. Lookups from generation
//! workers and mesh building share the read lock; installs, edits, relinking
//! and eviction take the write lock.
//!
//! Pending writes and the write log are kept per voxel: a later write to the
//! same cell is folded into the earlier one, so neither grows past one entry
//! per cell of every chunk the world has touched. Both outlive eviction so a
//! returning chunk sees the same edits.

use std::collections::{HashMap, HashSet};

use glam::IVec3;
use parking_lot::RwLock;

use crate::generation::{ForeignWrites, GeneratedChunk};
use crate::mesh::MeshBuilder;
use crate::voxel::chunk::{Chunk, ChunkCoord, HorizontalDir, NeighborLink, PlantRecord, TreeRecord};
use crate::voxel::edit::write::{in_world_height, VoxelWrite, WriteMode};
use crate::voxel::voxel::{Voxel, VoxelKind};

/// Lifecycle state of a chunk coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkStatus {
    /// Not materialized
    Absent,
    /// Dispatched to a worker, not yet installed
    Generating,
    /// Installed with an up-to-date mesh
    Active,
    /// Installed, mesh out of date
    Stale,
    /// Installed, queued for regeneration with replay
    Invalidated,
}

/// Persisted vegetation for one coordinate
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkRecords {
    pub plants: Vec<PlantRecord>,
    pub trees: Vec<TreeRecord>,
}

/// Point-in-time counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub active: usize,
    pub generating: usize,
    pub dirty: usize,
    pub pending_writes: usize,
    pub logged_writes: usize,
    pub recorded_coords: usize,
}

#[derive(Default)]
struct CacheState {
    chunks: HashMap<ChunkCoord, Chunk>,
    generating: HashSet<ChunkCoord>,
    invalidated: HashSet<ChunkCoord>,
    /// Kept across eviction so a returning chunk re-grows the same vegetation
    records: HashMap<ChunkCoord, ChunkRecords>,
    pending: HashMap<ChunkCoord, HashMap<IVec3, VoxelWrite>>,
    /// Net write per voxel applied on behalf of someone else
    write_log: HashMap<ChunkCoord, HashMap<IVec3, VoxelWrite>>,
    next_epoch: u64,
}

fn fold(cells: &mut HashMap<IVec3, VoxelWrite>, write: VoxelWrite) {
    cells
        .entry(write.local)
        .and_modify(|earlier| *earlier = earlier.then(write))
        .or_insert(write);
}

impl CacheState {
    fn log(&mut self, coord: ChunkCoord, write: VoxelWrite) {
        fold(self.write_log.entry(coord).or_default(), write);
    }

    fn queue(&mut self, coord: ChunkCoord, write: VoxelWrite) {
        fold(self.pending.entry(coord).or_default(), write);
    }

    /// Apply to an active chunk or queue for later.
    ///
    /// A chunk being regenerated still shows the write, but the write is also
    /// queued so the install that replaces the chunk applies it again.
    fn route(&mut self, coord: ChunkCoord, write: VoxelWrite) {
        let regenerating = self.generating.contains(&coord);
        match self.chunks.get_mut(&coord) {
            Some(chunk) => {
                if write.apply(chunk) {
                    chunk.mark_dirty();
                }
                if regenerating {
                    self.queue(coord, write);
                } else {
                    self.log(coord, write);
                }
            }
            None => self.queue(coord, write),
        }
    }

    fn flush_foreign(&mut self, foreign: ForeignWrites) {
        for (coord, writes) in foreign {
            for write in writes {
                self.route(coord, write);
            }
        }
    }

    fn status(&self, coord: ChunkCoord) -> ChunkStatus {
        match self.chunks.get(&coord) {
            Some(_) if self.invalidated.contains(&coord) => ChunkStatus::Invalidated,
            Some(chunk) if chunk.is_dirty() => ChunkStatus::Stale,
            Some(_) => ChunkStatus::Active,
            None if self.generating.contains(&coord) => ChunkStatus::Generating,
            None => ChunkStatus::Absent,
        }
    }
}

/// Stable per-voxel order so regeneration stays deterministic
fn sorted(cells: HashMap<IVec3, VoxelWrite>) -> Vec<VoxelWrite> {
    let mut writes: Vec<VoxelWrite> = cells.into_values().collect();
    writes.sort_by_key(|w| (w.local.x, w.local.y, w.local.z));
    writes
}

/// Concurrency-safe owner of every materialized chunk
pub struct ChunkCache {
    state: RwLock<CacheState>,
}

impl Default for ChunkCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkCache {
    pub fn new() -> Self {
        Self { state: RwLock::new(CacheState::default()) }
    }

    /// Number of active chunks
    pub fn len(&self) -> usize {
        self.state.read().chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().chunks.is_empty()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.state.read().chunks.contains_key(&coord)
    }

    pub fn status(&self, coord: ChunkCoord) -> ChunkStatus {
        self.state.read().status(coord)
    }

    /// Sorted coordinates of all active chunks
    pub fn active_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.state.read().chunks.keys().copied().collect();
        coords.sort();
        coords
    }

    /// Run `f` against an active chunk under the read lock
    pub fn with_chunk<R>(&self, coord: ChunkCoord, f: impl FnOnce(&Chunk) -> R) -> Option<R> {
        self.state.read().chunks.get(&coord).map(f)
    }

    /// Voxel at a world position, if its chunk is active
    pub fn voxel_at(&self, world: IVec3) -> Option<Voxel> {
        if !in_world_height(world.y) {
            return None;
        }
        let (coord, local) = ChunkCoord::split_voxel(world);
        self.state.read().chunks.get(&coord).and_then(|chunk| chunk.get_local(local))
    }

    pub fn kind_at(&self, world: IVec3) -> Option<VoxelKind> {
        self.voxel_at(world).map(|v| v.kind)
    }

    /// Persisted vegetation, if the coordinate was ever generated
    pub fn records(&self, coord: ChunkCoord) -> Option<ChunkRecords> {
        self.state.read().records.get(&coord).cloned()
    }

    pub fn pending_count(&self, coord: ChunkCoord) -> usize {
        self.state.read().pending.get(&coord).map_or(0, HashMap::len)
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.read();
        CacheStats {
            active: state.chunks.len(),
            generating: state.generating.len(),
            dirty: state.chunks.values().filter(|c| c.is_dirty()).count(),
            pending_writes: state.pending.values().map(HashMap::len).sum(),
            logged_writes: state.write_log.values().map(HashMap::len).sum(),
            recorded_coords: state.records.len(),
        }
    }

    /// Mark coordinates as dispatched to workers
    pub fn begin_generation(&self, coords: &[ChunkCoord]) {
        let mut state = self.state.write();
        state.generating.extend(coords.iter().copied());
    }

    /// Writes a generation of `coord` must apply after its terrain pass.
    ///
    /// Pending writes are folded into the log first, so each is drained
    /// exactly once but still survives later regenerations. Returns one net
    /// write per voxel.
    pub fn take_writes_for_generation(&self, coord: ChunkCoord) -> Vec<VoxelWrite> {
        let mut state = self.state.write();
        if let Some(pending) = state.pending.remove(&coord) {
            for write in sorted(pending) {
                state.log(coord, write);
            }
        }
        state.write_log.get(&coord).cloned().map(sorted).unwrap_or_default()
    }

    /// Install a generated chunk and flush the writes it made elsewhere.
    ///
    /// Returns the install epoch assigned to the chunk.
    pub fn install(&self, generated: GeneratedChunk) -> u64 {
        let GeneratedChunk { mut chunk, foreign_writes, .. } = generated;
        let coord = chunk.coord;
        let mut state = self.state.write();

        state.flush_foreign(foreign_writes);

        // Writes that arrived while this chunk was being generated
        if let Some(late) = state.pending.remove(&coord) {
            for write in sorted(late) {
                write.apply(&mut chunk);
                state.log(coord, write);
            }
        }

        state.records.insert(
            coord,
            ChunkRecords { plants: chunk.plants.clone(), trees: chunk.trees.clone() },
        );

        state.next_epoch += 1;
        chunk.epoch = state.next_epoch;
        chunk.neighbors = [None; 4];
        chunk.mark_dirty();
        let epoch = chunk.epoch;

        state.chunks.insert(coord, chunk);
        state.generating.remove(&coord);
        state.invalidated.remove(&coord);
        epoch
    }

    /// Write a voxel at a world position.
    ///
    /// Active chunks are edited in place and marked dirty; anything else gets
    /// the write queued until the chunk is generated. Positions outside the
    /// world's vertical range are ignored.
    pub fn write_voxel_global(&self, world: IVec3, voxel: Voxel) {
        if !in_world_height(world.y) {
            return;
        }
        let (coord, local) = ChunkCoord::split_voxel(world);
        let write = VoxelWrite::new(local, voxel, WriteMode::Overwrite);
        self.state.write().route(coord, write);
    }

    /// Queue an active chunk for regeneration with replay
    pub fn invalidate(&self, coord: ChunkCoord) -> bool {
        let mut state = self.state.write();
        if state.chunks.contains_key(&coord) {
            state.invalidated.insert(coord);
            true
        } else {
            false
        }
    }

    /// Recompute every active chunk's four horizontal links.
    ///
    /// A link that appeared, disappeared or now points at a re-installed
    /// chunk marks the chunk dirty. The scan covers both sides of every
    /// boundary, so both chunks sharing a changed boundary end up dirty.
    /// Returns the number of links that changed.
    pub fn relink_neighbors(&self) -> usize {
        let mut state = self.state.write();
        let epochs: HashMap<ChunkCoord, u64> =
            state.chunks.iter().map(|(coord, chunk)| (*coord, chunk.epoch)).collect();

        let mut changed = 0;
        for (coord, chunk) in state.chunks.iter_mut() {
            for dir in HorizontalDir::ALL {
                let target = coord.neighbor(dir);
                let link = epochs.get(&target).map(|&epoch| NeighborLink { coord: target, epoch });
                if chunk.neighbors[dir.index()] != link {
                    chunk.neighbors[dir.index()] = link;
                    chunk.mark_dirty();
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Evict every chunk farther than `radius` (Chebyshev) from `center`,
    /// clearing the links its neighbours held to it.
    ///
    /// Records, pending writes and the write log of evicted chunks are kept;
    /// they grow with the area explored, at most one entry per touched cell.
    pub fn evict_outside(&self, center: ChunkCoord, radius: i32) -> Vec<ChunkCoord> {
        let mut state = self.state.write();
        let mut evicted: Vec<ChunkCoord> = state
            .chunks
            .keys()
            .filter(|coord| coord.chebyshev_distance(center) > radius)
            .copied()
            .collect();
        evicted.sort();

        for coord in &evicted {
            state.chunks.remove(coord);
            state.invalidated.remove(coord);
        }
        for coord in &evicted {
            for dir in HorizontalDir::ALL {
                let Some(neighbor) = state.chunks.get_mut(&coord.neighbor(dir)) else { continue };
                let back = dir.opposite().index();
                if neighbor.neighbors[back].is_some_and(|link| link.coord == *coord) {
                    neighbor.neighbors[back] = None;
                    neighbor.mark_dirty();
                }
            }
        }
        evicted
    }

    /// Rebuild the mesh of every dirty chunk.
    ///
    /// Meshes are built under the read lock and installed under the write
    /// lock; a chunk edited or replaced in between keeps its dirty flag.
    pub fn rebuild_dirty_meshes(&self, builder: &MeshBuilder) -> usize {
        let built: Vec<_> = {
            let state = self.state.read();
            let mut dirty: Vec<&Chunk> = state.chunks.values().filter(|c| c.is_dirty()).collect();
            dirty.sort_by_key(|c| c.coord);
            dirty
                .into_iter()
                .map(|chunk| {
                    let mesh = builder.build(chunk, |dir| {
                        chunk
                            .neighbor(dir)
                            .and_then(|link| state.chunks.get(&link.coord))
                            .filter(|n| n.coord == chunk.coord.neighbor(dir))
                    });
                    (chunk.coord, chunk.epoch, chunk.revision(), mesh)
                })
                .collect()
        };

        let mut state = self.state.write();
        let mut installed = 0;
        for (coord, epoch, revision, mesh) in built {
            if let Some(chunk) = state.chunks.get_mut(&coord) {
                if chunk.epoch == epoch {
                    chunk.install_mesh(mesh, revision);
                    installed += 1;
                }
            }
        }
        installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationStats;
    use crate::mesh::MeshConfig;
    use crate::voxel::chunk::{CHUNK_SIZE, WORLD_HEIGHT};

    fn generated(coord: ChunkCoord) -> GeneratedChunk {
        GeneratedChunk {
            chunk: Chunk::new(coord),
            foreign_writes: ForeignWrites::new(),
            stats: GenerationStats::default(),
        }
    }

    fn stone() -> Voxel {
        Voxel::new(VoxelKind::Stone)
    }

    #[test]
    fn test_status_lifecycle() {
        let cache = ChunkCache::new();
        let coord = ChunkCoord::ground(1, 1);
        assert_eq!(cache.status(coord), ChunkStatus::Absent);

        cache.begin_generation(&[coord]);
        assert_eq!(cache.status(coord), ChunkStatus::Generating);

        cache.install(generated(coord));
        assert_eq!(cache.status(coord), ChunkStatus::Stale);

        assert!(cache.invalidate(coord));
        assert_eq!(cache.status(coord), ChunkStatus::Invalidated);

        cache.install(generated(coord));
        assert_eq!(cache.status(coord), ChunkStatus::Stale);

        cache.rebuild_dirty_meshes(&MeshBuilder::new(MeshConfig::default()));
        assert_eq!(cache.status(coord), ChunkStatus::Active);

        cache.evict_outside(ChunkCoord::ground(10, 10), 1);
        assert_eq!(cache.status(coord), ChunkStatus::Absent);
        assert!(!cache.invalidate(coord));
    }

    #[test]
    fn test_install_assigns_increasing_epochs() {
        let cache = ChunkCache::new();
        let a = cache.install(generated(ChunkCoord::ground(0, 0)));
        let b = cache.install(generated(ChunkCoord::ground(0, 0)));
        assert!(b > a);
        assert_eq!(cache.with_chunk(ChunkCoord::ground(0, 0), |c| c.epoch), Some(b));
    }

    #[test]
    fn test_write_to_active_chunk_marks_dirty() {
        let cache = ChunkCache::new();
        let coord = ChunkCoord::ground(-1, 0);
        cache.install(generated(coord));
        cache.rebuild_dirty_meshes(&MeshBuilder::new(MeshConfig::default()));
        assert!(!cache.with_chunk(coord, |c| c.is_dirty()).unwrap());

        let world = IVec3::new(-3, 20, 5);
        cache.write_voxel_global(world, stone());
        assert_eq!(cache.kind_at(world), Some(VoxelKind::Stone));
        assert!(cache.with_chunk(coord, |c| c.is_dirty()).unwrap());
        assert_eq!(cache.with_chunk(coord, |c| c.kind(13, 20, 5)), Some(VoxelKind::Stone));
        assert_eq!(cache.pending_count(coord), 0);
    }

    #[test]
    fn test_write_to_absent_chunk_is_pending() {
        let cache = ChunkCache::new();
        let world = IVec3::new(-17, 3, 33);
        cache.write_voxel_global(world, stone());

        let (coord, local) = ChunkCoord::split_voxel(world);
        assert_eq!(coord, ChunkCoord::ground(-2, 2));
        assert_eq!(local, IVec3::new(15, 3, 1));
        assert_eq!(cache.pending_count(coord), 1);
        assert_eq!(cache.kind_at(world), None);
    }

    #[test]
    fn test_writes_outside_world_height_ignored() {
        let cache = ChunkCache::new();
        cache.write_voxel_global(IVec3::new(0, -1, 0), stone());
        cache.write_voxel_global(IVec3::new(0, WORLD_HEIGHT as i32, 0), stone());
        assert_eq!(cache.stats().pending_writes, 0);
    }

    #[test]
    fn test_pending_drained_once_then_logged() {
        let cache = ChunkCache::new();
        let coord = ChunkCoord::ground(0, 0);
        cache.write_voxel_global(IVec3::new(1, 2, 3), stone());

        let first = cache.take_writes_for_generation(coord);
        assert_eq!(first.len(), 1);
        assert_eq!(cache.pending_count(coord), 0);

        // The drained write is replayed from the log, not re-queued
        let second = cache.take_writes_for_generation(coord);
        assert_eq!(second, first);
        assert_eq!(cache.stats().pending_writes, 0);
        assert_eq!(cache.stats().logged_writes, 1);
    }

    #[test]
    fn test_late_pending_applied_on_install() {
        let cache = ChunkCache::new();
        let coord = ChunkCoord::ground(0, 0);
        cache.begin_generation(&[coord]);
        cache.write_voxel_global(IVec3::new(4, 10, 4), stone());
        assert_eq!(cache.pending_count(coord), 1);

        cache.install(generated(coord));
        assert_eq!(cache.pending_count(coord), 0);
        assert_eq!(cache.kind_at(IVec3::new(4, 10, 4)), Some(VoxelKind::Stone));
    }

    #[test]
    fn test_neighbor_write_during_regeneration_survives_install() {
        let cache = ChunkCache::new();
        let a = ChunkCoord::ground(0, 0);
        let b = ChunkCoord::ground(1, 0);
        cache.install(generated(b));
        assert!(cache.invalidate(b));

        cache.begin_generation(&[b, a]);
        assert!(cache.take_writes_for_generation(b).is_empty());

        // A finishes first and drops leaves into B while B is still regenerating
        let mut result = generated(a);
        let leaf = Voxel::new(VoxelKind::Leaves);
        result
            .foreign_writes
            .insert(b, vec![VoxelWrite::new(IVec3::new(0, 60, 0), leaf, WriteMode::Fill)]);
        cache.install(result);
        assert_eq!(cache.kind_at(IVec3::new(16, 60, 0)), Some(VoxelKind::Leaves));
        assert_eq!(cache.pending_count(b), 1);

        cache.install(generated(b));
        assert_eq!(cache.kind_at(IVec3::new(16, 60, 0)), Some(VoxelKind::Leaves));
        assert_eq!(cache.pending_count(b), 0);
        assert_eq!(cache.stats().logged_writes, 1);
    }

    #[test]
    fn test_edit_during_regeneration_survives_install() {
        let cache = ChunkCache::new();
        let coord = ChunkCoord::ground(0, 0);
        cache.install(generated(coord));
        cache.invalidate(coord);
        cache.begin_generation(&[coord]);
        let replay = cache.take_writes_for_generation(coord);

        let world = IVec3::new(3, 30, 3);
        cache.write_voxel_global(world, stone());
        assert_eq!(cache.kind_at(world), Some(VoxelKind::Stone));

        let mut result = generated(coord);
        for write in replay {
            write.apply(&mut result.chunk);
        }
        cache.install(result);
        assert_eq!(cache.kind_at(world), Some(VoxelKind::Stone));

        // The edit is now part of what the next regeneration replays
        let next = cache.take_writes_for_generation(coord);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].voxel, stone());
    }

    #[test]
    fn test_pending_writes_fold_per_voxel() {
        let cache = ChunkCache::new();
        let coord = ChunkCoord::ground(4, 4);
        let world = IVec3::new(64, 12, 64);
        for _ in 0..100 {
            cache.write_voxel_global(world, stone());
        }
        cache.write_voxel_global(world + IVec3::Y, stone());
        assert_eq!(cache.pending_count(coord), 2);

        // Overlapping carve spheres and leaves collapse to one write per cell
        let mut result = generated(ChunkCoord::ground(3, 4));
        let carves = (0..50).map(|_| VoxelWrite::new(IVec3::new(0, 12, 0), Voxel::AIR, WriteMode::Carve));
        let leaves = std::iter::once(VoxelWrite::new(
            IVec3::new(0, 12, 0),
            Voxel::new(VoxelKind::Leaves),
            WriteMode::Fill,
        ));
        result.foreign_writes.insert(coord, carves.chain(leaves).collect());
        cache.install(result);
        assert_eq!(cache.pending_count(coord), 2);
        assert_eq!(cache.stats().pending_writes, 2);

        let writes = cache.take_writes_for_generation(coord);
        let mut chunk = Chunk::new(coord);
        for write in &writes {
            write.apply(&mut chunk);
        }
        assert_eq!(chunk.kind(0, 12, 0), VoxelKind::Leaves);
        assert_eq!(chunk.kind(0, 13, 0), VoxelKind::Stone);
    }

    #[test]
    fn test_foreign_writes_routed_on_install() {
        let cache = ChunkCache::new();
        let active = ChunkCoord::ground(1, 0);
        let absent = ChunkCoord::ground(-1, 0);
        cache.install(generated(active));
        cache.rebuild_dirty_meshes(&MeshBuilder::new(MeshConfig::default()));

        let mut result = generated(ChunkCoord::ground(0, 0));
        let leaf = Voxel::new(VoxelKind::Leaves);
        result
            .foreign_writes
            .insert(active, vec![VoxelWrite::new(IVec3::new(0, 60, 0), leaf, WriteMode::Fill)]);
        result
            .foreign_writes
            .insert(absent, vec![VoxelWrite::new(IVec3::new(15, 60, 0), leaf, WriteMode::Fill)]);
        cache.install(result);

        assert_eq!(cache.kind_at(IVec3::new(16, 60, 0)), Some(VoxelKind::Leaves));
        assert_eq!(cache.status(active), ChunkStatus::Stale);
        assert_eq!(cache.pending_count(absent), 1);
    }

    #[test]
    fn test_relink_is_symmetric() {
        let cache = ChunkCache::new();
        let a = ChunkCoord::ground(0, 0);
        let b = ChunkCoord::ground(1, 0);
        cache.install(generated(a));
        cache.install(generated(b));
        assert_eq!(cache.relink_neighbors(), 2);

        let a_link = cache.with_chunk(a, |c| c.neighbor(HorizontalDir::PosX)).unwrap();
        let b_link = cache.with_chunk(b, |c| c.neighbor(HorizontalDir::NegX)).unwrap();
        assert_eq!(a_link.map(|l| l.coord), Some(b));
        assert_eq!(b_link.map(|l| l.coord), Some(a));
        assert_eq!(cache.with_chunk(a, |c| c.neighbor(HorizontalDir::NegX)).unwrap(), None);

        // Stable links produce no further changes
        assert_eq!(cache.relink_neighbors(), 0);
    }

    #[test]
    fn test_replacement_marks_both_sides_dirty() {
        let cache = ChunkCache::new();
        let builder = MeshBuilder::new(MeshConfig::default());
        let a = ChunkCoord::ground(0, 0);
        let b = ChunkCoord::ground(0, 1);
        cache.install(generated(a));
        cache.install(generated(b));
        cache.relink_neighbors();
        cache.rebuild_dirty_meshes(&builder);
        assert_eq!(cache.stats().dirty, 0);

        cache.install(generated(b));
        assert_eq!(cache.relink_neighbors(), 2);
        assert_eq!(cache.status(a), ChunkStatus::Stale);
        assert_eq!(cache.status(b), ChunkStatus::Stale);
    }

    #[test]
    fn test_eviction_clears_back_links() {
        let cache = ChunkCache::new();
        let builder = MeshBuilder::new(MeshConfig::default());
        for x in -1..=1 {
            cache.install(generated(ChunkCoord::ground(x, 0)));
        }
        cache.relink_neighbors();
        cache.rebuild_dirty_meshes(&builder);

        let evicted = cache.evict_outside(ChunkCoord::ground(-1, 0), 1);
        assert_eq!(evicted, vec![ChunkCoord::ground(1, 0)]);
        let link = cache.with_chunk(ChunkCoord::ground(0, 0), |c| c.neighbor(HorizontalDir::PosX));
        assert_eq!(link, Some(None));
        assert_eq!(cache.status(ChunkCoord::ground(0, 0)), ChunkStatus::Stale);
        assert_eq!(cache.status(ChunkCoord::ground(-1, 0)), ChunkStatus::Active);
    }

    #[test]
    fn test_records_survive_eviction() {
        let cache = ChunkCache::new();
        let coord = ChunkCoord::ground(3, 3);
        let mut result = generated(coord);
        result.chunk.plants.push(PlantRecord { local: IVec3::new(1, 50, 1), model: 2 });
        cache.install(result);

        cache.evict_outside(ChunkCoord::ground(0, 0), 1);
        assert!(!cache.contains(coord));
        let records = cache.records(coord).unwrap();
        assert_eq!(records.plants.len(), 1);
        assert!(cache.records(ChunkCoord::ground(9, 9)).is_none());
    }

    #[test]
    fn test_rebuild_builds_mesh_and_clears_dirty() {
        let cache = ChunkCache::new();
        let coord = ChunkCoord::ground(0, 0);
        let mut result = generated(coord);
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                result.chunk.set(x, 0, z, stone());
            }
        }
        cache.install(result);

        let rebuilt = cache.rebuild_dirty_meshes(&MeshBuilder::new(MeshConfig::default()));
        assert_eq!(rebuilt, 1);
        let faces = cache.with_chunk(coord, |c| c.mesh().map(|m| m.face_count())).flatten();
        // Top faces plus the four unlinked sides; the floor is culled
        assert_eq!(faces, Some(CHUNK_SIZE * CHUNK_SIZE + 4 * CHUNK_SIZE));
        assert_eq!(cache.rebuild_dirty_meshes(&MeshBuilder::new(MeshConfig::default())), 0);
    }
}
