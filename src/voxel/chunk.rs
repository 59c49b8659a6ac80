//! Chunk system for managing vertical slabs of voxel space
//!
//! The world is a single vertical slab: every chunk spans the full
//! `WORLD_HEIGHT`, so chunk coordinates only vary along X and Z.

use glam::{IVec3, Vec3};

use crate::mesh::ChunkMesh;
use crate::terrain::biome::BiomeId;
use crate::voxel::voxel::{Voxel, VoxelKind};

/// Horizontal size of a chunk in voxels
pub const CHUNK_SIZE: usize = 16;

/// Vertical size of every chunk (and of the world) in voxels
pub const WORLD_HEIGHT: usize = 112;

/// Y layer used by the cloud pass
pub const CLOUD_HEIGHT: usize = 92;

/// Voxels per chunk
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * WORLD_HEIGHT * CHUNK_SIZE;

/// Integer coordinate identifying a chunk in the world grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Ground-level chunk at the given horizontal grid position
    pub fn ground(x: i32, z: i32) -> Self {
        Self { x, y: 0, z }
    }

    /// Convert world position to chunk coordinate (floor division)
    pub fn from_world_pos(pos: Vec3) -> Self {
        Self {
            x: (pos.x / CHUNK_SIZE as f32).floor() as i32,
            y: (pos.y / WORLD_HEIGHT as f32).floor() as i32,
            z: (pos.z / CHUNK_SIZE as f32).floor() as i32,
        }
    }

    /// Split a world voxel position into its owning chunk and local offset
    pub fn split_voxel(pos: IVec3) -> (Self, IVec3) {
        let cs = CHUNK_SIZE as i32;
        let wh = WORLD_HEIGHT as i32;
        let coord = Self {
            x: pos.x.div_euclid(cs),
            y: pos.y.div_euclid(wh),
            z: pos.z.div_euclid(cs),
        };
        let local = IVec3::new(pos.x.rem_euclid(cs), pos.y.rem_euclid(wh), pos.z.rem_euclid(cs));
        (coord, local)
    }

    /// World voxel position of this chunk's minimum corner
    pub fn voxel_origin(&self) -> IVec3 {
        IVec3::new(
            self.x * CHUNK_SIZE as i32,
            self.y * WORLD_HEIGHT as i32,
            self.z * CHUNK_SIZE as i32,
        )
    }

    /// Get the world-space origin (minimum corner) of this chunk
    pub fn world_origin(&self) -> Vec3 {
        self.voxel_origin().as_vec3()
    }

    /// Adjacent coordinate in a horizontal direction
    pub fn neighbor(&self, dir: HorizontalDir) -> Self {
        let (dx, dz) = dir.offset();
        Self::new(self.x + dx, self.y, self.z + dz)
    }

    /// Horizontal Chebyshev distance in chunk units
    pub fn chebyshev_distance(&self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// Squared horizontal distance in chunk units (for nearest-first ordering)
    pub fn distance_squared(&self, other: ChunkCoord) -> i32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }
}

/// One of the four horizontal neighbour directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalDir {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl HorizontalDir {
    pub const ALL: [HorizontalDir; 4] = [
        HorizontalDir::PosX,
        HorizontalDir::NegX,
        HorizontalDir::PosZ,
        HorizontalDir::NegZ,
    ];

    /// Slot in `Chunk::neighbors`
    pub fn index(self) -> usize {
        match self {
            HorizontalDir::PosX => 0,
            HorizontalDir::NegX => 1,
            HorizontalDir::PosZ => 2,
            HorizontalDir::NegZ => 3,
        }
    }

    /// (dx, dz) step in chunk units
    pub fn offset(self) -> (i32, i32) {
        match self {
            HorizontalDir::PosX => (1, 0),
            HorizontalDir::NegX => (-1, 0),
            HorizontalDir::PosZ => (0, 1),
            HorizontalDir::NegZ => (0, -1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            HorizontalDir::PosX => HorizontalDir::NegX,
            HorizontalDir::NegX => HorizontalDir::PosX,
            HorizontalDir::PosZ => HorizontalDir::NegZ,
            HorizontalDir::NegZ => HorizontalDir::PosZ,
        }
    }
}

/// Non-owning reference to a neighbouring chunk, resolved through the cache
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborLink {
    pub coord: ChunkCoord,
    /// Install epoch of the neighbour; a new epoch means it was replaced
    pub epoch: u64,
}

/// Persisted plant placement, replayed verbatim on regeneration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlantRecord {
    /// Chunk-local position of the plant voxel
    pub local: IVec3,
    /// Decorative model id
    pub model: u8,
}

/// Persisted tree placement: origin plus the unexpanded grammar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeRecord {
    /// World voxel position of the trunk base
    pub origin: IVec3,
    /// Rule string, e.g. `F=F[A(3)L]F`
    pub grammar: String,
}

/// A vertical slab of voxels plus derived per-column data
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Coordinate of this chunk in the world grid
    pub coord: ChunkCoord,
    voxels: Vec<Voxel>,
    /// Highest solid Y per column after the terrain pass, -1 for none
    height_map: Vec<i32>,
    biome_map: Vec<BiomeId>,
    /// Neighbour links indexed by `HorizontalDir::index`
    pub neighbors: [Option<NeighborLink>; 4],
    /// Plant placements owned by this chunk
    pub plants: Vec<PlantRecord>,
    /// Tree placements rooted in this chunk
    pub trees: Vec<TreeRecord>,
    /// Install epoch assigned by the cache
    pub epoch: u64,
    dirty: bool,
    revision: u64,
    mesh: Option<ChunkMesh>,
}

impl Chunk {
    /// Create a new all-air chunk at the given coordinate
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            voxels: vec![Voxel::AIR; CHUNK_VOLUME],
            height_map: vec![-1; CHUNK_SIZE * CHUNK_SIZE],
            biome_map: vec![BiomeId::default(); CHUNK_SIZE * CHUNK_SIZE],
            neighbors: [None; 4],
            plants: Vec::new(),
            trees: Vec::new(),
            epoch: 0,
            dirty: true,
            revision: 0,
            mesh: None,
        }
    }

    /// Linear index; x-major, then y, then z
    #[inline]
    pub fn index(x: usize, y: usize, z: usize) -> usize {
        (x * WORLD_HEIGHT + y) * CHUNK_SIZE + z
    }

    /// Inverse of `index`
    #[inline]
    pub fn position(index: usize) -> (usize, usize, usize) {
        let x = index / (WORLD_HEIGHT * CHUNK_SIZE);
        let y = (index / CHUNK_SIZE) % WORLD_HEIGHT;
        let z = index % CHUNK_SIZE;
        (x, y, z)
    }

    /// Whether a signed local position lies inside the chunk
    #[inline]
    pub fn in_bounds(local: IVec3) -> bool {
        local.x >= 0
            && local.y >= 0
            && local.z >= 0
            && (local.x as usize) < CHUNK_SIZE
            && (local.y as usize) < WORLD_HEIGHT
            && (local.z as usize) < CHUNK_SIZE
    }

    /// Voxel at an in-range local position
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Voxel {
        self.voxels[Self::index(x, y, z)]
    }

    /// Voxel at a signed local position, `None` when outside the chunk
    pub fn get_local(&self, local: IVec3) -> Option<Voxel> {
        if Self::in_bounds(local) {
            Some(self.get(local.x as usize, local.y as usize, local.z as usize))
        } else {
            None
        }
    }

    /// Kind at an in-range local position
    #[inline]
    pub fn kind(&self, x: usize, y: usize, z: usize) -> VoxelKind {
        self.get(x, y, z).kind
    }

    /// Overwrite a voxel without touching the dirty flag (generation use)
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: Voxel) {
        self.voxels[Self::index(x, y, z)] = voxel;
    }

    /// Overwrite at a signed local position; out-of-range writes are dropped
    pub fn set_local(&mut self, local: IVec3, voxel: Voxel) -> bool {
        if Self::in_bounds(local) {
            self.set(local.x as usize, local.y as usize, local.z as usize, voxel);
            true
        } else {
            false
        }
    }

    /// Edit an installed chunk: write and mark the mesh stale
    pub fn edit(&mut self, local: IVec3, voxel: Voxel) -> bool {
        let written = self.set_local(local, voxel);
        if written {
            self.mark_dirty();
        }
        written
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Cached highest solid Y of a column
    pub fn height(&self, x: usize, z: usize) -> i32 {
        self.height_map[x * CHUNK_SIZE + z]
    }

    pub fn set_height(&mut self, x: usize, z: usize, height: i32) {
        self.height_map[x * CHUNK_SIZE + z] = height;
    }

    pub fn height_map(&self) -> &[i32] {
        &self.height_map
    }

    pub fn biome(&self, x: usize, z: usize) -> BiomeId {
        self.biome_map[x * CHUNK_SIZE + z]
    }

    pub fn set_biome(&mut self, x: usize, z: usize, biome: BiomeId) {
        self.biome_map[x * CHUNK_SIZE + z] = biome;
    }

    /// Neighbour link in a direction
    pub fn neighbor(&self, dir: HorizontalDir) -> Option<NeighborLink> {
        self.neighbors[dir.index()]
    }

    /// Flag the mesh as out of date and bump the revision
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Monotonic edit counter, used to detect edits racing a mesh rebuild
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Install a freshly built mesh
    ///
    /// The dirty flag is only cleared when no edit landed since `revision`
    /// was sampled for the build.
    pub fn install_mesh(&mut self, mesh: ChunkMesh, revision: u64) {
        self.mesh = Some(mesh);
        if self.revision == revision {
            self.dirty = false;
        }
    }

    /// Number of voxels of a kind (diagnostics and tests)
    pub fn count_kind(&self, kind: VoxelKind) -> usize {
        self.voxels.iter().filter(|v| v.kind == kind).count()
    }
}
