//! Voxel data structures and operations

pub mod voxel;
pub mod chunk;
pub mod edit;
pub mod procgen;

pub use voxel::{Voxel, VoxelKind};
pub use chunk::{
    Chunk, ChunkCoord, HorizontalDir, NeighborLink, PlantRecord, TreeRecord, CHUNK_SIZE,
    CLOUD_HEIGHT, WORLD_HEIGHT,
};
pub use edit::{VoxelSink, VoxelWrite, WriteMode};
