//! Voxstream - streams a procedurally generated voxel world around a moving observer

pub mod core;
pub mod voxel;
pub mod terrain;
pub mod generation;
pub mod streaming;
pub mod mesh;

pub use crate::core::{Error, Result, WorldConfig};
pub use generation::ChunkGenerator;
pub use mesh::{ChunkMesh, MeshBuilder};
pub use streaming::{ChunkCache, StreamReport, WorldStreamer};
pub use voxel::{Chunk, ChunkCoord, Voxel, VoxelKind};
