//! Voxel edit primitives shared by generation passes and the chunk cache.
//!
//! Edits are addressed either to a chunk-local position (`VoxelWrite`) or to a
//! world position through a `VoxelSink`, which decides whether the write lands
//! in a chunk directly or is deferred.

pub mod write;

pub use write::{VoxelSink, VoxelWrite, WriteMode};
