//! Face-culled chunk meshes
//!
//! Solid voxels become quads, one per face that borders a non-solid cell.
//! Water surfaces, plants and clouds are not triangulated; they are listed as
//! special elements for a separate transparent/billboard pass.

pub mod face;
pub mod builder;

pub use builder::MeshBuilder;
pub use face::Face;

use std::collections::HashMap;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::voxel::voxel::VoxelKind;

/// Per-kind colours, falling back to each kind's base colour
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockPalette {
    pub overrides: HashMap<VoxelKind, [u8; 4]>,
}

impl BlockPalette {
    pub fn color(&self, kind: VoxelKind) -> [u8; 4] {
        self.overrides.get(&kind).copied().unwrap_or_else(|| kind.base_color())
    }

    pub fn with_override(mut self, kind: VoxelKind, color: [u8; 4]) -> Self {
        self.overrides.insert(kind, color);
        self
    }
}

/// Mesh builder parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub palette: BlockPalette,
    /// Largest per-voxel brightness offset added to RGB
    pub color_jitter: u8,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self { palette: BlockPalette::default(), color_jitter: 7 }
    }
}

/// A voxel drawn outside the opaque mesh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecialElement {
    /// Chunk-local position
    pub local: IVec3,
    pub kind: VoxelKind,
    /// Decorative model id for plants
    pub model: Option<u8>,
    /// Topmost water voxel of its column
    pub is_surface: bool,
}

/// Renderable output for one chunk, in chunk-local coordinates
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[u8; 4]>,
    pub indices: Vec<u32>,
    pub specials: Vec<SpecialElement>,
}

impl ChunkMesh {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.specials.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of emitted quads
    pub fn face_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_override() {
        let palette = BlockPalette::default().with_override(VoxelKind::Stone, [1, 2, 3, 255]);
        assert_eq!(palette.color(VoxelKind::Stone), [1, 2, 3, 255]);
        assert_eq!(palette.color(VoxelKind::Sand), VoxelKind::Sand.base_color());
    }

    #[test]
    fn test_mesh_config_json() {
        let config = MeshConfig {
            palette: BlockPalette::default().with_override(VoxelKind::Grass, [0, 200, 0, 255]),
            color_jitter: 3,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: MeshConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_byte_views() {
        let mesh = ChunkMesh {
            positions: vec![[0.0; 3]; 4],
            normals: vec![[0.0, 1.0, 0.0]; 4],
            colors: vec![[255; 4]; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
            specials: Vec::new(),
        };
        assert_eq!(mesh.position_bytes().len(), 48);
        assert_eq!(mesh.color_bytes().len(), 16);
        assert_eq!(mesh.index_bytes().len(), 24);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.triangle_count(), 2);
    }
}
