//! Voxel data type

use serde::{Deserialize, Serialize};

/// Closed set of voxel kinds
///
/// Property lookups (solidity, visibility, default color) are total matches
/// over this enum.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoxelKind {
    #[default]
    Air = 0,
    Dirt,
    Grass,
    Stone,
    Sand,
    Water,
    Wood,
    Leaves,
    Plant,
    Cloud,
}

impl VoxelKind {
    /// Every kind, in discriminant order
    pub const ALL: [VoxelKind; 10] = [
        VoxelKind::Air,
        VoxelKind::Dirt,
        VoxelKind::Grass,
        VoxelKind::Stone,
        VoxelKind::Sand,
        VoxelKind::Water,
        VoxelKind::Wood,
        VoxelKind::Leaves,
        VoxelKind::Plant,
        VoxelKind::Cloud,
    ];

    /// Solid kinds occlude neighbouring faces and are meshed as cubes.
    pub fn is_solid(self) -> bool {
        match self {
            VoxelKind::Dirt
            | VoxelKind::Grass
            | VoxelKind::Stone
            | VoxelKind::Sand
            | VoxelKind::Wood
            | VoxelKind::Leaves => true,
            VoxelKind::Air | VoxelKind::Water | VoxelKind::Plant | VoxelKind::Cloud => false,
        }
    }

    /// Visible kinds produce some geometry (cube faces or a special element).
    pub fn is_visible(self) -> bool {
        !matches!(self, VoxelKind::Air)
    }

    /// Kinds rendered by a separate pass instead of the opaque buffers.
    pub fn is_special(self) -> bool {
        matches!(self, VoxelKind::Water | VoxelKind::Plant | VoxelKind::Cloud)
    }

    /// Default RGBA color.
    pub fn base_color(self) -> [u8; 4] {
        match self {
            VoxelKind::Air => [0, 0, 0, 0],
            VoxelKind::Dirt => [134, 96, 67, 255],
            VoxelKind::Grass => [72, 174, 34, 255],
            VoxelKind::Stone => [128, 128, 128, 255],
            VoxelKind::Sand => [236, 221, 178, 255],
            VoxelKind::Water => [0, 0, 255, 110],
            VoxelKind::Wood => [126, 90, 57, 255],
            VoxelKind::Leaves => [73, 129, 49, 255],
            VoxelKind::Plant => [96, 160, 64, 255],
            VoxelKind::Cloud => [255, 255, 255, 200],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VoxelKind::Air => "air",
            VoxelKind::Dirt => "dirt",
            VoxelKind::Grass => "grass",
            VoxelKind::Stone => "stone",
            VoxelKind::Sand => "sand",
            VoxelKind::Water => "water",
            VoxelKind::Wood => "wood",
            VoxelKind::Leaves => "leaves",
            VoxelKind::Plant => "plant",
            VoxelKind::Cloud => "cloud",
        }
    }
}

/// Single voxel: a kind plus optional decorative payload
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub kind: VoxelKind,
    /// Decorative sub-model id (Plant voxels only)
    pub model: Option<u8>,
    /// Explicit RGBA override
    pub color: Option<[u8; 4]>,
}

impl Voxel {
    /// Empty/air voxel
    pub const AIR: Voxel = Voxel::new(VoxelKind::Air);

    /// Plain voxel of the given kind
    pub const fn new(kind: VoxelKind) -> Self {
        Self { kind, model: None, color: None }
    }

    /// Plant voxel referencing a decorative model
    pub const fn plant(model: u8) -> Self {
        Self { kind: VoxelKind::Plant, model: Some(model), color: None }
    }

    /// Copy of this voxel with an explicit color
    pub fn with_color(self, color: [u8; 4]) -> Self {
        Self { color: Some(color), ..self }
    }

    pub fn is_air(&self) -> bool {
        self.kind == VoxelKind::Air
    }

    pub fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }
}

impl From<VoxelKind> for Voxel {
    fn from(kind: VoxelKind) -> Self {
        Voxel::new(kind)
    }
}
