//! Cube face templates

use glam::IVec3;

use crate::voxel::chunk::HorizontalDir;

/// One of the six faces of a voxel cube
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Step to the voxel this face looks at
    pub fn offset(self) -> IVec3 {
        match self {
            Face::PosX => IVec3::X,
            Face::NegX => IVec3::NEG_X,
            Face::PosY => IVec3::Y,
            Face::NegY => IVec3::NEG_Y,
            Face::PosZ => IVec3::Z,
            Face::NegZ => IVec3::NEG_Z,
        }
    }

    pub fn normal(self) -> [f32; 3] {
        self.offset().as_vec3().to_array()
    }

    /// Chunk neighbour this face can look into; `None` for the vertical faces
    pub fn horizontal(self) -> Option<HorizontalDir> {
        match self {
            Face::PosX => Some(HorizontalDir::PosX),
            Face::NegX => Some(HorizontalDir::NegX),
            Face::PosZ => Some(HorizontalDir::PosZ),
            Face::NegZ => Some(HorizontalDir::NegZ),
            Face::PosY | Face::NegY => None,
        }
    }

    /// Unit-cube corners of the face, in index order
    pub fn corners(self) -> [[f32; 3]; 4] {
        match self {
            Face::PosX => [[1., 0., 0.], [1., 1., 0.], [1., 1., 1.], [1., 0., 1.]],
            Face::NegX => [[0., 0., 1.], [0., 1., 1.], [0., 1., 0.], [0., 0., 0.]],
            Face::PosY => [[0., 1., 1.], [1., 1., 1.], [1., 1., 0.], [0., 1., 0.]],
            Face::NegY => [[0., 0., 0.], [1., 0., 0.], [1., 0., 1.], [0., 0., 1.]],
            Face::PosZ => [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]],
            Face::NegZ => [[1., 0., 0.], [0., 0., 0.], [0., 1., 0.], [1., 1., 0.]],
        }
    }
}

/// Two triangles over the four corners starting at `base`
#[inline]
pub fn quad_indices(base: u32) -> [u32; 6] {
    [base, base + 1, base + 2, base, base + 2, base + 3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_corners_lie_on_face_plane() {
        for face in Face::ALL {
            let n = Vec3::from(face.normal());
            // The face plane is at 1 along positive normals and 0 along negative ones
            let plane = if n.max_element() > 0.0 { 1.0 } else { 0.0 };
            for corner in face.corners() {
                assert_eq!(Vec3::from(corner).dot(n.abs()), plane, "{:?}", face);
            }
        }
    }

    #[test]
    fn test_horizontal_faces_match_directions() {
        for face in Face::ALL {
            if let Some(dir) = face.horizontal() {
                let (dx, dz) = dir.offset();
                assert_eq!(face.offset(), IVec3::new(dx, 0, dz));
            }
        }
        assert_eq!(Face::PosY.horizontal(), None);
    }

    #[test]
    fn test_quad_indices() {
        assert_eq!(quad_indices(8), [8, 9, 10, 8, 10, 11]);
    }
}
