//! Mesh builder: walks a chunk and emits exposed faces

use glam::IVec3;

use super::face::{quad_indices, Face};
use super::{ChunkMesh, MeshConfig, SpecialElement};
use crate::voxel::chunk::{Chunk, HorizontalDir, CHUNK_SIZE, CHUNK_VOLUME, WORLD_HEIGHT};
use crate::voxel::voxel::{Voxel, VoxelKind};

/// Builds face-culled meshes from chunks
pub struct MeshBuilder {
    config: MeshConfig,
}

impl MeshBuilder {
    pub fn new(config: MeshConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// Build the mesh of `chunk`.
    ///
    /// `neighbor` resolves the chunk across each horizontal boundary. A face
    /// on a boundary with no neighbour is drawn; the bottom face of the world
    /// floor never is.
    pub fn build<'a>(
        &self,
        chunk: &Chunk,
        neighbor: impl Fn(HorizontalDir) -> Option<&'a Chunk>,
    ) -> ChunkMesh {
        let mut mesh = ChunkMesh::default();
        let neighbors = HorizontalDir::ALL.map(&neighbor);

        for i in 0..CHUNK_VOLUME {
            let (x, y, z) = Chunk::position(i);
            let voxel = chunk.get(x, y, z);
            if !voxel.kind.is_visible() {
                continue;
            }
            let local = IVec3::new(x as i32, y as i32, z as i32);

            match voxel.kind {
                VoxelKind::Water => {
                    let is_surface = y + 1 >= WORLD_HEIGHT || chunk.kind(x, y + 1, z) != VoxelKind::Water;
                    if is_surface {
                        mesh.specials.push(SpecialElement {
                            local,
                            kind: VoxelKind::Water,
                            model: None,
                            is_surface: true,
                        });
                    }
                    continue;
                }
                VoxelKind::Plant | VoxelKind::Cloud => {
                    mesh.specials.push(SpecialElement {
                        local,
                        kind: voxel.kind,
                        model: voxel.model,
                        is_surface: false,
                    });
                    continue;
                }
                _ => {}
            }
            if !voxel.is_solid() {
                continue;
            }

            let color = self.voxel_color(voxel, local);
            for face in Face::ALL {
                if exposed(chunk, &neighbors, local, face) {
                    push_face(&mut mesh, local, face, color);
                }
            }
        }

        mesh
    }

    /// Base colour plus the deterministic per-position jitter
    pub fn voxel_color(&self, voxel: Voxel, local: IVec3) -> [u8; 4] {
        let base = voxel.color.unwrap_or_else(|| self.config.palette.color(voxel.kind));
        let shift = color_jitter(local, self.config.color_jitter);
        [
            base[0].saturating_add(shift),
            base[1].saturating_add(shift),
            base[2].saturating_add(shift),
            base[3],
        ]
    }
}

/// Spatial hash of a local position reduced to `0..=max`
pub fn color_jitter(local: IVec3, max: u8) -> u8 {
    let (x, y, z) = (local.x as i64, local.y as i64, local.z as i64);
    let h = (x.wrapping_mul(73_856_093).wrapping_add(y.wrapping_mul(19_349_663)))
        ^ (z.wrapping_mul(83_492_791).wrapping_add(x.wrapping_mul(19_349_663)))
        ^ (y.wrapping_mul(83_492_791).wrapping_add(z.wrapping_mul(73_856_093)));
    h.rem_euclid(max as i64 + 1) as u8
}

fn is_solid_at(chunk: &Chunk, local: IVec3) -> bool {
    chunk.get_local(local).is_some_and(|v| v.is_solid())
}

/// Whether the `face` of the solid voxel at `local` is visible
fn exposed(chunk: &Chunk, neighbors: &[Option<&Chunk>; 4], local: IVec3, face: Face) -> bool {
    let target = local + face.offset();
    if target.y < 0 {
        return false;
    }
    if target.y >= WORLD_HEIGHT as i32 {
        return true;
    }
    if Chunk::in_bounds(target) {
        return !is_solid_at(chunk, target);
    }

    let Some(dir) = face.horizontal() else { return true };
    match neighbors[dir.index()] {
        Some(other) => {
            let size = CHUNK_SIZE as i32;
            let wrapped = IVec3::new(target.x.rem_euclid(size), target.y, target.z.rem_euclid(size));
            !is_solid_at(other, wrapped)
        }
        None => true,
    }
}

fn push_face(mesh: &mut ChunkMesh, local: IVec3, face: Face, color: [u8; 4]) {
    let base = mesh.positions.len() as u32;
    let origin = local.as_vec3();
    let normal = face.normal();
    for corner in face.corners() {
        mesh.positions.push([origin.x + corner[0], origin.y + corner[1], origin.z + corner[2]]);
        mesh.normals.push(normal);
        mesh.colors.push(color);
    }
    mesh.indices.extend_from_slice(&quad_indices(base));
}
