use lattice_blocks::registry::{BlockDef, BlockTable};
use lattice_chunk::ChunkBuf;

use crate::error::{MeshError, Result};
use crate::face::{Face, FaceMask};

/// Per-face occlusion hook. The value lands in the lightmap UV slot.
pub trait AmbientOcclusion: Send + Sync {
    fn occlusion(&self, buf: &ChunkBuf, pos: [usize; 3], face: Face) -> f32;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NoOcclusion;

impl AmbientOcclusion for NoOcclusion {
    #[inline]
    fn occlusion(&self, _buf: &ChunkBuf, _pos: [usize; 3], _face: Face) -> f32 {
        0.0
    }
}

/// Whether a face of `here` is exposed toward `neighbor` (`None` = outside the chunk).
///
/// Out-of-chunk neighbors never count as the same block.
#[inline]
pub fn face_exposed(here: &BlockDef, neighbor: Option<&BlockDef>) -> bool {
    match neighbor {
        None => true,
        Some(nb) => nb.transparent && nb.name != here.name,
    }
}

/// Computes which faces of the block at `pos` need geometry.
pub fn visible_faces(
    buf: &ChunkBuf,
    table: &dyn BlockTable,
    pos: [usize; 3],
    here: &BlockDef,
) -> Result<FaceMask> {
    let mut mask = FaceMask::EMPTY;
    for face in Face::ALL {
        let (dx, dy, dz) = face.delta();
        let nx = pos[0] as i32 + dx;
        let ny = pos[1] as i32 + dy;
        let nz = pos[2] as i32 + dz;
        let neighbor = match buf.get_signed(nx, ny, nz) {
            Some(nb) => Some(table.lookup(nb.id).ok_or(MeshError::MissingDefinition {
                id: nb.id,
                pos: [nx as usize, ny as usize, nz as usize],
            })?),
            None => None,
        };
        if face_exposed(here, neighbor) {
            mask.insert(face);
        }
    }
    Ok(mask)
}
