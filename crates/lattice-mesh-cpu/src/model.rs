use lattice_blocks::registry::BlockDef;
use lattice_chunk::ChunkBuf;

use crate::error::{MeshError, Result};
use crate::mesh_build::MeshDefinition;

/// Geometry source for non-cube blocks.
///
/// Implementations append quads for `def` at local `pos`; on error the
/// builder discards anything they wrote.
pub trait BlockModeler: Send + Sync {
    fn emit_model(
        &self,
        buf: &ChunkBuf,
        def: &BlockDef,
        pos: [usize; 3],
        mesh: &mut MeshDefinition,
    ) -> Result<()>;
}

/// No model support: every model block is reported as unsupported.
#[derive(Copy, Clone, Debug, Default)]
pub struct UnsupportedModels;

impl BlockModeler for UnsupportedModels {
    fn emit_model(
        &self,
        _buf: &ChunkBuf,
        def: &BlockDef,
        pos: [usize; 3],
        _mesh: &mut MeshDefinition,
    ) -> Result<()> {
        Err(MeshError::UnsupportedGeometry {
            name: def.name.clone(),
            pos,
        })
    }
}
