use lattice_blocks::registry::{BlockDef, BlockTable};
use lattice_chunk::ChunkBuf;

use crate::error::{MeshError, Result};

/// Predicate deciding which blocks a build covers.
pub trait BlockFilter {
    fn accepts(&self, def: &BlockDef) -> bool;
}

impl<F> BlockFilter for F
where
    F: Fn(&BlockDef) -> bool,
{
    #[inline]
    fn accepts(&self, def: &BlockDef) -> bool {
        self(def)
    }
}

/// Default filter: every cube block.
#[derive(Copy, Clone, Debug, Default)]
pub struct CubeBlocks;

impl BlockFilter for CubeBlocks {
    #[inline]
    fn accepts(&self, def: &BlockDef) -> bool {
        def.is_cube()
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct OpaqueCubes;

impl BlockFilter for OpaqueCubes {
    #[inline]
    fn accepts(&self, def: &BlockDef) -> bool {
        def.is_cube() && def.is_opaque()
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct TransparentCubes;

impl BlockFilter for TransparentCubes {
    #[inline]
    fn accepts(&self, def: &BlockDef) -> bool {
        def.is_cube() && def.transparent
    }
}

/// Matches everything, including empty and model blocks.
#[derive(Copy, Clone, Debug, Default)]
pub struct AnyBlock;

impl BlockFilter for AnyBlock {
    #[inline]
    fn accepts(&self, _def: &BlockDef) -> bool {
        true
    }
}

/// Collects the local coordinates of every block accepted by `filter`.
///
/// Order is z outermost, then y, then x.
pub fn select_blocks(
    buf: &ChunkBuf,
    table: &dyn BlockTable,
    filter: &dyn BlockFilter,
) -> Result<Vec<[usize; 3]>> {
    let mut out = Vec::new();
    for z in 0..buf.sz {
        for y in 0..buf.sy {
            for x in 0..buf.sx {
                let id = buf.get_local(x, y, z).id;
                let def = table.lookup(id).ok_or(MeshError::MissingDefinition {
                    id,
                    pos: [x, y, z],
                })?;
                if filter.accepts(def) {
                    out.push([x, y, z]);
                }
            }
        }
    }
    Ok(out)
}
