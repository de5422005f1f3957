use lattice_blocks::types::BlockId;
use thiserror::Error;

/// Failures raised while meshing a chunk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Chunk data references a block id the definition table does not know.
    #[error("no block definition for id {id} at {pos:?}")]
    MissingDefinition { id: BlockId, pos: [usize; 3] },

    /// Block has a shape the mesher cannot produce geometry for.
    #[error("block `{name}` at {pos:?} has unsupported geometry")]
    UnsupportedGeometry { name: String, pos: [usize; 3] },

    /// Block texture is not present in any atlas.
    #[error("texture `{texture}` of block `{block}` has no atlas location")]
    MissingTextureLocation { texture: String, block: String },
}

impl MeshError {
    /// Fatal errors abort the whole build; the rest only skip one block.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MeshError::UnsupportedGeometry { .. })
    }
}

pub type Result<T> = std::result::Result<T, MeshError>;
