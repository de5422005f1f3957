//! CPU chunk mesher: culls hidden cube faces and emits one textured quad per visible face.
#![forbid(unsafe_code)]

mod build;
pub mod constants;
mod error;
mod face;
mod mesh_build;
mod model;
mod quad;
mod select;
mod visibility;

pub use build::{BuildStats, ChunkMeshBuilder, build_chunk_mesh};
pub use error::{MeshError, Result};
pub use face::{Face, FaceGeometry, FaceMask};
pub use mesh_build::{MeshCheckpoint, MeshDefinition, MeshVertex, Vertex, VertexFormat};
pub use model::{BlockModeler, UnsupportedModels};
pub use quad::face_quad;
pub use select::{AnyBlock, BlockFilter, CubeBlocks, OpaqueCubes, TransparentCubes, select_blocks};
pub use visibility::{AmbientOcclusion, NoOcclusion, face_exposed, visible_faces};
