//! Block definition table and texture atlas lookup.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod config;
pub mod registry;
pub mod types;

pub use atlas::{AtlasLocator, TextureAtlas, TextureLocation};
pub use registry::{BlockDef, BlockRegistry, BlockTable};
pub use types::{Block, BlockId, Shape};
