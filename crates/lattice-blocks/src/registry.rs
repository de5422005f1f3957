use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::BlocksConfig;
use super::types::{Block, BlockId, Shape};

/// Read-only lookup from block id to definition.
///
/// Implementations are populated once (resource pack load) and then shared
/// between builds, so they must be safe for concurrent reads.
pub trait BlockTable: Send + Sync {
    fn lookup(&self, id: BlockId) -> Option<&BlockDef>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockDef {
    pub id: BlockId,
    pub name: String,
    pub texture: String,
    pub shape: Shape,
    pub transparent: bool,
}

impl BlockDef {
    pub fn new(id: BlockId, name: impl Into<String>, shape: Shape, transparent: bool) -> Self {
        let name = name.into();
        Self {
            id,
            texture: name.clone(),
            name,
            shape,
            transparent,
        }
    }

    /// Overrides the texture key (defaults to the block name).
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = texture.into();
        self
    }

    #[inline]
    pub fn is_cube(&self) -> bool {
        self.shape == Shape::Cube
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        !self.transparent
    }
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<Option<BlockDef>>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.blocks.get(id as usize).and_then(Option::as_ref)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(Block::new)
    }

    /// Number of defined block types.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockDef> {
        self.blocks.iter().filter_map(Option::as_ref)
    }

    /// Adds a definition, rejecting duplicate ids and names.
    pub fn insert(&mut self, def: BlockDef) -> Result<(), Box<dyn Error>> {
        if self.by_name.contains_key(&def.name) {
            return Err(format!("duplicate block name `{}`", def.name).into());
        }
        let ix = def.id as usize;
        if self.blocks.len() <= ix {
            self.blocks.resize(ix + 1, None);
        }
        if let Some(prev) = &self.blocks[ix] {
            return Err(format!(
                "block id {} assigned to both `{}` and `{}`",
                def.id, prev.name, def.name
            )
            .into());
        }
        self.by_name.insert(def.name.clone(), def.id);
        self.blocks[ix] = Some(def);
        Ok(())
    }

    pub fn load_from_path(blocks_path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let blocks_toml = fs::read_to_string(blocks_path)?;
        Self::from_toml_str(&blocks_toml)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        for (ix, entry) in cfg.blocks.into_iter().enumerate() {
            let id = entry.id.unwrap_or(ix as u16);
            let texture = entry.texture.unwrap_or_else(|| entry.name.clone());
            reg.insert(BlockDef {
                id,
                name: entry.name,
                texture,
                shape: entry.shape.unwrap_or_default(),
                transparent: entry.transparent.unwrap_or(false),
            })?;
        }
        Ok(reg)
    }
}

impl BlockTable for BlockRegistry {
    #[inline]
    fn lookup(&self, id: BlockId) -> Option<&BlockDef> {
        self.get(id)
    }
}
