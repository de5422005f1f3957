use serde::Deserialize;
use std::collections::HashMap;

use super::types::Shape;

// Top-level blocks config file
#[derive(Deserialize, Debug, Default)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockEntry>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockEntry {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    // Texture key resolved through the atlas; defaults to the block name
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub shape: Option<Shape>,
    #[serde(default)]
    pub transparent: Option<bool>,
}

// Top-level atlas config file
#[derive(Deserialize, Debug, Default)]
pub struct AtlasConfig {
    pub atlases: Vec<AtlasEntry>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AtlasEntry {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    // texture name -> [x, y, w, h] in pixels
    #[serde(default)]
    pub textures: HashMap<String, [u32; 4]>,
}
