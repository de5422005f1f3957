use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use lattice_geom::Vec2;

use super::config::{AtlasConfig, AtlasEntry};

/// Sub-rectangle of one atlas, in normalized `0..1` texture space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureLocation {
    pub atlas_id: u32,
    pub min: Vec2,
    pub max: Vec2,
}

impl TextureLocation {
    pub const fn new(atlas_id: u32, min: Vec2, max: Vec2) -> Self {
        Self { atlas_id, min, max }
    }

    /// Location covering an entire atlas.
    pub const fn full(atlas_id: u32) -> Self {
        Self::new(atlas_id, Vec2::ZERO, Vec2::ONE)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Resolves texture names to atlas locations.
pub trait AtlasLocator: Send + Sync {
    fn lookup(&self, texture: &str) -> Option<TextureLocation>;
}

#[derive(Default, Clone, Debug)]
pub struct TextureAtlas {
    pub locations: HashMap<String, TextureLocation>,
}

impl TextureAtlas {
    pub fn new() -> Self {
        Self {
            locations: HashMap::new(),
        }
    }

    pub fn insert(&mut self, texture: impl Into<String>, loc: TextureLocation) {
        self.locations.insert(texture.into(), loc);
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: AtlasConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: AtlasConfig) -> Result<Self, Box<dyn Error>> {
        let mut atlas = TextureAtlas::new();
        for entry in cfg.atlases {
            if entry.width == 0 || entry.height == 0 {
                return Err(format!("atlas {} has zero size", entry.id).into());
            }
            atlas.add_atlas(&entry)?;
        }
        Ok(atlas)
    }

    // Normalizes pixel rectangles of one atlas sheet.
    fn add_atlas(&mut self, entry: &AtlasEntry) -> Result<(), Box<dyn Error>> {
        let w = entry.width as f32;
        let h = entry.height as f32;
        for (name, [x, y, rw, rh]) in &entry.textures {
            if x + rw > entry.width || y + rh > entry.height {
                return Err(format!(
                    "texture `{}` [{}, {}, {}, {}] exceeds atlas {} ({}x{})",
                    name, x, y, rw, rh, entry.id, entry.width, entry.height
                )
                .into());
            }
            if self.locations.contains_key(name) {
                return Err(format!("texture `{}` defined in more than one atlas", name).into());
            }
            let min = Vec2::new(*x as f32 / w, *y as f32 / h);
            let max = Vec2::new((x + rw) as f32 / w, (y + rh) as f32 / h);
            self.insert(name.clone(), TextureLocation::new(entry.id, min, max));
        }
        Ok(())
    }
}

impl AtlasLocator for TextureAtlas {
    #[inline]
    fn lookup(&self, texture: &str) -> Option<TextureLocation> {
        self.locations.get(texture).copied()
    }
}
