use std::path::Path;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use lattice_blocks::{Block, BlockRegistry};
use lattice_chunk::{CHUNK_SIZE_Y, ChunkBuf, ChunkCoord};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_fill")] pub fill: String,
    #[serde(default = "default_base_height")] pub base_height: i32,
    #[serde(default = "default_amplitude")] pub amplitude: i32,
    #[serde(default = "default_frequency")] pub frequency: f32,
    #[serde(default = "default_sea_level")] pub sea_level: i32,
    #[serde(default = "default_water")] pub water: String,
    #[serde(default = "default_tree_spacing")] pub tree_spacing: i32,
    #[serde(default = "default_flower_spacing")] pub flower_spacing: i32,
    #[serde(default = "default_trees")] pub trees: Trees,
    #[serde(default = "default_flower")] pub flower: String,
    /// Surface layers from the top down; whatever is below them is `fill`.
    #[serde(default = "default_layers")] pub layers: Vec<Layer>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Layer { pub block: String, pub depth: i32 }

#[derive(Clone, Debug, Deserialize)]
pub struct Trees { pub trunk: String, pub leaves: String, pub height: i32 }

fn default_fill() -> String { "stone".into() }
fn default_base_height() -> i32 { 40 }
fn default_amplitude() -> i32 { 6 }
fn default_frequency() -> f32 { 0.02 }
fn default_sea_level() -> i32 { 38 }
fn default_water() -> String { "water".into() }
fn default_tree_spacing() -> i32 { 7 }
fn default_flower_spacing() -> i32 { 5 }
fn default_trees() -> Trees { Trees { trunk: "log".into(), leaves: "leaves".into(), height: 4 } }
fn default_flower() -> String { "flower".into() }
fn default_layers() -> Vec<Layer> {
    vec![
        Layer { block: "grass".into(), depth: 1 },
        Layer { block: "dirt".into(), depth: 3 },
    ]
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            fill: default_fill(),
            base_height: default_base_height(),
            amplitude: default_amplitude(),
            frequency: default_frequency(),
            sea_level: default_sea_level(),
            water: default_water(),
            tree_spacing: default_tree_spacing(),
            flower_spacing: default_flower_spacing(),
            trees: default_trees(),
            flower: default_flower(),
            layers: default_layers(),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldGenConfig, String> {
    let s = std::fs::read_to_string(path).map_err(|e| format!("read error: {}", e))?;
    toml::from_str(&s).map_err(|e| format!("parse error: {}", e))
}

/// Deterministic terrain generator with block names resolved against a registry.
pub struct WorldGen {
    terrain: FastNoiseLite,
    scatter: FastNoiseLite,
    base_height: i32,
    amplitude: i32,
    sea_level: i32,
    tree_spacing: i32,
    flower_spacing: i32,
    tree_height: i32,
    fill: Block,
    water: Block,
    trunk: Block,
    leaves: Block,
    flower: Block,
    layers: Vec<(Block, i32)>,
}

impl WorldGen {
    pub fn new(cfg: &WorldGenConfig, reg: &BlockRegistry, seed: i32) -> Result<Self, String> {
        let resolve = |name: &str| {
            reg.block_by_name(name)
                .ok_or_else(|| format!("worldgen: unknown block '{}'", name))
        };
        // trunk plus canopy must fit above a surface at y >= 0
        if cfg.trees.height >= CHUNK_SIZE_Y as i32 - 3 {
            return Err(format!(
                "worldgen: tree height {} does not fit a chunk of height {}",
                cfg.trees.height, CHUNK_SIZE_Y
            ));
        }
        let mut layers = Vec::with_capacity(cfg.layers.len());
        for layer in &cfg.layers {
            if layer.depth < 0 {
                return Err(format!("worldgen: negative depth for layer '{}'", layer.block));
            }
            layers.push((resolve(&layer.block)?, layer.depth));
        }

        let mut terrain = FastNoiseLite::with_seed(seed);
        terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
        terrain.set_frequency(Some(cfg.frequency));
        let mut scatter = FastNoiseLite::with_seed(seed.wrapping_add(1));
        scatter.set_noise_type(Some(NoiseType::Value));
        scatter.set_frequency(Some(0.5));

        Ok(Self {
            terrain,
            scatter,
            base_height: cfg.base_height,
            amplitude: cfg.amplitude.max(0),
            sea_level: cfg.sea_level,
            tree_spacing: cfg.tree_spacing,
            flower_spacing: cfg.flower_spacing,
            tree_height: cfg.trees.height.max(1),
            fill: resolve(&cfg.fill)?,
            water: resolve(&cfg.water)?,
            trunk: resolve(&cfg.trees.trunk)?,
            leaves: resolve(&cfg.trees.leaves)?,
            flower: resolve(&cfg.flower)?,
            layers,
        })
    }

    /// Surface height at world column `(wx, wz)`: `base_height` +/- `amplitude`.
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let n = self.terrain.get_noise_2d(wx as f32, wz as f32).clamp(-1.0, 1.0);
        self.base_height + (n * self.amplitude as f32).round() as i32
    }

    fn column_block(&self, y: i32, surface: i32) -> Block {
        let mut depth = surface - y;
        for &(block, layer_depth) in &self.layers {
            if depth < layer_depth {
                return block;
            }
            depth -= layer_depth;
        }
        self.fill
    }

    fn on_grid(&self, wx: i32, wz: i32, spacing: i32) -> bool {
        spacing > 0 && wx.rem_euclid(spacing) == 0 && wz.rem_euclid(spacing) == 0
    }

    pub fn generate_chunk(&self, coord: ChunkCoord) -> ChunkBuf {
        let mut buf = ChunkBuf::new(coord);
        let (ox, _, oz) = buf.origin();
        let sy = buf.sy as i32;
        // keep room for a tree above the surface
        let max_surface = (sy - self.tree_height - 3).max(0);

        for z in 0..buf.sz {
            for x in 0..buf.sx {
                let (wx, wz) = (ox + x as i32, oz + z as i32);
                let surface = self.height_at(wx, wz).clamp(0, max_surface);
                for y in 0..=surface {
                    buf.set_local(x, y as usize, z, self.column_block(y, surface));
                }
                for y in surface + 1..=self.sea_level.min(sy - 1) {
                    buf.set_local(x, y as usize, z, self.water);
                }
            }
        }

        for z in 0..buf.sz {
            for x in 0..buf.sx {
                let (wx, wz) = (ox + x as i32, oz + z as i32);
                let surface = self.height_at(wx, wz).clamp(0, max_surface);
                if surface < self.sea_level {
                    continue;
                }
                // whole canopy must fit inside this chunk
                let interior = x >= 1 && z >= 1 && x + 1 < buf.sx && z + 1 < buf.sz;
                if interior
                    && self.on_grid(wx, wz, self.tree_spacing)
                    && self.scatter.get_noise_2d(wx as f32, wz as f32) > -0.3
                {
                    self.place_tree(&mut buf, x, surface as usize + 1, z);
                } else if self.on_grid(wx + 2, wz + 1, self.flower_spacing) {
                    let y = surface as usize + 1;
                    if buf.get_local(x, y, z) == Block::AIR {
                        buf.set_local(x, y, z, self.flower);
                    }
                }
            }
        }
        buf
    }

    fn place_tree(&self, buf: &mut ChunkBuf, x: usize, base: usize, z: usize) {
        let h = self.tree_height as usize;
        for y in base..base + h {
            buf.set_local(x, y, z, self.trunk);
        }
        let top = base + h - 1;
        for y in top - 1..=top + 1 {
            for lz in z - 1..=z + 1 {
                for lx in x - 1..=x + 1 {
                    if buf.get_local(lx, y, lz) == Block::AIR {
                        buf.set_local(lx, y, lz, self.leaves);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BlockRegistry {
        let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        BlockRegistry::load_from_path(root.join("assets/blocks.toml")).unwrap()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: WorldGenConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.fill, "stone");
        assert_eq!(cfg.layers.len(), 2);
        assert_eq!(cfg.trees.trunk, "log");
    }

    #[test]
    fn bundled_config_loads() {
        let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let cfg = load_config_from_path(&root.join("assets/worldgen.toml")).unwrap();
        assert_eq!(cfg.layers[0].block, "grass");
        assert!(WorldGen::new(&cfg, &registry(), 7).is_ok());
    }

    #[test]
    fn unknown_block_is_rejected() {
        let cfg = WorldGenConfig { fill: "bedrock".into(), ..WorldGenConfig::default() };
        let err = WorldGen::new(&cfg, &registry(), 0).err().unwrap();
        assert!(err.contains("bedrock"));
    }

    #[test]
    fn oversized_trees_are_rejected() {
        let cfg = WorldGenConfig {
            sea_level: 0,
            trees: Trees { height: CHUNK_SIZE_Y as i32, ..default_trees() },
            ..WorldGenConfig::default()
        };
        let err = WorldGen::new(&cfg, &registry(), 3).err().unwrap();
        assert!(err.contains("tree height"));

        // tallest accepted tree still fits on a surface clamped to y = 0
        let cfg = WorldGenConfig {
            base_height: -20,
            sea_level: -1,
            tree_spacing: 1,
            trees: Trees { height: CHUNK_SIZE_Y as i32 - 4, ..default_trees() },
            ..WorldGenConfig::default()
        };
        let wg = WorldGen::new(&cfg, &registry(), 3).unwrap();
        let buf = wg.generate_chunk(ChunkCoord::new(0, 0));
        let log = registry().block_by_name("log").unwrap();
        let tops = (1..buf.sz - 1)
            .flat_map(|z| (1..buf.sx - 1).map(move |x| (x, z)))
            .filter(|&(x, z)| buf.get_local(x, CHUNK_SIZE_Y - 4, z) == log)
            .count();
        assert!(tops > 0);
    }

    #[test]
    fn generation_is_deterministic() {
        let reg = registry();
        let gen_a = WorldGen::new(&WorldGenConfig::default(), &reg, 42).unwrap();
        let gen_b = WorldGen::new(&WorldGenConfig::default(), &reg, 42).unwrap();
        let coord = ChunkCoord::new(-1, 3);
        assert_eq!(gen_a.generate_chunk(coord).blocks, gen_b.generate_chunk(coord).blocks);
    }

    #[test]
    fn columns_follow_layers_and_sea_level() {
        let reg = registry();
        let cfg = WorldGenConfig { tree_spacing: 0, flower_spacing: 0, ..WorldGenConfig::default() };
        let wg = WorldGen::new(&cfg, &reg, 1).unwrap();
        let buf = wg.generate_chunk(ChunkCoord::new(0, 0));
        let grass = reg.block_by_name("grass").unwrap();
        let dirt = reg.block_by_name("dirt").unwrap();
        let stone = reg.block_by_name("stone").unwrap();
        let water = reg.block_by_name("water").unwrap();
        for z in 0..buf.sz {
            for x in 0..buf.sx {
                let h = wg.height_at(x as i32, z as i32) as usize;
                assert_eq!(buf.get_local(x, h, z), grass);
                assert_eq!(buf.get_local(x, h - 1, z), dirt);
                assert_eq!(buf.get_local(x, h - 3, z), dirt);
                assert_eq!(buf.get_local(x, h - 4, z), stone);
                assert_eq!(buf.get_local(x, 0, z), stone);
                let above = buf.get_local(x, h + 1, z);
                if (h as i32) < cfg.sea_level {
                    assert_eq!(above, water);
                } else {
                    assert_eq!(above, Block::AIR);
                }
            }
        }
    }

    #[test]
    fn heights_stay_within_amplitude() {
        let wg = WorldGen::new(&WorldGenConfig::default(), &registry(), 9).unwrap();
        for wx in -40..40 {
            for wz in -40..40 {
                let h = wg.height_at(wx, wz);
                assert!((34..=46).contains(&h), "height {} at ({}, {})", h, wx, wz);
            }
        }
    }
}
