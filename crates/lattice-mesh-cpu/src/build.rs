use std::time::Instant;

use lattice_blocks::atlas::AtlasLocator;
use lattice_blocks::registry::BlockTable;
use lattice_blocks::types::Shape;
use lattice_chunk::ChunkBuf;
use lattice_geom::{Vec2, Vec3};

use crate::constants::DEFAULT_BLOCK_SIZE;
use crate::error::{MeshError, Result};
use crate::mesh_build::MeshDefinition;
use crate::model::{BlockModeler, UnsupportedModels};
use crate::quad::face_quad;
use crate::select::{BlockFilter, CubeBlocks, select_blocks};
use crate::visibility::{AmbientOcclusion, NoOcclusion, visible_faces};

/// Counters gathered while building one chunk mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub blocks_selected: usize,
    pub faces_emitted: usize,
    pub faces_culled: usize,
    pub model_blocks: usize,
    pub unsupported_blocks: usize,
    pub empty_blocks: usize,
    pub build_ms: u32,
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Turns chunks into meshes using injected block and atlas lookups.
///
/// Holds only shared references, so one builder can be reused for any
/// number of chunks and shared across threads.
pub struct ChunkMeshBuilder<'a> {
    blocks: &'a dyn BlockTable,
    atlas: &'a dyn AtlasLocator,
    occlusion: &'a dyn AmbientOcclusion,
    models: &'a dyn BlockModeler,
    block_size: f32,
}

impl<'a> ChunkMeshBuilder<'a> {
    pub fn new(blocks: &'a dyn BlockTable, atlas: &'a dyn AtlasLocator) -> Self {
        Self {
            blocks,
            atlas,
            occlusion: &NoOcclusion,
            models: &UnsupportedModels,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    pub fn with_occlusion(mut self, occlusion: &'a dyn AmbientOcclusion) -> Self {
        self.occlusion = occlusion;
        self
    }

    pub fn with_models(mut self, models: &'a dyn BlockModeler) -> Self {
        self.models = models;
        self
    }

    pub fn with_block_size(mut self, block_size: f32) -> Self {
        self.block_size = block_size;
        self
    }

    /// Meshes every cube block of `buf`.
    pub fn build_cubes(&self, buf: &ChunkBuf) -> Result<MeshDefinition> {
        self.build(buf, &CubeBlocks)
    }

    pub fn build(&self, buf: &ChunkBuf, filter: &dyn BlockFilter) -> Result<MeshDefinition> {
        self.build_with_stats(buf, filter).map(|(mesh, _)| mesh)
    }

    pub fn build_with_stats(
        &self,
        buf: &ChunkBuf,
        filter: &dyn BlockFilter,
    ) -> Result<(MeshDefinition, BuildStats)> {
        let t0 = Instant::now();
        let selected = select_blocks(buf, self.blocks, filter)?;
        let (mesh, mut stats) = self.build_selected(buf, &selected)?;
        stats.build_ms = elapsed_ms(t0);
        log::debug!(
            target: "mesh",
            "chunk ({}, {}) selected={} faces={} culled={} unsupported={} in {}ms",
            buf.coord.cx,
            buf.coord.cz,
            stats.blocks_selected,
            stats.faces_emitted,
            stats.faces_culled,
            stats.unsupported_blocks,
            stats.build_ms
        );
        Ok((mesh, stats))
    }

    /// Meshes the blocks at `selected` (local coordinates inside `buf`).
    pub fn build_selected(
        &self,
        buf: &ChunkBuf,
        selected: &[[usize; 3]],
    ) -> Result<(MeshDefinition, BuildStats)> {
        let (ox, oy, oz) = buf.origin();
        let mut mesh = MeshDefinition::new(Vec3::new(ox as f32, oy as f32, oz as f32));
        mesh.reserve_quads(selected.len());
        let mut stats = BuildStats {
            blocks_selected: selected.len(),
            ..BuildStats::default()
        };

        for &pos in selected {
            let [x, y, z] = pos;
            let id = buf.get_local(x, y, z).id;
            let def = self
                .blocks
                .lookup(id)
                .ok_or(MeshError::MissingDefinition { id, pos })?;

            match def.shape {
                Shape::Empty => {
                    stats.empty_blocks += 1;
                    log::trace!(target: "mesh", "block `{}` at {:?} has no geometry", def.name, pos);
                }
                Shape::Model => {
                    let cp = mesh.checkpoint();
                    match self.models.emit_model(buf, def, pos, &mut mesh) {
                        Ok(()) => stats.model_blocks += 1,
                        Err(e) if !e.is_fatal() => {
                            mesh.rollback(cp);
                            stats.unsupported_blocks += 1;
                            log::warn!(target: "mesh", "skipping block: {}", e);
                        }
                        Err(e) => return Err(e),
                    }
                }
                Shape::Cube => {
                    let tex = self.atlas.lookup(&def.texture).ok_or_else(|| {
                        MeshError::MissingTextureLocation {
                            texture: def.texture.clone(),
                            block: def.name.clone(),
                        }
                    })?;
                    let faces = visible_faces(buf, self.blocks, pos, def)?;
                    stats.faces_culled += 6 - faces.len();
                    let origin = Vec3::from_grid(x, y, z) * self.block_size;
                    for face in faces.iter() {
                        let quad = face_quad(face, self.block_size, &tex);
                        let ao = self.occlusion.occlusion(buf, pos, face);
                        mesh.push_quad(&quad, origin, Vec2::new(ao, ao));
                        stats.faces_emitted += 1;
                    }
                }
            }
        }
        Ok((mesh, stats))
    }
}

/// Convenience wrapper building one chunk with default extension points.
pub fn build_chunk_mesh(
    buf: &ChunkBuf,
    blocks: &dyn BlockTable,
    atlas: &dyn AtlasLocator,
    filter: &dyn BlockFilter,
) -> Result<MeshDefinition> {
    ChunkMeshBuilder::new(blocks, atlas).build(buf, filter)
}
