use lattice_geom::{Vec2, Vec3};

use crate::constants::{
    FLOATS_PER_VERTEX, INDICES_PER_QUAD, LIGHTMAP_OFFSET, NORMAL_OFFSET, POSITION_OFFSET,
    QUAD_INDICES, TANGENT_OFFSET, UV_OFFSET, VERTICES_PER_QUAD,
};

/// Vertex layout tag handed to the GPU upload layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    #[default]
    PositionUvLightmapNormalTangent,
}

impl VertexFormat {
    #[inline]
    pub fn floats_per_vertex(self) -> usize {
        match self {
            VertexFormat::PositionUvLightmapNormalTangent => FLOATS_PER_VERTEX,
        }
    }

    /// Attribute names and float widths, in interleaving order.
    pub fn attributes(self) -> &'static [(&'static str, usize)] {
        match self {
            VertexFormat::PositionUvLightmapNormalTangent => &[
                ("position", 3),
                ("uv", 2),
                ("lightmap_uv", 2),
                ("normal", 3),
                ("tangent", 3),
            ],
        }
    }
}

/// One face-quad corner before translation into chunk space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

/// Decoded view of one interleaved vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub lightmap_uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshDefinition {
    pub format: VertexFormat,
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub offset: Vec3,
}

/// Buffer lengths captured before emitting a block, used to roll it back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshCheckpoint {
    vertices: usize,
    indices: usize,
}

impl MeshDefinition {
    pub fn new(offset: Vec3) -> Self {
        Self {
            format: VertexFormat::default(),
            vertices: Vec::new(),
            indices: Vec::new(),
            offset,
        }
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.vertices
            .reserve(n_quads * VERTICES_PER_QUAD * self.format.floats_per_vertex());
        self.indices.reserve(n_quads * INDICES_PER_QUAD);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.format.floats_per_vertex()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.indices.len() / INDICES_PER_QUAD
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends one quad translated by `translate`, with indices pointing at
    /// the four vertices just written.
    pub fn push_quad(&mut self, quad: &[Vertex; 4], translate: Vec3, lightmap_uv: Vec2) {
        let base = self.vertex_count() as u32;
        for v in quad {
            self.vertices
                .extend_from_slice(&(v.position + translate).to_array());
            self.vertices.extend_from_slice(&v.uv.to_array());
            self.vertices.extend_from_slice(&lightmap_uv.to_array());
            self.vertices.extend_from_slice(&v.normal.to_array());
            self.vertices.extend_from_slice(&v.tangent.to_array());
        }
        self.indices
            .extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    #[inline]
    pub fn checkpoint(&self) -> MeshCheckpoint {
        MeshCheckpoint {
            vertices: self.vertices.len(),
            indices: self.indices.len(),
        }
    }

    /// Drops everything written after `cp`.
    #[inline]
    pub fn rollback(&mut self, cp: MeshCheckpoint) {
        self.vertices.truncate(cp.vertices);
        self.indices.truncate(cp.indices);
    }

    /// Reads back vertex `i`, or `None` past the end.
    pub fn vertex(&self, i: usize) -> Option<MeshVertex> {
        let stride = self.format.floats_per_vertex();
        let v = self.vertices.get(i * stride..(i + 1) * stride)?;
        let v3 = |o: usize| Vec3::new(v[o], v[o + 1], v[o + 2]);
        let v2 = |o: usize| Vec2::new(v[o], v[o + 1]);
        Some(MeshVertex {
            position: v3(POSITION_OFFSET),
            uv: v2(UV_OFFSET),
            lightmap_uv: v2(LIGHTMAP_OFFSET),
            normal: v3(NORMAL_OFFSET),
            tangent: v3(TANGENT_OFFSET),
        })
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.vertex_count()).filter_map(|i| self.vertex(i).map(|v| v.position))
    }
}
