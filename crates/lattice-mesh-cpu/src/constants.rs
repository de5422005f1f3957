//! Shared constants for lattice-mesh-cpu.

// Interleaved vertex layout: position(3) uv(2) lightmap_uv(2) normal(3) tangent(3)
pub const FLOATS_PER_VERTEX: usize = 13;
pub(crate) const POSITION_OFFSET: usize = 0;
pub(crate) const UV_OFFSET: usize = 3;
pub(crate) const LIGHTMAP_OFFSET: usize = 5;
pub(crate) const NORMAL_OFFSET: usize = 7;
pub(crate) const TANGENT_OFFSET: usize = 10;

pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;

/// Two triangles (0,1,2) and (1,2,3) sharing the 1-2 diagonal.
pub const QUAD_INDICES: [u32; INDICES_PER_QUAD] = [0, 1, 2, 1, 2, 3];

pub const DEFAULT_BLOCK_SIZE: f32 = 1.0;
