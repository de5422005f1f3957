use std::array;

use lattice_blocks::atlas::TextureLocation;
use lattice_geom::Vec2;

use crate::face::Face;
use crate::mesh_build::Vertex;

/// Builds the four corners of `face` for a cube of edge `size` at the origin.
///
/// UVs run `min`, `min+(0,h)`, `min+(w,0)`, `max` in vertex order.
pub fn face_quad(face: Face, size: f32, tex: &TextureLocation) -> [Vertex; 4] {
    let g = face.geometry();
    let uvs = [
        tex.min,
        tex.min + Vec2::new(0.0, tex.height()),
        tex.min + Vec2::new(tex.width(), 0.0),
        tex.max,
    ];
    array::from_fn(|i| Vertex {
        position: g.corners[i] * size,
        uv: uvs[i],
        normal: g.normal,
        tangent: g.tangent,
    })
}
