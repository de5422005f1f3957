use lattice_blocks::atlas::{TextureAtlas, TextureLocation};
use lattice_blocks::registry::{BlockDef, BlockRegistry};
use lattice_blocks::types::{Block, Shape};
use lattice_chunk::{ChunkBuf, ChunkCoord};
use lattice_mesh_cpu::{CubeBlocks, build_chunk_mesh, select_blocks};
use proptest::prelude::*;

// id -> (name, transparent); id 0 is air
const BLOCKS: [(&str, bool); 5] = [
    ("air", true),
    ("stone", false),
    ("glass", true),
    ("dirt", false),
    ("ice", true),
];

fn registry_and_atlas() -> (BlockRegistry, TextureAtlas) {
    let mut reg = BlockRegistry::new();
    let mut atlas = TextureAtlas::new();
    for (id, (name, transparent)) in BLOCKS.iter().enumerate() {
        let shape = if id == 0 { Shape::Empty } else { Shape::Cube };
        reg.insert(BlockDef::new(id as u16, *name, shape, *transparent))
            .unwrap();
        atlas.insert(*name, TextureLocation::full(0));
    }
    (reg, atlas)
}

fn arb_chunk() -> impl Strategy<Value = ChunkBuf> {
    (1usize..=4, 1usize..=4, 1usize..=4).prop_flat_map(|(sx, sy, sz)| {
        proptest::collection::vec(0u16..BLOCKS.len() as u16, sx * sy * sz).prop_map(move |ids| {
            let blocks = ids.into_iter().map(Block::new).collect();
            ChunkBuf::from_blocks_local(ChunkCoord::new(0, 0), sx, sy, sz, blocks)
        })
    })
}

// Reference face count written directly from the visibility rule.
fn expected_faces(buf: &ChunkBuf) -> usize {
    let mut n = 0;
    for y in 0..buf.sy {
        for z in 0..buf.sz {
            for x in 0..buf.sx {
                let id = buf.get_local(x, y, z).id;
                if id == 0 {
                    continue;
                }
                for (dx, dy, dz) in [(-1, 0, 0), (1, 0, 0), (0, -1, 0), (0, 1, 0), (0, 0, -1), (0, 0, 1)] {
                    let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
                    let inside = nx >= 0
                        && ny >= 0
                        && nz >= 0
                        && (nx as usize) < buf.sx
                        && (ny as usize) < buf.sy
                        && (nz as usize) < buf.sz;
                    if !inside {
                        n += 1;
                        continue;
                    }
                    let nid = buf.get_local(nx as usize, ny as usize, nz as usize).id;
                    if BLOCKS[nid as usize].1 && nid != id {
                        n += 1;
                    }
                }
            }
        }
    }
    n
}

proptest! {
    #[test]
    fn face_count_matches_reference(buf in arb_chunk()) {
        let (reg, atlas) = registry_and_atlas();
        let mesh = build_chunk_mesh(&buf, &reg, &atlas, &CubeBlocks).unwrap();
        prop_assert_eq!(mesh.quad_count(), expected_faces(&buf));
    }

    #[test]
    fn buffers_stay_consistent(buf in arb_chunk()) {
        let (reg, atlas) = registry_and_atlas();
        let mesh = build_chunk_mesh(&buf, &reg, &atlas, &CubeBlocks).unwrap();
        prop_assert_eq!(mesh.vertices.len(), mesh.vertex_count() * mesh.format.floats_per_vertex());
        prop_assert_eq!(mesh.vertex_count(), mesh.quad_count() * 4);
        prop_assert_eq!(mesh.indices.len(), mesh.quad_count() * 6);
        for (q, tri) in mesh.indices.chunks(6).enumerate() {
            let b = (q * 4) as u32;
            prop_assert_eq!(tri, &[b, b + 1, b + 2, b + 1, b + 2, b + 3][..]);
        }
        // every vertex of a quad shares the quad's normal
        for q in 0..mesh.quad_count() {
            let n = mesh.vertex(q * 4).unwrap().normal;
            prop_assert!((n.length() - 1.0).abs() < 1e-6);
            for k in 1..4 {
                prop_assert_eq!(mesh.vertex(q * 4 + k).unwrap().normal, n);
            }
        }
    }

    #[test]
    fn selector_visits_every_cell_once(buf in arb_chunk()) {
        let (reg, _) = registry_and_atlas();
        let all = select_blocks(&buf, &reg, &|_: &BlockDef| true).unwrap();
        prop_assert_eq!(all.len(), buf.sx * buf.sy * buf.sz);
        let mut seen = vec![false; all.len()];
        for [x, y, z] in all {
            let i = buf.idx(x, y, z);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }
        let solid = select_blocks(&buf, &reg, &CubeBlocks).unwrap();
        let expect = buf.blocks.iter().filter(|b| b.id != 0).count();
        prop_assert_eq!(solid.len(), expect);
    }
}
