//! Chunk buffer: a dense block grid addressed by a horizontal chunk coordinate.
#![forbid(unsafe_code)]

use lattice_blocks::types::Block;
use serde::{Deserialize, Serialize};

pub const CHUNK_SIZE_X: usize = 16;
pub const CHUNK_SIZE_Y: usize = 128;
pub const CHUNK_SIZE_Z: usize = 16;

/// Chunks are columns: only x and z are chunked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub blocks: Vec<Block>,
}

impl ChunkBuf {
    /// Creates an all-air chunk with the default dimensions.
    pub fn new(coord: ChunkCoord) -> Self {
        Self::filled(coord, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, Block::AIR)
    }

    pub fn filled(coord: ChunkCoord, sx: usize, sy: usize, sz: usize, block: Block) -> Self {
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks: vec![block; sx * sy * sz],
        }
    }

    pub fn from_blocks_local(
        coord: ChunkCoord,
        sx: usize,
        sy: usize,
        sz: usize,
        blocks: Vec<Block>,
    ) -> Self {
        let mut b = blocks;
        let expect = sx * sy * sz;
        if b.len() != expect {
            b.resize(expect, Block::AIR);
        }
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks: b,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.sx, self.sy, self.sz)
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, block: Block) {
        let i = self.idx(x, y, z);
        self.blocks[i] = block;
    }

    #[inline]
    pub fn contains_local(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.sx
            && (y as usize) < self.sy
            && (z as usize) < self.sz
    }

    /// Block at signed local coordinates, `None` outside the chunk.
    #[inline]
    pub fn get_signed(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        if !self.contains_local(x, y, z) {
            return None;
        }
        Some(self.get_local(x as usize, y as usize, z as usize))
    }

    /// World-space block position of local `(0, 0, 0)`.
    #[inline]
    pub fn origin(&self) -> (i32, i32, i32) {
        (
            self.coord.cx * self.sx as i32,
            0,
            self.coord.cz * self.sz as i32,
        )
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| *b != Block::AIR)
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }
}
