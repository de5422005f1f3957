use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use lattice_chunk::{ChunkBuf, ChunkCoord};
use lattice_mesh_cpu::{BuildStats, MeshDefinition, MeshError};

use crate::{BuildJob, JobOut, MeshPass, Runtime};

/// A complete mesh for one chunk pass, tagged with the chunk revision it was built from.
#[derive(Clone, Debug)]
pub struct PublishedMesh {
    pub rev: u64,
    pub mesh: MeshDefinition,
    pub stats: BuildStats,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub chunks: usize,
    pub meshes: usize,
    pub dirty: usize,
    pub pending: usize,
    pub failed: usize,
    pub quads: usize,
}

struct ChunkEntry {
    buf: Arc<ChunkBuf>,
    rev: u64,
    dirty: bool,
}

/// Owns chunk data and the latest published meshes, rebuilding dirty chunks on the runtime.
pub struct MeshStore {
    runtime: Runtime,
    chunks: HashMap<ChunkCoord, ChunkEntry>,
    meshes: HashMap<(ChunkCoord, MeshPass), PublishedMesh>,
    failures: HashMap<ChunkCoord, MeshError>,
    inflight: HashSet<u64>,
    center: ChunkCoord,
    next_rev: u64,
    next_job_id: u64,
}

impl MeshStore {
    pub fn new(runtime: Runtime) -> Self {
        Self {
            runtime,
            chunks: HashMap::new(),
            meshes: HashMap::new(),
            failures: HashMap::new(),
            inflight: HashSet::new(),
            center: ChunkCoord::default(),
            next_rev: 0,
            next_job_id: 0,
        }
    }

    /// Dirty chunks are scheduled nearest to `center` first.
    pub fn set_center(&mut self, center: ChunkCoord) {
        self.center = center;
    }

    /// Stores new data for a chunk and marks it dirty. Returns the new revision.
    pub fn insert_chunk(&mut self, buf: ChunkBuf) -> u64 {
        self.next_rev += 1;
        let rev = self.next_rev;
        let coord = buf.coord;
        self.failures.remove(&coord);
        self.chunks.insert(
            coord,
            ChunkEntry {
                buf: Arc::new(buf),
                rev,
                dirty: true,
            },
        );
        rev
    }

    pub fn remove_chunk(&mut self, coord: ChunkCoord) -> bool {
        for pass in MeshPass::ALL {
            self.meshes.remove(&(coord, pass));
        }
        self.failures.remove(&coord);
        self.chunks.remove(&coord).is_some()
    }

    /// Requests a rebuild of an already stored chunk. Failed chunks stay
    /// parked until new data arrives through `insert_chunk`.
    pub fn mark_dirty(&mut self, coord: ChunkCoord) -> bool {
        if self.failures.contains_key(&coord) {
            return false;
        }
        match self.chunks.get_mut(&coord) {
            Some(entry) => {
                entry.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn dirty_count(&self) -> usize {
        self.chunks.values().filter(|e| e.dirty).count()
    }

    pub fn pending(&self) -> usize {
        self.inflight.len()
    }

    /// Dirty chunk coordinates, nearest to the center first.
    pub fn dirty_by_distance(&self) -> Vec<ChunkCoord> {
        let mut dirty: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(_, e)| e.dirty)
            .map(|(&c, _)| c)
            .collect();
        let center = self.center;
        dirty.sort_by_key(|c| (c.distance_sq(center), c.cz, c.cx));
        dirty
    }

    /// Submits one build per pass for every dirty chunk. Returns the number of jobs submitted.
    pub fn schedule_dirty(&mut self) -> usize {
        let mut submitted = 0;
        for coord in self.dirty_by_distance() {
            let Some(entry) = self.chunks.get_mut(&coord) else {
                continue;
            };
            entry.dirty = false;
            for pass in MeshPass::ALL {
                self.next_job_id += 1;
                let job_id = self.next_job_id;
                self.inflight.insert(job_id);
                self.runtime.submit(BuildJob {
                    coord,
                    pass,
                    rev: entry.rev,
                    job_id,
                    buf: Arc::clone(&entry.buf),
                });
                submitted += 1;
            }
        }
        if submitted > 0 {
            log::debug!(target: "runtime", "scheduled {} mesh job(s)", submitted);
        }
        submitted
    }

    /// Publishes whatever results have arrived without blocking. Returns how many meshes were published.
    pub fn process_results(&mut self) -> usize {
        let mut published = 0;
        for out in self.runtime.drain_worker_results() {
            if self.handle_result(out) {
                published += 1;
            }
        }
        published
    }

    /// Blocks until every submitted job has reported back.
    pub fn wait_idle(&mut self) -> usize {
        let (queued, running) = self.runtime.queue_debug_counts();
        log::debug!(
            target: "runtime",
            "waiting on {} job(s): queued={} running={}",
            self.inflight.len(),
            queued,
            running
        );
        let mut published = 0;
        while !self.inflight.is_empty() {
            let Some(out) = self.runtime.recv_result() else {
                log::error!(target: "runtime", "mesh workers stopped with {} job(s) pending", self.inflight.len());
                self.inflight.clear();
                break;
            };
            if self.handle_result(out) {
                published += 1;
            }
        }
        published
    }

    /// Schedules every dirty chunk and waits for the results.
    pub fn build_all(&mut self) -> usize {
        self.schedule_dirty();
        self.wait_idle()
    }

    fn handle_result(&mut self, out: JobOut) -> bool {
        let JobOut {
            coord,
            pass,
            rev,
            job_id,
            result,
            t_total_ms,
        } = out;
        self.inflight.remove(&job_id);

        // Drop if stale or the chunk is gone
        let Some(entry) = self.chunks.get(&coord) else {
            return false;
        };
        if rev < entry.rev {
            log::trace!(target: "runtime", "dropping stale mesh for {:?} rev {} < {}", coord, rev, entry.rev);
            return false;
        }

        match result {
            Ok((mesh, stats)) => {
                if self.failures.contains_key(&coord) {
                    return false;
                }
                log::trace!(
                    target: "runtime",
                    "mesh {:?} {:?} rev {}: {} quad(s) in {}ms",
                    coord,
                    pass,
                    rev,
                    mesh.quad_count(),
                    t_total_ms
                );
                self.meshes
                    .insert((coord, pass), PublishedMesh { rev, mesh, stats });
                true
            }
            Err(e) => {
                log::error!(target: "runtime", "mesh build failed for chunk {:?}: {}", coord, e);
                for pass in MeshPass::ALL {
                    self.meshes.remove(&(coord, pass));
                }
                self.failures.insert(coord, e);
                false
            }
        }
    }

    pub fn mesh(&self, coord: ChunkCoord, pass: MeshPass) -> Option<&MeshDefinition> {
        self.meshes.get(&(coord, pass)).map(|p| &p.mesh)
    }

    pub fn published(&self, coord: ChunkCoord, pass: MeshPass) -> Option<&PublishedMesh> {
        self.meshes.get(&(coord, pass))
    }

    pub fn failure(&self, coord: ChunkCoord) -> Option<&MeshError> {
        self.failures.get(&coord)
    }

    pub fn iter_meshes(&self) -> impl Iterator<Item = (ChunkCoord, MeshPass, &PublishedMesh)> {
        self.meshes.iter().map(|(&(c, p), m)| (c, p, m))
    }

    pub fn queue_debug_counts(&self) -> (usize, usize) {
        self.runtime.queue_debug_counts()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            chunks: self.chunks.len(),
            meshes: self.meshes.len(),
            dirty: self.dirty_count(),
            pending: self.inflight.len(),
            failed: self.failures.len(),
            quads: self.meshes.values().map(|p| p.mesh.quad_count()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_blocks::{
        AtlasLocator, Block, BlockDef, BlockRegistry, BlockTable, Shape, TextureAtlas,
        TextureLocation,
    };

    fn store() -> MeshStore {
        let mut reg = BlockRegistry::new();
        reg.insert(BlockDef::new(0, "air", Shape::Empty, true)).unwrap();
        reg.insert(BlockDef::new(1, "stone", Shape::Cube, false)).unwrap();
        reg.insert(BlockDef::new(2, "glass", Shape::Cube, true)).unwrap();
        let mut atlas = TextureAtlas::new();
        atlas.insert("stone", TextureLocation::full(0));
        atlas.insert("glass", TextureLocation::full(1));
        let blocks: Arc<dyn BlockTable> = Arc::new(reg);
        let atlas: Arc<dyn AtlasLocator> = Arc::new(atlas);
        MeshStore::new(Runtime::with_workers(blocks, atlas, 2).unwrap())
    }

    fn chunk(cx: i32, cz: i32, block: Block) -> ChunkBuf {
        ChunkBuf::filled(ChunkCoord::new(cx, cz), 2, 2, 2, block)
    }

    #[test]
    fn builds_both_passes_for_dirty_chunks() {
        let mut store = store();
        store.insert_chunk(chunk(0, 0, Block::new(1)));
        let mut mixed = chunk(1, 0, Block::new(1));
        mixed.set_local(0, 1, 0, Block::new(2));
        store.insert_chunk(mixed);
        assert_eq!(store.dirty_count(), 2);

        let published = store.build_all();
        assert_eq!(published, 4);
        let stats = store.stats();
        assert_eq!(stats.dirty, 0);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.meshes, 4);

        // 2x2x2 stone cube: only the hull, 4 faces per side
        let solid = store.mesh(ChunkCoord::new(0, 0), MeshPass::Opaque).unwrap();
        assert_eq!(solid.quad_count(), 24);
        assert!(store
            .mesh(ChunkCoord::new(0, 0), MeshPass::Transparent)
            .unwrap()
            .is_empty());

        let glass = store.mesh(ChunkCoord::new(1, 0), MeshPass::Transparent).unwrap();
        // glass at a corner: three boundary faces, three toward opaque stone are culled
        assert_eq!(glass.quad_count(), 3);
        assert_eq!(glass.offset.x, 2.0);
    }

    #[test]
    fn reinsert_bumps_revision_and_republishes() {
        let mut store = store();
        let first = store.insert_chunk(chunk(0, 0, Block::new(1)));
        store.build_all();
        let second = store.insert_chunk(chunk(0, 0, Block::AIR));
        assert!(second > first);
        assert_eq!(store.dirty_count(), 1);
        store.build_all();
        let p = store.published(ChunkCoord::new(0, 0), MeshPass::Opaque).unwrap();
        assert_eq!(p.rev, second);
        assert!(p.mesh.is_empty());
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut store = store();
        store.insert_chunk(chunk(0, 0, Block::new(1)));
        store.schedule_dirty();
        // new data arrives while the old build is in flight
        let rev = store.insert_chunk(chunk(0, 0, Block::AIR));
        store.wait_idle();
        assert!(store.mesh(ChunkCoord::new(0, 0), MeshPass::Opaque).is_none());
        store.build_all();
        let p = store.published(ChunkCoord::new(0, 0), MeshPass::Opaque).unwrap();
        assert_eq!(p.rev, rev);
        assert!(p.mesh.is_empty());
    }

    #[test]
    fn failed_chunk_is_recorded_and_parked() {
        let mut store = store();
        store.insert_chunk(chunk(0, 0, Block::new(9)));
        store.build_all();
        assert!(matches!(
            store.failure(ChunkCoord::new(0, 0)),
            Some(MeshError::MissingDefinition { id: 9, .. })
        ));
        assert!(store.mesh(ChunkCoord::new(0, 0), MeshPass::Opaque).is_none());
        assert!(!store.mark_dirty(ChunkCoord::new(0, 0)));
        assert_eq!(store.schedule_dirty(), 0);

        // replacing the data clears the failure
        store.insert_chunk(chunk(0, 0, Block::new(1)));
        store.build_all();
        assert!(store.failure(ChunkCoord::new(0, 0)).is_none());
        assert_eq!(store.stats().failed, 0);
        assert!(store.mesh(ChunkCoord::new(0, 0), MeshPass::Opaque).is_some());
    }

    #[test]
    fn dirty_chunks_are_ordered_by_distance() {
        let mut store = store();
        let center = ChunkCoord::new(5, 5);
        store.set_center(center);
        for (dx, dz) in [(2, 0), (0, 0), (-1, 1), (0, -1)] {
            let c = center.offset(dx, dz);
            store.insert_chunk(chunk(c.cx, c.cz, Block::AIR));
        }
        assert_eq!(
            store.dirty_by_distance(),
            vec![
                center,
                center.offset(0, -1),
                center.offset(-1, 1),
                center.offset(2, 0),
            ]
        );
    }

    #[test]
    fn queue_drains_after_wait() {
        let mut store = store();
        for cx in 0..4 {
            store.insert_chunk(chunk(cx, 0, Block::new(1)));
        }
        assert_eq!(store.schedule_dirty(), 8);
        store.wait_idle();
        assert_eq!(store.queue_debug_counts(), (0, 0));
        assert_eq!(store.stats().pending, 0);
    }

    #[test]
    fn remove_chunk_drops_meshes() {
        let mut store = store();
        store.insert_chunk(chunk(0, 0, Block::new(1)));
        store.build_all();
        assert!(store.remove_chunk(ChunkCoord::new(0, 0)));
        assert_eq!(store.stats(), StoreStats::default());
        assert!(!store.mark_dirty(ChunkCoord::new(0, 0)));
    }
}
