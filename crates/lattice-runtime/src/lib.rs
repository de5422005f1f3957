//! Runtime job queue and worker pool for chunk mesh builds.
#![forbid(unsafe_code)]

mod mesh_store;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use lattice_blocks::{AtlasLocator, BlockTable};
use lattice_chunk::{ChunkBuf, ChunkCoord};
use lattice_mesh_cpu::{
    BlockFilter, BuildStats, ChunkMeshBuilder, MeshDefinition, MeshError, OpaqueCubes,
    TransparentCubes,
};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

pub use mesh_store::{MeshStore, PublishedMesh, StoreStats};

/// Separate meshes per chunk so translucent geometry can be drawn last.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MeshPass {
    Opaque,
    Transparent,
}

impl MeshPass {
    pub const ALL: [MeshPass; 2] = [MeshPass::Opaque, MeshPass::Transparent];

    pub fn filter(self) -> &'static dyn BlockFilter {
        match self {
            MeshPass::Opaque => &OpaqueCubes,
            MeshPass::Transparent => &TransparentCubes,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BuildJob {
    pub coord: ChunkCoord,
    pub pass: MeshPass,
    pub rev: u64,
    pub job_id: u64,
    pub buf: Arc<ChunkBuf>,
}

pub struct JobOut {
    pub coord: ChunkCoord,
    pub pass: MeshPass,
    pub rev: u64,
    pub job_id: u64,
    pub result: Result<(MeshDefinition, BuildStats), MeshError>,
    pub t_total_ms: u32,
}

fn process_build_job(job: BuildJob, blocks: &dyn BlockTable, atlas: &dyn AtlasLocator) -> JobOut {
    let BuildJob {
        coord,
        pass,
        rev,
        job_id,
        buf,
    } = job;
    let t_job_start = Instant::now();
    let result = ChunkMeshBuilder::new(blocks, atlas).build_with_stats(&buf, pass.filter());
    let t_total_ms = t_job_start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    JobOut {
        coord,
        pass,
        rev,
        job_id,
        result,
        t_total_ms,
    }
}

pub struct Runtime {
    job_tx: Sender<BuildJob>,
    res_rx: Receiver<JobOut>,
    _pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    pub workers: usize,
}

impl Runtime {
    /// Starts one worker per available core.
    pub fn new(
        blocks: Arc<dyn BlockTable>,
        atlas: Arc<dyn AtlasLocator>,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::with_workers(blocks, atlas, workers)
    }

    pub fn with_workers(
        blocks: Arc<dyn BlockTable>,
        atlas: Arc<dyn AtlasLocator>,
        workers: usize,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<BuildJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("lattice-mesh-{i}"))
                .build()?,
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let blocks = blocks.clone();
            let atlas = atlas.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    let out = process_build_job(job, blocks.as_ref(), atlas.as_ref());
                    // settle counters before the result becomes visible
                    inflight.fetch_sub(1, Ordering::Relaxed);
                    if tx.send(out).is_err() {
                        break;
                    }
                }
            });
        }
        log::info!("mesh runtime started with {} worker(s)", workers);

        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            queued,
            inflight,
            workers,
        })
    }

    pub fn submit(&self, job: BuildJob) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub fn drain_worker_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks until one result arrives; `None` once all workers are gone.
    pub fn recv_result(&self) -> Option<JobOut> {
        self.res_rx.recv().ok()
    }

    /// `(queued, inflight)` job counts.
    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}
