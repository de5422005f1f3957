mod worldgen;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use lattice_blocks::{AtlasLocator, BlockRegistry, BlockTable, TextureAtlas};
use lattice_chunk::ChunkCoord;
use lattice_runtime::{MeshPass, MeshStore, Runtime};

use crate::worldgen::{WorldGen, WorldGenConfig, load_config_from_path};

#[derive(Parser, Debug)]
#[command(name = "lattice", about = "Generate a demo world and build its chunk meshes")]
struct Args {
    /// Block definitions (TOML)
    #[arg(long, default_value = "assets/blocks.toml")]
    blocks: PathBuf,
    /// Texture atlas layout (TOML)
    #[arg(long, default_value = "assets/atlas.toml")]
    atlas: PathBuf,
    /// Terrain parameters; built-in defaults when omitted
    #[arg(long)]
    worldgen: Option<PathBuf>,
    /// Chunks generated in each direction around the origin
    #[arg(long, default_value_t = 2)]
    radius: i32,
    #[arg(long, default_value_t = 1337)]
    seed: i32,
    /// Mesh worker threads; defaults to the number of cores
    #[arg(long)]
    workers: Option<usize>,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let reg = Arc::new(BlockRegistry::load_from_path(&args.blocks)?);
    let atlas = Arc::new(TextureAtlas::load_from_path(&args.atlas)?);
    log::info!(
        "loaded {} block(s) from {:?} and {} texture(s) from {:?}",
        reg.len(),
        args.blocks,
        atlas.len(),
        args.atlas
    );

    let cfg = match &args.worldgen {
        Some(path) => load_config_from_path(path)?,
        None => WorldGenConfig::default(),
    };
    let world = WorldGen::new(&cfg, &reg, args.seed)?;

    let blocks: Arc<dyn BlockTable> = reg.clone();
    let locator: Arc<dyn AtlasLocator> = atlas;
    let runtime = match args.workers {
        Some(n) => Runtime::with_workers(blocks, locator, n)?,
        None => Runtime::new(blocks, locator)?,
    };
    let mut store = MeshStore::new(runtime);

    let t0 = Instant::now();
    let center = ChunkCoord::default();
    store.set_center(center);
    let r = args.radius.max(0);
    for dz in -r..=r {
        for dx in -r..=r {
            store.insert_chunk(world.generate_chunk(center.offset(dx, dz)));
        }
    }
    log::info!("generated {} chunk(s) in {:?}", store.stats().chunks, t0.elapsed());

    let t1 = Instant::now();
    store.build_all();
    let elapsed = t1.elapsed();

    let mut opaque_quads = 0;
    let mut transparent_quads = 0;
    let mut culled = 0;
    for (coord, pass, published) in store.iter_meshes() {
        log::debug!(
            "chunk ({}, {}) {:?}: {} quad(s), {}ms",
            coord.cx,
            coord.cz,
            pass,
            published.mesh.quad_count(),
            published.stats.build_ms
        );
        culled += published.stats.faces_culled;
        match pass {
            MeshPass::Opaque => opaque_quads += published.mesh.quad_count(),
            MeshPass::Transparent => transparent_quads += published.mesh.quad_count(),
        }
    }
    let stats = store.stats();
    log::info!(
        "built {} mesh(es) in {:?}: {} opaque quad(s), {} transparent quad(s), {} face(s) culled",
        stats.meshes,
        elapsed,
        opaque_quads,
        transparent_quads,
        culled
    );

    if stats.failed > 0 {
        return Err(format!("{} chunk(s) failed to mesh", stats.failed).into());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
