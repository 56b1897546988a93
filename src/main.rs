use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use wclgen::masks::DirMaskStore;
use wclgen::pipeline::{Pipeline, PipelineOptions};
use wclgen::render::SpiralConfig;
use wclgen::server;

/// Word-cloud rendering service: POST /wcl with a JSON body, get a PNG back.
#[derive(Parser, Debug)]
#[command(name = "wclgen", version, about)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Directory holding mask silhouettes (circle.png, cloud.png)
    #[arg(long, default_value = "masks")]
    masks_dir: PathBuf,

    /// Font file for the built-in renderer; system fonts are probed when
    /// this is not set
    #[arg(long)]
    font: Option<PathBuf>,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Seed for the placement random stream
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Feed request text to the renderer without sanitization
    #[arg(long)]
    raw_text: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let renderer = wclgen::new_renderer(SpiralConfig {
        font_path: args.font.clone(),
        seed: args.seed,
        ..SpiralConfig::default()
    })
    .context("failed to initialize the renderer")?;

    let pipeline = Arc::new(Pipeline::with_options(
        renderer,
        DirMaskStore::new(&args.masks_dir),
        PipelineOptions {
            sanitize_text: !args.raw_text,
        },
    ));

    let workers = args.workers.unwrap_or_else(num_cpus::get).max(1);
    server::serve(&args.bind, pipeline, workers)
}
