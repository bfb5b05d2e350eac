//! Scale a video to explicit dimensions.

use std::path::PathBuf;

use clipdeck_common::config::AppConfig;
use clipdeck_transcode::probe::probe_dimensions;
use clipdeck_transcode::{ClipOperation, ResizeDimensions};

use super::{build_pipeline, load_source, save_artifact};

pub async fn run(
    config: &AppConfig,
    video: PathBuf,
    width: &str,
    height: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Resizing: {}", video.display());

    let dimensions = ResizeDimensions::parse(width, height)?;
    let source = load_source(config, &video)?;
    if let Some((w, h)) = probe_dimensions(&config.engine.ffprobe, &video) {
        println!("  Input: {w}x{h}");
    }
    println!("  Output: {}x{}", dimensions.width, dimensions.height);

    let pipeline = build_pipeline(config)?;
    let artifact = pipeline
        .run(&ClipOperation::Resize(dimensions), &source)
        .await
        .map_err(|e| anyhow::anyhow!("Resize failed: {e}"))?;

    save_artifact(&artifact, output, &video)?;
    Ok(())
}
