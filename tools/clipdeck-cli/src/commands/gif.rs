//! Convert a time range of a video to GIF.

use std::path::PathBuf;

use clipdeck_common::config::AppConfig;
use clipdeck_transcode::ClipOperation;

use super::{build_pipeline, clip_range, load_source, save_artifact};
use crate::RangeArgs;

pub async fn run(
    config: &AppConfig,
    video: PathBuf,
    range: RangeArgs,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Creating GIF from: {}", video.display());

    let source = load_source(config, &video)?;
    let operation = ClipOperation::Gif(clip_range(range, &source)?);

    let pipeline = build_pipeline(config)?;
    let artifact = pipeline
        .run(&operation, &source)
        .await
        .map_err(|e| anyhow::anyhow!("GIF conversion failed: {e}"))?;

    save_artifact(&artifact, output, &video)?;
    Ok(())
}
