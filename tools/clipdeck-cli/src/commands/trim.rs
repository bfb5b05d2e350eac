//! Cut a time range out of a video.

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
    println!("Trimming: {}", video.display());

    let source = load_source(config, &video)?;
    let operation = ClipOperation::Trim(clip_range(range, &source)?);

    let pipeline = build_pipeline(config)?;
    let artifact = pipeline
        .run(&operation, &source)
        .await
        .map_err(|e| anyhow::anyhow!("Trim failed: {e}"))?;

    save_artifact(&artifact, output, &video)?;
    Ok(())
}
