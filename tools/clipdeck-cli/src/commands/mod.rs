//! Subcommand implementations and the plumbing they share.

pub mod check;
pub mod draw;
pub mod gif;
pub mod overlay;
pub mod resize;
pub mod trim;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clipdeck_common::config::AppConfig;
use clipdeck_transcode::probe::probe_duration;
use clipdeck_transcode::{
    Artifact, ClipRange, FfmpegEngine, PipelineEvent, SourceVideo, TranscodePipeline,
};

use crate::RangeArgs;

/// Load the source video, probing its duration when ffprobe is available.
pub fn load_source(config: &AppConfig, video: &Path) -> anyhow::Result<SourceVideo> {
    let duration = probe_duration(&config.engine.ffprobe, video);
    if duration.is_none() {
        tracing::debug!(video = %video.display(), "Duration unknown");
    }
    let source = SourceVideo::from_path(video, duration)?;
    println!("Source: {} ({} bytes)", source.name, source.bytes.len());
    if let Some(d) = source.duration_secs {
        println!("  Duration: {d:.2}s");
    }
    Ok(source)
}

/// Engine plus pipeline, reporting progress on stdout.
pub fn build_pipeline(config: &AppConfig) -> anyhow::Result<TranscodePipeline<FfmpegEngine>> {
    let engine = FfmpegEngine::new(&config.engine)?;
    let sink = Arc::new(|event: PipelineEvent| match event {
        PipelineEvent::Started { kind } => println!("  Running {kind}..."),
        PipelineEvent::ResultReady {
            mime,
            bytes,
            filename,
            ..
        } => println!("  Produced {filename} ({mime}, {bytes} bytes)"),
        PipelineEvent::Failed { message, .. } => println!("  Failed: {message}"),
        PipelineEvent::Ended { .. } => {}
    });
    Ok(TranscodePipeline::new(engine, config.engine.concurrency).with_event_sink(sink))
}

/// Resolve a CLI range against the source.
pub fn clip_range(range: RangeArgs, source: &SourceVideo) -> anyhow::Result<ClipRange> {
    let clip = if range.percent {
        ClipRange::from_slider([range.start, range.end], source.require_duration()?)?
    } else {
        ClipRange::new(range.start, range.end)?
    };
    println!(
        "  Range: {:.3}s - {:.3}s ({:.3}s)",
        clip.start_secs,
        clip.end_secs,
        clip.duration_secs()
    );
    Ok(clip)
}

/// Write the artifact to `output`, or next to the source video under its
/// suggested filename.
pub fn save_artifact(
    artifact: &Artifact,
    output: Option<PathBuf>,
    video: &Path,
) -> anyhow::Result<PathBuf> {
    let path = match output {
        Some(path) => {
            artifact.save_to(&path)?;
            path
        }
        None => {
            let dir = video
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            artifact.save_in_dir(dir)?
        }
    };
    println!("Saved: {}", path.display());
    Ok(path)
}
