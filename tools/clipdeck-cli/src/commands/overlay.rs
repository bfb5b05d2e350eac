//! Composite scripted overlays onto a video.

use std::path::PathBuf;

use clipdeck_common::config::AppConfig;
use clipdeck_editor_core::EditorSession;

use super::{build_pipeline, load_source, save_artifact};
use crate::script;

pub async fn run(
    config: &AppConfig,
    video: PathBuf,
    script_path: PathBuf,
    output: Option<PathBuf>,
    snapshot: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Compositing overlays onto: {}", video.display());

    let actions = script::load(&script_path)?;
    let mut session = EditorSession::from_config(&config.canvas)?;
    session.set_source(Some(load_source(config, &video)?));

    script::apply(&mut session, &actions)?;
    println!(
        "  Overlays: {} (canvas {}x{})",
        session.overlays().len(),
        config.canvas.width,
        config.canvas.height
    );

    if let Some(path) = snapshot {
        std::fs::write(&path, session.snapshot_png()?)?;
        println!("  Snapshot: {}", path.display());
    }

    let pipeline = build_pipeline(config)?;
    let artifact = session
        .composite(&pipeline)
        .await
        .map_err(|e| anyhow::anyhow!("Overlay compositing failed: {e}"))?;

    save_artifact(artifact, output, &video)?;
    Ok(())
}
