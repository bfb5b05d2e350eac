//! Render scripted overlays to a PNG without touching a video.

use std::path::PathBuf;

use clipdeck_common::config::AppConfig;
use clipdeck_editor_core::EditorSession;

use crate::script;

pub fn run(config: &AppConfig, script_path: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let actions = script::load(&script_path)?;
    let mut session = EditorSession::from_config(&config.canvas)?;
    script::apply(&mut session, &actions)?;

    let png = session.snapshot_png()?;
    std::fs::write(&output, &png)?;
    println!(
        "Rendered {} overlay(s) to {} ({} bytes)",
        session.overlays().len(),
        output.display(),
        png.len()
    );
    Ok(())
}
