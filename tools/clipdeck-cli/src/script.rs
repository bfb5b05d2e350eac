//! Overlay scripts: JSON edit actions replayed through an editor session.
//!
//! ```json
//! [
//!   { "action": "add_rectangle", "x": 40, "y": 40, "color": "#ff000080" },
//!   { "action": "add_text", "label": "Chapter 1", "x": 60, "y": 300 },
//!   { "action": "drag", "from": [100, 80], "path": [[140, 90], [180, 100]] },
//!   { "action": "set_color", "index": 1, "color": "#fff" }
//! ]
//! ```
//!
//! Drag coordinates are client (displayed) positions, converted through the
//! configured canvas display size like real pointer input.

use std::path::Path;

use anyhow::Context;
use clipdeck_common::error::ClipdeckResult;
use clipdeck_editor_core::{EditorSession, RectangleSpec, TextSpec};
use clipdeck_overlay_model::color::HexColor;
use clipdeck_overlay_model::geometry::Point;
use clipdeck_render_engine::canvas::DrawSurface;
use serde::Deserialize;

/// One editor action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    AddRectangle(RectangleSpec),
    AddText(TextSpec),
    SetLabel { index: usize, label: String },
    SetColor { index: usize, color: HexColor },
    Delete { index: usize },
    Clear,
    /// Press at `from`, move through `path`, release.
    Drag {
        from: [f64; 2],
        #[serde(default)]
        path: Vec<[f64; 2]>,
    },
}

/// Read a script file.
pub fn load(path: &Path) -> anyhow::Result<Vec<ScriptAction>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read overlay script {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid overlay script {}", path.display()))
}

pub fn parse(content: &str) -> anyhow::Result<Vec<ScriptAction>> {
    Ok(serde_json::from_str(content)?)
}

/// Replay `actions` in order, stopping at the first failure.
pub fn apply<S: DrawSurface>(
    session: &mut EditorSession<S>,
    actions: &[ScriptAction],
) -> ClipdeckResult<()> {
    for (step, action) in actions.iter().enumerate() {
        tracing::debug!(step, ?action, "Applying script action");
        match action.clone() {
            ScriptAction::AddRectangle(spec) => {
                session.add_rectangle(spec)?;
            }
            ScriptAction::AddText(spec) => {
                session.add_text(spec)?;
            }
            ScriptAction::SetLabel { index, label } => session.set_label(index, label)?,
            ScriptAction::SetColor { index, color } => session.set_color(index, color)?,
            ScriptAction::Delete { index } => {
                session.delete(index)?;
            }
            ScriptAction::Clear => session.clear(),
            ScriptAction::Drag { from, path } => {
                let path: Vec<Point> = path.iter().map(|&[x, y]| Point::new(x, y)).collect();
                let moves = session.drag_gesture(Point::new(from[0], from[1]), &path);
                tracing::debug!(step, moves, "Drag replayed");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipdeck_common::config::CanvasConfig;
    use clipdeck_common::error::ClipdeckError;

    fn unscaled_session() -> EditorSession {
        let config = CanvasConfig {
            width: 800,
            height: 600,
            display_width: 800.0,
            ..CanvasConfig::default()
        };
        EditorSession::from_config(&config).unwrap()
    }

    #[test]
    fn test_parse_all_actions() {
        let actions = parse(
            r##"[
                {"action": "add_rectangle", "x": 10, "y": 20, "width": 50, "color": "#f00"},
                {"action": "add_text"},
                {"action": "set_label", "index": 1, "label": "Hi"},
                {"action": "set_color", "index": 0, "color": "#00ff00"},
                {"action": "drag", "from": [30, 40], "path": [[35, 45]]},
                {"action": "delete", "index": 0},
                {"action": "clear"}
            ]"##,
        )
        .unwrap();

        assert_eq!(actions.len(), 7);
        match &actions[0] {
            ScriptAction::AddRectangle(spec) => {
                assert_eq!(spec.x, Some(10.0));
                assert_eq!(spec.width, Some(50.0));
                assert_eq!(spec.height, None);
                assert_eq!(spec.color.as_ref().map(|c| c.as_str()), Some("#f00"));
            }
            other => panic!("unexpected action {other:?}"),
        }
        assert_eq!(actions[1], ScriptAction::AddText(TextSpec::default()));
        assert_eq!(actions[6], ScriptAction::Clear);
    }

    #[test]
    fn test_bad_color_rejected_at_parse() {
        assert!(parse(r#"[{"action": "set_color", "index": 0, "color": "red"}]"#).is_err());
        assert!(parse(r#"[{"action": "explode"}]"#).is_err());
    }

    #[test]
    fn test_apply_edits_and_drag() {
        let mut session = unscaled_session();
        let actions = parse(
            r##"[
                {"action": "add_rectangle", "x": 100, "y": 100},
                {"action": "add_rectangle", "x": 400, "y": 400, "color": "#fff"},
                {"action": "drag", "from": [110, 110], "path": [[150, 150]]},
                {"action": "set_label", "index": 1, "label": "Box"}
            ]"##,
        )
        .unwrap();

        apply(&mut session, &actions).unwrap();

        let overlays = session.overlays();
        assert_eq!(overlays.len(), 2);
        assert_eq!((overlays[0].x, overlays[0].y), (75.0, 100.0));
        assert!(!overlays[0].is_dragging);
        assert_eq!(overlays[1].label, "Box");
    }

    #[test]
    fn test_apply_stops_at_first_failure() {
        let mut session = unscaled_session();
        let actions = parse(
            r#"[
                {"action": "add_text", "x": 0, "y": 100},
                {"action": "delete", "index": 3},
                {"action": "clear"}
            ]"#,
        )
        .unwrap();

        let err = apply(&mut session, &actions).unwrap_err();
        assert!(matches!(err, ClipdeckError::IndexOutOfRange { index: 3, len: 1 }));
        assert_eq!(session.overlays().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("missing.json")).is_err());
    }
}
