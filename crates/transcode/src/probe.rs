//! Media probing via ffprobe.
//!
//! Probing is best effort: a missing binary or unreadable file yields
//! `None`, and callers fall back to user-supplied values.

use std::path::Path;
use std::process::Command;

/// Width and height of the first video stream.
pub fn probe_dimensions(ffprobe: &str, path: &Path) -> Option<(u32, u32)> {
    let raw = run_ffprobe(
        ffprobe,
        &[
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=p=0:s=x",
        ],
        path,
    )?;
    parse_dimensions(&raw)
}

/// Container duration in seconds.
pub fn probe_duration(ffprobe: &str, path: &Path) -> Option<f64> {
    let raw = run_ffprobe(
        ffprobe,
        &[
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ],
        path,
    )?;
    parse_duration(&raw)
}

fn run_ffprobe(ffprobe: &str, args: &[&str], path: &Path) -> Option<String> {
    let output = Command::new(ffprobe)
        .args(["-v", "error"])
        .args(args)
        .arg(path)
        .output()
        .ok()?;

    if !output.status.success() {
        tracing::debug!(path = %path.display(), status = %output.status, "ffprobe failed");
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

fn parse_dimensions(raw: &str) -> Option<(u32, u32)> {
    let line = raw.lines().next()?.trim();
    let (w, h) = line.split_once('x')?;
    let width = w.parse::<u32>().ok()?;
    let height = h.parse::<u32>().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

fn parse_duration(raw: &str) -> Option<f64> {
    let secs = raw.lines().next()?.trim().parse::<f64>().ok()?;
    (secs.is_finite() && secs > 0.0).then_some(secs)
}
