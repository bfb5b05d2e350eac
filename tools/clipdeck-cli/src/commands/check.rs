//! Check engine and font availability.

use clipdeck_common::config::{config_file_path, AppConfig};
use clipdeck_render_engine::text::load_glyphs;
use clipdeck_transcode::engine::command_exists;

pub fn run(config: &AppConfig, save_config: bool) -> anyhow::Result<()> {
    println!("Clipdeck System Check");
    println!("{}", "=".repeat(50));

    let config_path = config_file_path();
    if save_config {
        let written = config.save()?;
        println!("[OK] Config written: {}", written.display());
    } else if config_path.exists() {
        match AppConfig::try_load_from(&config_path) {
            Ok(_) => println!("[OK] Config: {}", config_path.display()),
            Err(e) => println!("[WARN] {e} (defaults in use)"),
        }
    } else {
        println!("[INFO] Config: defaults ({} not found)", config_path.display());
    }

    let mut ready = true;
    for (role, binary) in [
        ("Transcode engine", &config.engine.ffmpeg),
        ("Probe", &config.engine.ffprobe),
    ] {
        if command_exists(binary) {
            println!("[OK] {role}: {binary}");
        } else {
            println!("[MISSING] {role}: {binary} not found on PATH");
            ready = false;
        }
    }

    let glyphs = load_glyphs(&config.canvas);
    if glyphs.name() == "block" {
        println!("[WARN] Font: none found, text overlays use block glyphs");
    } else {
        println!("[OK] Font: {} at {}px", glyphs.name(), config.canvas.font_size);
    }

    println!(
        "     Canvas {}x{} displayed at {:.1}x{:.1}, drag policy {:?}",
        config.canvas.width,
        config.canvas.height,
        config.canvas.display_width,
        config.canvas.effective_display_height(),
        config.canvas.drag_policy
    );

    println!();
    if ready {
        println!("Clipdeck is ready.");
    } else {
        println!("Install ffmpeg (with ffprobe) to run clip transforms.");
    }
    Ok(())
}
