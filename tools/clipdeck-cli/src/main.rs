//! Clipdeck CLI: overlay compositing and clip transforms from the terminal.
//!
//! Usage:
//!   clipdeck gif <VIDEO> --start <S> --end <E>      Convert a range to GIF
//!   clipdeck trim <VIDEO> --start <S> --end <E>     Cut a range without re-encoding
//!   clipdeck resize <VIDEO> --width <W> --height <H>
//!   clipdeck overlay <VIDEO> --script <JSON>        Composite scripted overlays
//!   clipdeck draw --script <JSON> -o <PNG>          Render overlays only
//!   clipdeck check                                  Check engine availability

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clipdeck_common::config::AppConfig;

mod commands;
mod script;

#[derive(Parser)]
#[command(
    name = "clipdeck",
    about = "Annotate, trim, resize, and GIF-ify video clips",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/clipdeck/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Range given in seconds, or in slider percent with `--percent`.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct RangeArgs {
    /// Range start
    #[arg(long)]
    start: f64,

    /// Range end
    #[arg(long)]
    end: f64,

    /// Interpret start/end as 0-100 slider positions over the video duration
    #[arg(long)]
    percent: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a time range of a video to an animated GIF
    Gif {
        /// Source video
        video: PathBuf,

        #[command(flatten)]
        range: RangeArgs,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cut a time range out of a video without re-encoding
    Trim {
        /// Source video
        video: PathBuf,

        #[command(flatten)]
        range: RangeArgs,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scale a video to explicit dimensions
    Resize {
        /// Source video
        video: PathBuf,

        /// Output width
        #[arg(long)]
        width: String,

        /// Output height
        #[arg(long)]
        height: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Composite scripted overlays onto a video
    Overlay {
        /// Source video
        video: PathBuf,

        /// Overlay script (JSON array of edit actions)
        #[arg(short, long)]
        script: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also save the overlay canvas as PNG
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Render scripted overlays to a transparent PNG
    Draw {
        /// Overlay script (JSON array of edit actions)
        #[arg(short, long)]
        script: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check engine and font availability
    Check {
        /// Write the effective configuration to the standard location
        #[arg(long)]
        save_config: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    clipdeck_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Gif {
            video,
            range,
            output,
        } => commands::gif::run(&config, video, range, output).await,
        Commands::Trim {
            video,
            range,
            output,
        } => commands::trim::run(&config, video, range, output).await,
        Commands::Resize {
            video,
            width,
            height,
            output,
        } => commands::resize::run(&config, video, &width, &height, output).await,
        Commands::Overlay {
            video,
            script,
            output,
            snapshot,
        } => commands::overlay::run(&config, video, script, output, snapshot).await,
        Commands::Draw { script, output } => commands::draw::run(&config, script, output),
        Commands::Check { save_config } => commands::check::run(&config, save_config),
    }
}
