// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "ecocam")]
#[command(about = "Capture photos and video, filter captures, and browse the media gallery")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available lenses and capabilities
    List,

    /// Take a photo
    Photo {
        /// Use the front-facing lens (default: back)
        #[arg(long)]
        front: bool,

        /// Fire the flash on capture
        #[arg(long)]
        flash: bool,

        /// Zoom ratio (clamped to the device range)
        #[arg(short, long)]
        zoom: Option<f32>,

        /// Output directory (default: resolved media directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Record a video
    Video {
        /// Recording duration in seconds
        #[arg(short, long, default_value = "10")]
        duration: u64,

        /// Use the front-facing lens (default: back)
        #[arg(long)]
        front: bool,

        /// Output directory (default: resolved media directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List captured media, newest first
    Gallery {
        /// Media directory (default: resolved media directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=ecocam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => cli::list_lenses(),
        Commands::Photo {
            front,
            flash,
            zoom,
            output,
        } => cli::take_photo(front, flash, zoom, output).await,
        Commands::Video {
            duration,
            front,
            output,
        } => cli::record_video(duration, front, output).await,
        Commands::Gallery { dir } => cli::show_gallery(dir),
    }
}
