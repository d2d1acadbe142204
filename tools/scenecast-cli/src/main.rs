//! Scenecast CLI: capture, replay, split, and stream scene documents.
//!
//! Usage:
//!   scenecast capture [OPTIONS]   Capture the demo scene into a document
//!   scenecast replay <PATH>       Reconstruct a document frame by frame
//!   scenecast split <PATH>        Write one document per identity
//!   scenecast stream [OPTIONS]    Stream the demo scene as live wire JSON
//!   scenecast info <PATH>         Show document information
//!   scenecast init                Write the default configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod demo;

#[derive(Parser)]
#[command(
    name = "scenecast",
    about = "Frame-by-frame scene capture and JSON replay",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture the built-in demo scene into a document file
    Capture {
        /// Output document path (defaults to scene.json in the
        /// configured documents directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of frames to capture
        #[arg(long, default_value = "120")]
        frames: u64,

        /// Frames per second of simulated time
        #[arg(long)]
        fps: Option<f64>,

        /// Output width in pixels
        #[arg(long)]
        pixel_width: Option<u32>,

        /// Output height in pixels
        #[arg(long)]
        pixel_height: Option<u32>,

        /// Visible frame height in model units
        #[arg(long)]
        frame_height: Option<f64>,

        /// Background color (#rrggbb)
        #[arg(long)]
        background: Option<String>,
    },

    /// Reconstruct a document frame by frame
    Replay {
        /// Path to the document
        path: PathBuf,

        /// Keep objects on display after their last frame
        #[arg(long)]
        persist: bool,
    },

    /// Write one document per identity
    Split {
        /// Path to the document
        path: PathBuf,

        /// Output directory for the layer documents
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Layer label prefix (defaults to the document file stem)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Stream the demo scene as live wire JSON
    Stream {
        /// Number of frames to stream
        #[arg(long, default_value = "120")]
        frames: u64,

        /// Tag every frame with this stream identity
        #[arg(long)]
        stream_id: Option<String>,

        /// Write the wire to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frames per second of simulated time
        #[arg(long)]
        fps: Option<f64>,

        /// Output width in pixels
        #[arg(long)]
        pixel_width: Option<u32>,

        /// Output height in pixels
        #[arg(long)]
        pixel_height: Option<u32>,

        /// Visible frame height in model units
        #[arg(long)]
        frame_height: Option<f64>,

        /// Background color (#rrggbb)
        #[arg(long)]
        background: Option<String>,
    },

    /// Show document information
    Info {
        /// Path to the document
        path: PathBuf,
    },

    /// Write the default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = scenecast_common::config::AppConfig::load();
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    scenecast_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Capture {
            output,
            frames,
            fps,
            pixel_width,
            pixel_height,
            frame_height,
            background,
        } => commands::capture::run(
            output,
            frames,
            fps,
            pixel_width,
            pixel_height,
            frame_height,
            background,
        ),
        Commands::Replay { path, persist } => commands::replay::run(path, persist),
        Commands::Split {
            path,
            output,
            prefix,
        } => commands::split::run(path, output, prefix),
        Commands::Stream {
            frames,
            stream_id,
            output,
            fps,
            pixel_width,
            pixel_height,
            frame_height,
            background,
        } => commands::stream::run(
            frames,
            stream_id,
            output,
            fps,
            pixel_width,
            pixel_height,
            frame_height,
            background,
        ),
        Commands::Info { path } => commands::info::run(path),
        Commands::Init { force } => commands::init::run(force),
    }
}
