//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input media file path
    pub input: String,

    /// Output file path; the extension selects the container
    pub output: String,

    /// Print FFmpeg diagnostics and debug messages
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip the interview and use the default options
    #[arg(short = 'd', long = "default")]
    pub use_defaults: bool,

    /// Path to the ffmpeg executable
    #[arg(long, env = "MPEG_CONVERT_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe executable
    #[arg(long, env = "MPEG_CONVERT_FFPROBE")]
    pub ffprobe: Option<PathBuf>,
}
