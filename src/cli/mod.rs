//! CLI module for MPEG-Convert
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::ConvertArgs;

/// MPEG-Convert
///
/// Interactive front-end for FFmpeg: answer a few questions about the output
/// and watch the conversion progress.
#[derive(Parser, Debug)]
#[command(name = "mpeg-convert")]
#[command(about = "MPEG-Convert - Interactive FFmpeg conversions made simple")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (debug, info, warning, fatal)
    #[arg(long, global = true, env = "MPEG_CONVERT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Configuration file
    #[arg(long, global = true, env = "MPEG_CONVERT_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a media file, asking for the encoding options first
    Convert(args::ConvertArgs),
    /// Show program version and target platform
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from(["mpeg-convert", "convert", "-v", "-d", "in.mov", "out.mp4"]).unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.input, "in.mov");
                assert_eq!(args.output, "out.mp4");
                assert!(args.verbose);
                assert!(args.use_defaults);
            }
            other => panic!("expected convert, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_requires_both_paths() {
        assert!(Cli::try_parse_from(["mpeg-convert", "convert", "in.mov"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mpeg-convert",
            "convert",
            "in.mov",
            "out.mp4",
            "--log-level",
            "warning",
            "--config",
            "/tmp/mpeg-convert.toml",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("warning"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/mpeg-convert.toml")));
    }

    #[test]
    fn test_parse_version() {
        let cli = Cli::try_parse_from(["mpeg-convert", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }
}
