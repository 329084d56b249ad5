//! MPEG-Convert
//!
//! Interactive command-line front-end for FFmpeg. The source file is probed,
//! the encoding options are gathered through a short interview and the
//! conversion runs with a live progress bar.
//!
//! # Usage
//!
//! ```bash
//! mpeg-convert convert input.mov output.mp4
//! mpeg-convert convert --default input.mov output.mp4
//! mpeg-convert version
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use mpeg_convert::cli::{commands, Cli};
use mpeg_convert::error::ConvertError;

/// Main entry point for the MPEG-Convert CLI application
#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse();

    let outcome = tokio::select! {
        result = commands::run(cli) => result,
        Ok(()) = tokio::signal::ctrl_c() => Err(ConvertError::Interrupted.into()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => match error.downcast_ref::<ConvertError>() {
            Some(convert_error) if convert_error.is_cancellation() => {
                info!("{}", convert_error);
                // A prompt may still be blocked on stdin; leave without joining it
                std::process::exit(i32::from(convert_error.exit_code()))
            }
            Some(convert_error) => {
                report_fatal(&error, &convert_error.notes());
                ExitCode::from(convert_error.exit_code())
            }
            None => {
                report_fatal(&error, &[]);
                ExitCode::FAILURE
            }
        },
    }
}

/// Print a fatal error and its notes to stderr
fn report_fatal(error: &anyhow::Error, notes: &[String]) {
    eprintln!("[Fatal] {:#}", error);
    for note in notes {
        eprintln!("[Fatal] {}", note);
    }
}
