//! Command implementations

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::adapters::{ConfigOverrides, ConsoleReporter, TomlConfigAdapter, ToolPaths};
use crate::app::{AppContainer, ConvertRequest, DefaultAppContainer};
use crate::cli::args::ConvertArgs;
use crate::cli::{Cli, Commands};
use crate::domain::model::InterviewMode;
use crate::ports::Reporter;
use crate::utils::{logging, path::PathUtils};

/// Dispatch the parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        log_level,
        config,
        command,
    } = cli;

    match command {
        Commands::Convert(args) => {
            let overrides = ConfigOverrides {
                config_path: config,
                log_level,
                ffmpeg: args.ffmpeg.clone(),
                ffprobe: args.ffprobe.clone(),
                verbose: args.verbose,
            };
            convert(args, overrides).await
        }
        Commands::Version => {
            println!("{}", version());
            Ok(())
        }
    }
}

/// Execute the convert command
pub async fn convert(args: ConvertArgs, overrides: ConfigOverrides) -> Result<()> {
    let settings = TomlConfigAdapter::new().load(&overrides)?;
    logging::init(settings.log_level);
    if let Some(source) = &settings.source {
        debug!("Using configuration file {}", source.display());
    }

    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new(settings.log_level));
    if !io::stdout().is_terminal() {
        reporter.warning("Standard output is not a terminal");
        reporter.warning("- Prompts and the progress bar may not display correctly");
    }

    let tools = ToolPaths::discover(settings.ffmpeg.as_deref(), settings.ffprobe.as_deref())?;
    debug!(
        "Using ffmpeg at {} and ffprobe at {}",
        tools.ffmpeg.display(),
        tools.ffprobe.display()
    );

    let input = PathUtils::expand(&args.input).context("Failed to resolve input path")?;
    let output = PathUtils::expand(&args.output).context("Failed to resolve output path")?;
    let mode = if args.use_defaults {
        InterviewMode::Defaults
    } else {
        InterviewMode::Interactive
    };

    let container = DefaultAppContainer::new(tools, settings.catalog, reporter, args.verbose);
    let response = container
        .convert_interactor()
        .execute(ConvertRequest {
            input,
            output,
            mode,
            verbose: args.verbose,
        })
        .await?;

    debug!("Encoded {} frames", response.frames);
    Ok(())
}

/// Program version and target platform
pub fn version() -> String {
    format!(
        "mpeg-convert {}\n - Target: {}/{}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
