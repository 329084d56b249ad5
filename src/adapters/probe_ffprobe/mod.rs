//! FFprobe adapter for media file probing
//!
//! Shells out to `ffprobe -v error -print_format json -show_streams` and
//! hands the JSON document to [`StreamMetadata::from_probe_json`].

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::adapters::tool_locator::FFPROBE;
use crate::error::{ConvertError, ConvertResult};
use crate::ports::ProbePort;
use crate::probe::StreamMetadata;

/// Arguments placed before the input path
const PROBE_ARGS: [&str; 5] = ["-v", "error", "-print_format", "json", "-show_streams"];

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    ffprobe_path: PathBuf,
    verbose: bool,
}

impl FFprobeAdapter {
    pub fn new(ffprobe_path: PathBuf) -> Self {
        Self {
            ffprobe_path,
            verbose: false,
        }
    }

    /// Log ffprobe's stderr, matching the `--verbose` switch used for ffmpeg
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Full argument vector for probing `file_path`
    pub fn arguments(file_path: &str) -> Vec<String> {
        PROBE_ARGS
            .iter()
            .map(|arg| arg.to_string())
            .chain(std::iter::once(file_path.to_string()))
            .collect()
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_streams(&self, file_path: &str) -> ConvertResult<StreamMetadata> {
        let arguments = Self::arguments(file_path);
        debug!("Running {} {:?}", self.ffprobe_path.display(), arguments);

        let output = Command::new(&self.ffprobe_path)
            .args(&arguments)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|error| match error.kind() {
                io::ErrorKind::NotFound => ConvertError::EngineNotFound {
                    tool: FFPROBE.to_string(),
                },
                _ => ConvertError::Io(error),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in diagnostic_lines(&stderr, self.verbose) {
            debug!("[FFprobe] {}", line);
        }

        if !output.status.success() {
            let message = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("ffprobe exited with {}", output.status));
            return Err(ConvertError::Probe { message });
        }

        StreamMetadata::from_probe_json(&String::from_utf8_lossy(&output.stdout)).map_err(|error| {
            ConvertError::Probe {
                message: format!("unreadable ffprobe output: {}", error),
            }
        })
    }
}

/// Non-blank stderr lines worth logging; none unless verbose
fn diagnostic_lines(stderr: &str, verbose: bool) -> Vec<&str> {
    if !verbose {
        return Vec::new();
    }
    stderr.lines().filter(|line| !line.trim().is_empty()).collect()
}
