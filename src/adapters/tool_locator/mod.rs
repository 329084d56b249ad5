//! Discovery of the external FFmpeg executables

use std::path::{Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};

/// Transcoding engine executable name
pub const FFMPEG: &str = "ffmpeg";
/// Probe executable name
pub const FFPROBE: &str = "ffprobe";

/// Resolved executable paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ToolPaths {
    /// Resolve both executables; configured paths take precedence over `PATH`
    pub fn discover(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> ConvertResult<Self> {
        Ok(Self {
            ffmpeg: locate(FFMPEG, ffmpeg)?,
            ffprobe: locate(FFPROBE, ffprobe)?,
        })
    }
}

/// Resolve one executable.
///
/// An explicitly configured path must exist; it is never silently replaced by
/// whatever `PATH` holds. Without one, `PATH` is searched.
pub fn locate(tool: &str, configured: Option<&Path>) -> ConvertResult<PathBuf> {
    let not_found = || ConvertError::EngineNotFound {
        tool: tool.to_string(),
    };

    match configured {
        Some(path) if path.components().count() > 1 || path.is_absolute() => {
            if path.is_file() {
                Ok(path.to_path_buf())
            } else {
                Err(not_found())
            }
        }
        // A bare name such as "ffmpeg-6" is looked up on PATH
        Some(name) => which::which(name).map_err(|_| not_found()),
        None => which::which(tool).map_err(|_| not_found()),
    }
}
