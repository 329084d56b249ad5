// Ports - Interface definitions (contracts)

use std::fmt;
use std::io;
use std::str::FromStr;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{ConvertError, ConvertResult};
use crate::probe::StreamMetadata;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a media file and return its stream structure
    async fn probe_streams(&self, file_path: &str) -> ConvertResult<StreamMetadata>;
}

/// Event emitted by a running transcode
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The engine was started with this argument vector
    Started(Vec<String>),
    /// Number of frames encoded so far
    Progress { frame: u64 },
    /// Raw diagnostic line from the engine
    Diagnostic(String),
    /// The engine reported the end of its progress stream
    Finished,
}

/// Port for running the transcoding engine
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Run the engine with `arguments` (without the executable itself).
    ///
    /// Events are pushed into `events` as they arrive; the call returns once
    /// the engine exits.
    async fn transcode(
        &self,
        arguments: &[String],
        events: mpsc::Sender<EngineEvent>,
    ) -> ConvertResult<()>;
}

/// Severity of a reporter message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Fatal,
}

impl FromStr for Severity {
    type Err = ConvertError;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.to_lowercase().as_str() {
            "debug" | "trace" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "fatal" | "error" => Ok(Severity::Fatal),
            _ => Err(ConvertError::Config {
                message: format!(
                    "Invalid log level: {}. Valid levels: debug, info, warning, fatal",
                    level
                ),
            }),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Debug => write!(f, "Debug"),
            Severity::Info => write!(f, "Info"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Fatal => write!(f, "Fatal"),
        }
    }
}

/// How a progress display behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Total frame count is known
    Determinate { total: u64 },
    /// Total frame count could not be derived
    Indeterminate,
}

impl ProgressMode {
    pub fn from_total(total: Option<u64>) -> Self {
        match total {
            Some(total) => ProgressMode::Determinate { total },
            None => ProgressMode::Indeterminate,
        }
    }
}

/// Port for user-facing log messages and progress
pub trait Reporter: Send + Sync {
    /// Emit a message if `severity` passes the reporter's emit level
    fn log(&self, severity: Severity, message: &str);

    fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    fn fatal(&self, message: &str) {
        self.log(Severity::Fatal, message);
    }

    /// Begin a progress display
    fn start_progress(&self, mode: ProgressMode);

    /// Advance the progress display by `frames`
    fn advance_progress(&self, frames: u64);

    /// Remove the progress display
    fn finish_progress(&self);
}

/// Port for asking the user questions
pub trait Prompter {
    /// Print a section heading
    fn section(&mut self, title: &str) -> io::Result<()>;

    /// Present numbered `options` and return the 1-based slot chosen
    fn choose(&mut self, title: &str, options: &[String], default: Option<usize>) -> io::Result<usize>;

    /// Ask a yes/no question
    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool>;

    /// Ask for a free-form line of text (may be empty)
    fn ask(&mut self, question: &str) -> io::Result<String>;
}
