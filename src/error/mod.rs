//! Error handling module for MPEG-Convert

use thiserror::Error;

/// Main error type for MPEG-Convert operations
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The user answered "no" to an overwrite or continuation prompt
    #[error("User declined operation")]
    UserDeclined,

    /// The conversion was interrupted from the terminal
    #[error("Conversion interrupted")]
    Interrupted,

    /// FFmpeg or FFprobe could not be located
    #[error("Could not detect {tool} executable in system path")]
    EngineNotFound { tool: String },

    /// The transcoding engine exited unsuccessfully
    #[error("An FFmpeg exception has occurred: {message}")]
    EngineFailed {
        message: String,
        arguments: Vec<String>,
        /// Last stderr lines of the engine, oldest first
        diagnostics: Vec<String>,
    },

    /// Media probe error
    #[error("Failed to probe media file: {message}")]
    Probe { message: String },

    /// Malformed question catalogue
    #[error("Invalid question catalogue: {message}")]
    Catalog { message: String },

    /// Malformed configuration
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Input file not found or inaccessible
    #[error("Input path '{path}' is invalid")]
    InputNotFound { path: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Process exit code this error terminates the program with
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::UserDeclined | ConvertError::Interrupted => 0,
            ConvertError::EngineNotFound { .. } => 127,
            _ => 1,
        }
    }

    /// Neutral terminations that are not reported as failures
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ConvertError::UserDeclined | ConvertError::Interrupted)
    }

    /// Extra lines printed beneath the error message
    pub fn notes(&self) -> Vec<String> {
        match self {
            ConvertError::EngineNotFound { .. } => vec![
                "- Make sure FFmpeg is installed".to_string(),
                "- Make sure FFmpeg is in $PATH".to_string(),
            ],
            ConvertError::EngineFailed {
                arguments,
                diagnostics,
                ..
            } => {
                let mut notes = vec![format!("- Arguments to execute FFmpeg: {:?}", arguments)];
                if !diagnostics.is_empty() {
                    notes.push("- Last FFmpeg output:".to_string());
                    notes.extend(diagnostics.iter().map(|line| format!("   | {}", line)));
                }
                notes.extend(
                    [
                        "- Use the '-v' or '--verbose' option to hear FFmpeg output",
                        "- Common pitfalls:",
                        "   * Does the output file have an extension?",
                        "   * Does the extension match the codec?",
                        "   * Is the encoder installed on your system?",
                    ]
                    .iter()
                    .map(|note| note.to_string()),
                );
                notes
            }
            ConvertError::InputNotFound { .. } => vec![
                "- Usage: mpeg-convert convert [options] <file.in> <file.out>".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

/// Result type alias for MPEG-Convert operations
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ConvertError::UserDeclined.exit_code(), 0);
        assert_eq!(ConvertError::Interrupted.exit_code(), 0);
        assert_eq!(
            ConvertError::EngineNotFound { tool: "ffmpeg".to_string() }.exit_code(),
            127
        );
        let failed = ConvertError::EngineFailed {
            message: "Unknown encoder".to_string(),
            arguments: vec!["ffmpeg".to_string()],
            diagnostics: Vec::new(),
        };
        assert_eq!(failed.exit_code(), 1);
        assert!(!failed.is_cancellation());
        assert!(ConvertError::UserDeclined.is_cancellation());
    }

    #[test]
    fn test_engine_failure_notes_include_arguments() {
        let failed = ConvertError::EngineFailed {
            message: "Unknown encoder 'libfoo'".to_string(),
            arguments: vec!["ffmpeg".to_string(), "-c:v".to_string(), "libfoo".to_string()],
            diagnostics: Vec::new(),
        };
        let notes = failed.notes();
        assert!(notes[0].contains("libfoo"));
        assert!(notes.iter().any(|n| n.contains("extension")));
        assert!(!notes.iter().any(|n| n.contains("Last FFmpeg output")));
    }

    #[test]
    fn test_engine_failure_notes_list_diagnostics_before_pitfalls() {
        let failed = ConvertError::EngineFailed {
            message: "Conversion failed!".to_string(),
            arguments: vec!["ffmpeg".to_string()],
            diagnostics: vec![
                "width not divisible by 2".to_string(),
                "Error initializing output stream".to_string(),
                "Conversion failed!".to_string(),
            ],
        };
        let notes = failed.notes();
        let cause = notes
            .iter()
            .position(|n| n.contains("width not divisible by 2"))
            .unwrap();
        let pitfalls = notes.iter().position(|n| n == "- Common pitfalls:").unwrap();
        assert!(cause < pitfalls);
        assert!(notes.iter().any(|n| n.contains("Error initializing output stream")));
    }
}
