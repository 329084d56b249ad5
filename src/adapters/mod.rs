// Adapters - External system implementations

pub mod console_reporter;
pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod terminal_prompt;
pub mod toml_config;
pub mod tool_locator;

// Re-export adapters
pub use console_reporter::ConsoleReporter;
pub use exec_ffmpeg::FFmpegAdapter;
pub use probe_ffprobe::FFprobeAdapter;
pub use terminal_prompt::TerminalPrompter;
pub use toml_config::{ConfigOverrides, Settings, TomlConfigAdapter};
pub use tool_locator::ToolPaths;
