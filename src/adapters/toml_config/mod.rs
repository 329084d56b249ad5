// TOML config adapter - Settings resolved from CLI, environment and config files

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::domain::catalog::{CatalogSpec, QuestionCatalog};
use crate::error::{ConvertError, ConvertResult};
use crate::ports::Severity;

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "mpeg-convert.toml";

/// Per-user config file
pub const USER_CONFIG_FILE: &str = "~/.config/mpeg-convert/config.toml";

/// Contents of a config file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub log_level: Option<String>,
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
    pub catalog: Option<CatalogSpec>,
}

/// Values coming from the command line or the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
    pub verbose: bool,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_level: Severity,
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
    pub catalog: QuestionCatalog,
    /// Config file the settings were read from
    pub source: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: Severity::Info,
            ffmpeg: None,
            ffprobe: None,
            catalog: QuestionCatalog::default(),
            source: None,
        }
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    search_paths: Vec<PathBuf>,
}

impl TomlConfigAdapter {
    /// Adapter searching the working directory, then the user config directory
    pub fn new() -> Self {
        Self::with_search_paths(default_search_paths(std::env::current_dir().ok()))
    }

    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Resolve settings with precedence CLI > environment > file > defaults.
    ///
    /// An explicitly named config file must exist; the implicit search paths
    /// are optional.
    pub fn load(&self, overrides: &ConfigOverrides) -> ConvertResult<Settings> {
        let source = match &overrides.config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConvertError::Config {
                        message: format!("config file '{}' does not exist", path.display()),
                    });
                }
                Some(path.clone())
            }
            None => self.search_paths.iter().find(|path| path.is_file()).cloned(),
        };

        let file = match &source {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                read_settings(path)?
            }
            None => FileSettings::default(),
        };

        resolve(file, overrides, source)
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// `./mpeg-convert.toml`, then the per-user config file
pub fn default_search_paths(current_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = current_dir {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(shellexpand::tilde(USER_CONFIG_FILE).as_ref()));
    paths
}

/// Parse the contents of a config file
pub fn parse_settings(content: &str) -> ConvertResult<FileSettings> {
    toml::from_str(content).map_err(|error| ConvertError::Config {
        message: format!("failed to parse TOML config: {}", error),
    })
}

fn read_settings(path: &Path) -> ConvertResult<FileSettings> {
    let content = std::fs::read_to_string(path).map_err(|error| ConvertError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), error),
    })?;
    parse_settings(&content)
}

fn resolve(
    file: FileSettings,
    overrides: &ConfigOverrides,
    source: Option<PathBuf>,
) -> ConvertResult<Settings> {
    let log_level = if overrides.verbose {
        Severity::Debug
    } else {
        match overrides.log_level.as_deref().or(file.log_level.as_deref()) {
            Some(level) => level.parse()?,
            None => Severity::Info,
        }
    };

    let catalog = match file.catalog {
        Some(spec) => QuestionCatalog::from_specs(spec)?,
        None => QuestionCatalog::default(),
    };

    Ok(Settings {
        log_level,
        ffmpeg: overrides.ffmpeg.clone().or(file.ffmpeg),
        ffprobe: overrides.ffprobe.clone().or(file.ffprobe),
        catalog,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Domain;

    const SAMPLE: &str = r#"
log_level = "warning"
ffmpeg = "/opt/ffmpeg/bin/ffmpeg"

[catalog.defaults]
"c:v" = "libx264"
an = true

[[catalog.video]]
type = "choice"
title = "Video codec..."
option = "-c:v"
default = 1
choices = [["H.264", "libx264"], ["H.265", "libx265"]]

[[catalog.video]]
type = "input"
title = "Video bitrate..."
option = "b:v"
"#;

    #[test]
    fn test_defaults_without_file() {
        let adapter = TomlConfigAdapter::with_search_paths(Vec::new());
        let settings = adapter.load(&ConfigOverrides::default()).unwrap();
        assert_eq!(settings.log_level, Severity::Info);
        assert_eq!(settings.catalog, QuestionCatalog::default());
        assert!(settings.source.is_none());
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, SAMPLE).unwrap();

        let adapter = TomlConfigAdapter::with_search_paths(vec![path.clone()]);
        let settings = adapter.load(&ConfigOverrides::default()).unwrap();

        assert_eq!(settings.source, Some(path));
        assert_eq!(settings.log_level, Severity::Warning);
        assert_eq!(settings.ffmpeg, Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
        assert_eq!(settings.catalog.questions(Domain::Video).len(), 2);
        assert!(settings.catalog.questions(Domain::Audio).is_empty());
        assert_eq!(settings.catalog.defaults().to_string(), "-c:v libx264 -an");
    }

    #[test]
    fn test_overrides_win() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let overrides = ConfigOverrides {
            config_path: Some(path),
            log_level: Some("fatal".to_string()),
            ffmpeg: Some(PathBuf::from("/usr/local/bin/ffmpeg")),
            ..ConfigOverrides::default()
        };
        let settings = TomlConfigAdapter::with_search_paths(Vec::new())
            .load(&overrides)
            .unwrap();
        assert_eq!(settings.log_level, Severity::Fatal);
        assert_eq!(settings.ffmpeg, Some(PathBuf::from("/usr/local/bin/ffmpeg")));

        let verbose = ConfigOverrides {
            verbose: true,
            ..overrides
        };
        let settings = TomlConfigAdapter::with_search_paths(Vec::new())
            .load(&verbose)
            .unwrap();
        assert_eq!(settings.log_level, Severity::Debug);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let overrides = ConfigOverrides {
            config_path: Some(PathBuf::from("/nonexistent/mpeg-convert.toml")),
            ..ConfigOverrides::default()
        };
        let result = TomlConfigAdapter::with_search_paths(Vec::new()).load(&overrides);
        assert!(matches!(result, Err(ConvertError::Config { .. })));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(matches!(
            parse_settings("log_level = ["),
            Err(ConvertError::Config { .. })
        ));

        let bad_default = r#"
[[catalog.audio]]
type = "choice"
title = "Audio codec..."
option = "c:a"
default = 9
choices = [["AAC", "aac"]]
"#;
        let file = parse_settings(bad_default).unwrap();
        let result = resolve(file, &ConfigOverrides::default(), None);
        assert!(matches!(result, Err(ConvertError::Catalog { .. })));
    }

    #[test]
    fn test_search_path_order() {
        let paths = default_search_paths(Some(PathBuf::from("/work")));
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], PathBuf::from("/work/mpeg-convert.toml"));
        assert_eq!(
            paths[1],
            PathBuf::from(shellexpand::tilde(USER_CONFIG_FILE).as_ref())
        );
        assert!(paths[1].ends_with(".config/mpeg-convert/config.toml"));

        let without_cwd = default_search_paths(None);
        assert_eq!(without_cwd, vec![paths[1].clone()]);
    }
}
