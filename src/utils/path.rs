//! Path expansion for user-supplied file names

use std::path::{Component, Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};

/// Path utilities
pub struct PathUtils;

impl PathUtils {
    /// Expand a path against the process environment
    pub fn expand(raw: &str) -> ConvertResult<PathBuf> {
        let current_dir = std::env::current_dir().map_err(ConvertError::Io)?;
        Ok(Self::anchor(Path::new(shellexpand::tilde(raw).as_ref()), &current_dir))
    }

    /// Expand a leading `~` against `home`, anchor relative paths at
    /// `current_dir` and normalise the result lexically
    pub fn expand_with(raw: &str, home: Option<&str>, current_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde_with_context(raw, || home);
        Self::anchor(Path::new(expanded.as_ref()), current_dir)
    }

    fn anchor(path: &Path, current_dir: &Path) -> PathBuf {
        if path.is_absolute() {
            Self::normalize(path)
        } else {
            Self::normalize(&current_dir.join(path))
        }
    }

    /// Remove `.` and `..` components without touching the filesystem
    pub fn normalize(path: &Path) -> PathBuf {
        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }
        normalized
    }
}
