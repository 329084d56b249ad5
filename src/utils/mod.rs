//! Common utilities and helpers

use std::time::Duration;

pub mod logging;
pub mod path;

/// Utility functions for MPEG-Convert
pub struct Utils;

impl Utils {
    /// Format a duration as seconds with two decimals
    pub fn format_seconds(duration: Duration) -> String {
        format!("{:.2}", duration.as_secs_f64())
    }

    /// Format file size for display
    pub fn readable_size(size: u64) -> String {
        const UNITS: &[&str] = &["bytes", "kb", "mb", "gb", "tb"];
        let mut size = size as f64;

        for unit in UNITS {
            if size < 1024.0 {
                return format!("{:.2} {}", size, unit);
            }
            size /= 1024.0;
        }
        format!("{:.2} pb", size)
    }
}
