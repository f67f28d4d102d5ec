//! Formatting utilities

use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format a duration given in seconds
pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.2}s")
}

/// Format an optional range of values
pub fn format_range(range: Option<(f32, f32)>, unit: &str) -> String {
    match range {
        Some((min, max)) => format!("{min:.2}{unit} .. {max:.2}{unit}"),
        None => "N/A".to_string(),
    }
}
