//! Utility functions shared across loginsight.
//!
//! ## Modules
//!
//! - [`app_data`] - Config file and app data directory (XDG-compliant)
//! - [`logging`] - Tracing subscriber setup
//! - [`progress`] - Spinner that becomes a no-op without the `progress` feature
//! - [`text`] - Lossy decoding, tab expansion and character measurement
//!
//! ```
//! use loginsight::utils::{decode, measure};
//!
//! assert_eq!(decode(b"a\tb"), "a   b");
//! assert_eq!(measure("👉 foo".as_bytes()), 5);
//! ```

pub mod app_data;
pub mod logging;
pub mod progress;
pub mod text;

pub use app_data::*;
pub use text::*;

/// Format byte size to human readable
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 bytes");
        assert_eq!(format_size(1023), "1023 bytes");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }
}
