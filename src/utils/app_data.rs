use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "loginsight";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "loginsight.log";

/// Viewer configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Show the line number gutter on startup
    #[serde(default = "default_line_numbers")]
    pub line_numbers: bool,

    /// Columns moved per horizontal scroll step
    #[serde(default = "default_scroll_step")]
    pub scroll_step: usize,

    /// Number of decoded line ranges kept in memory (0 disables the cache)
    #[serde(default = "default_range_cache_capacity")]
    pub range_cache_capacity: usize,
}

fn default_line_numbers() -> bool {
    true
}

fn default_scroll_step() -> usize {
    8
}

fn default_range_cache_capacity() -> usize {
    64
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            line_numbers: default_line_numbers(),
            scroll_step: default_scroll_step(),
            range_cache_capacity: default_range_cache_capacity(),
        }
    }
}

impl ViewerConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load config from an explicit path, or return default if it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let config: ViewerConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
        Ok(config)
    }

    /// Scroll step with a floor of one column
    pub fn effective_scroll_step(&self) -> usize {
        self.scroll_step.max(1)
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the path of the log file used while the viewer owns the terminal
pub fn get_log_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(LOG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_config_default() {
        let config = ViewerConfig::default();
        assert!(config.line_numbers);
        assert_eq!(config.scroll_step, 8);
        assert_eq!(config.range_cache_capacity, 64);
    }

    #[test]
    fn test_viewer_config_partial_json() {
        // Should use defaults for missing fields
        let json = r#"{"line_numbers": false}"#;
        let config: ViewerConfig = serde_json::from_str(json).unwrap();

        assert!(!config.line_numbers);
        assert_eq!(config.scroll_step, 8);
    }

    #[test]
    fn test_viewer_config_empty_json() {
        let config: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_effective_scroll_step() {
        let config = ViewerConfig {
            scroll_step: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_scroll_step(), 1);
    }

    #[test]
    fn test_load_from_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        assert_eq!(ViewerConfig::load_from(&path).unwrap(), ViewerConfig::default());

        fs::write(&path, "{ not json").unwrap();
        let err = ViewerConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        fs::write(&path, r#"{"scroll_step": 3, "range_cache_capacity": 0}"#).unwrap();
        let config = ViewerConfig::load_from(&path).unwrap();
        assert_eq!(config.scroll_step, 3);
        assert_eq!(config.range_cache_capacity, 0);
    }
}
