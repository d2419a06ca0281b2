//! User settings for traffic-cli
//!
//! Manages user preferences: listing page size, the label shown for
//! records whose category no longer exists, the default report view and
//! whether mutations are written to the audit log.

use serde::{Deserialize, Serialize};

use super::paths::TrafficPaths;
use crate::error::TrafficError;
use crate::reports::ViewMode;
use crate::storage::write_json_atomic;

/// Label used when a record's category cannot be resolved
pub const DEFAULT_UNKNOWN_CATEGORY_LABEL: &str = "Unknown category";

/// User settings for traffic-cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Number of records per listing page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Placeholder name for orphaned category references
    #[serde(default = "default_unknown_category_label")]
    pub unknown_category_label: String,

    /// View used by `traffic report` when `--view` is not given
    #[serde(default)]
    pub default_view_mode: ViewMode,

    /// Whether mutations are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_page_size() -> usize {
    10
}

fn default_unknown_category_label() -> String {
    DEFAULT_UNKNOWN_CATEGORY_LABEL.to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            page_size: default_page_size(),
            unknown_category_label: default_unknown_category_label(),
            default_view_mode: ViewMode::default(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &TrafficPaths) -> Result<Self, TrafficError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| TrafficError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| TrafficError::Config(format!("Failed to parse settings file: {}", e)))?;

        if settings.page_size == 0 {
            return Err(TrafficError::Config("page_size must be at least 1".into()));
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrafficPaths) -> Result<(), TrafficError> {
        paths.ensure_directories()?;

        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.unknown_category_label, "Unknown category");
        assert_eq!(settings.default_view_mode, ViewMode::Month);
        assert!(settings.audit_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrafficPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            page_size: 25,
            default_view_mode: ViewMode::Year,
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.page_size, 25);
        assert_eq!(loaded.default_view_mode, ViewMode::Year);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrafficPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"page_size": 5}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.page_size, 5);
        assert_eq!(loaded.unknown_category_label, "Unknown category");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrafficPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"page_size": 0}"#).unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(TrafficError::Config(_))
        ));
    }
}
