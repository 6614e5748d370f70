//! Configuration support for the gallery.
//!
//! Settings are exported and imported as JSON text; where the text is stored
//! is up to the host page or application.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DOUBLE_CLICK_SCALE, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, DEFAULT_ZOOM_FACTOR,
};
use crate::error::{GalleryError, Result};
use crate::keybindings::KeyBindings;
use crate::model::ViewMode;
use crate::search::SearchOptions;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Convert to log crate's Level.
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Current configuration format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Zoom behaviour of the image viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Multiplier applied per zoom step
    pub zoom_factor: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale a double click zooms to from 1
    pub double_click_scale: f64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            double_click_scale: DEFAULT_DOUBLE_CLICK_SCALE,
        }
    }
}

impl ViewerSettings {
    /// Check that the scale range contains 1 and the zoom step is > 1.
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.zoom_factor,
            self.min_scale,
            self.max_scale,
            self.double_click_scale,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GalleryError::invalid_config(
                "viewer settings must be finite numbers",
            ));
        }
        if self.zoom_factor <= 1.0 {
            return Err(GalleryError::invalid_config(format!(
                "zoom_factor must be greater than 1, got {}",
                self.zoom_factor
            )));
        }
        if self.min_scale <= 0.0 || self.min_scale > 1.0 || self.max_scale < 1.0 {
            return Err(GalleryError::invalid_config(format!(
                "scale range [{}, {}] must be positive and contain 1",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.min_scale..=self.max_scale).contains(&self.double_click_scale) {
            return Err(GalleryError::invalid_config(format!(
                "double_click_scale {} is outside [{}, {}]",
                self.double_click_scale, self.min_scale, self.max_scale
            )));
        }
        Ok(())
    }
}

/// User preferences section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct UserPreferences {
    /// Grid or list layout
    #[serde(default)]
    pub view_mode: ViewMode,

    /// Fields the search matches against
    #[serde(default)]
    pub search: SearchOptions,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Gallery configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Version of the configuration format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Viewer zoom settings
    #[serde(default)]
    pub viewer: ViewerSettings,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindings,
}

fn default_app_name() -> String {
    "Drop Gallery".to_string()
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            viewer: ViewerSettings::default(),
            keybindings: KeyBindings::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;

        if config.version != CONFIG_VERSION {
            log::warn!(
                "Config version {} differs from supported version {}",
                config.version,
                CONFIG_VERSION
            );
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every section for values the gallery cannot honour.
    pub fn validate(&self) -> Result<()> {
        self.viewer.validate()?;
        if !self.keybindings.is_unambiguous() {
            return Err(GalleryError::invalid_config(
                "two navigation actions share the same key",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::{Key, NavigationAction};
    use crate::model::{GridSize, ViewKind};

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = GalleryConfig::new();
        config.preferences.view_mode = ViewMode::new(ViewKind::List, GridSize::Large);
        config.preferences.search.include_extension = false;
        config.preferences.log_level = LogLevel::Debug;
        config.viewer.max_scale = 8.0;
        config
            .keybindings
            .set_key(NavigationAction::NextImage, Key::Character('l'));

        let json = config.to_json().unwrap();
        let restored = GalleryConfig::from_json(&json).unwrap();

        assert_eq!(restored, config);
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let config = GalleryConfig::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(config, GalleryConfig::new());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let json = r#"{
            "version": 1,
            "preferences": { "log_level": "trace" },
            "viewer": { "max_scale": 3.0 }
        }"#;
        let config = GalleryConfig::from_json(json).unwrap();
        assert_eq!(config.preferences.log_level, LogLevel::Trace);
        assert_eq!(config.preferences.view_mode, ViewMode::default());
        assert_eq!(config.viewer.max_scale, 3.0);
        assert_eq!(config.viewer.zoom_factor, DEFAULT_ZOOM_FACTOR);
    }

    #[test]
    fn test_version_mismatch_still_loads() {
        let config = GalleryConfig::from_json(r#"{"version": 99}"#).unwrap();
        assert_eq!(config.version, 99);
    }

    #[test]
    fn test_invalid_viewer_settings_rejected() {
        for viewer in [
            r#"{"zoom_factor": 1.0}"#,
            r#"{"min_scale": 0.0}"#,
            r#"{"min_scale": 2.0}"#,
            r#"{"max_scale": 0.5}"#,
            r#"{"double_click_scale": 9.0}"#,
        ] {
            let json = format!(r#"{{"version": 1, "viewer": {}}}"#, viewer);
            let err = GalleryConfig::from_json(&json).unwrap_err();
            assert!(
                matches!(err, GalleryError::InvalidConfig(_)),
                "{} gave {:?}",
                viewer,
                err
            );
        }
    }

    #[test]
    fn test_conflicting_keybindings_rejected() {
        let mut config = GalleryConfig::new();
        config
            .keybindings
            .set_key(NavigationAction::ClearSelection, Key::ArrowLeft);
        assert!(matches!(
            config.validate(),
            Err(GalleryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = GalleryConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, GalleryError::Json(_)));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.to_level(), log::Level::Trace);
    }
}
