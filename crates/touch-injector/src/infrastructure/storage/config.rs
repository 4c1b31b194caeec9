//! TOML configuration for the injector host.
//!
//! Every field is optional.  A file containing only
//!
//! ```toml
//! [listener]
//! socket_path = "/run/ui/touch.sock"
//! ```
//!
//! keeps the defaults for everything else:
//!
//! ```toml
//! log_level = "info"
//!
//! [listener]
//! socket_path = "/tmp/ui_touch_socket"
//! poll_interval_ms = 1000
//! max_payload_bytes = 2048
//!
//! [dispatch]
//! tap_release_delay_ms = 50
//! scroll_scale = 15.0
//!
//! [diagnostics]
//! enabled = true
//! log_path = "/data/touch_debug.log"
//!
//! [surface]
//! width = 2160
//! height = 1080
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::dispatch::DispatchSettings;
use crate::infrastructure::listener::{ListenerConfig, DEFAULT_SOCKET_PATH};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error other than "not found".
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level injector configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjectorConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub listener: ListenerSection,
    #[serde(default)]
    pub dispatch: DispatchSection,
    #[serde(default)]
    pub diagnostics: DiagnosticsSection,
    #[serde(default)]
    pub surface: SurfaceSection,
}

/// Socket settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListenerSection {
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    /// Upper bound on every wait of the listener loop, and so on stop latency.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Bytes read per client.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

/// Event synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchSection {
    #[serde(default = "default_tap_release_delay_ms")]
    pub tap_release_delay_ms: u64,
    /// Wheel units per wire `deltaY` notch.
    #[serde(default = "default_scroll_scale")]
    pub scroll_scale: f64,
}

/// Debug log file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

/// Size of the headless surface used by the host binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceSection {
    #[serde(default = "default_surface_width")]
    pub width: u32,
    #[serde(default = "default_surface_height")]
    pub height: u32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_max_payload_bytes() -> usize {
    touch_core::MAX_PAYLOAD_BYTES
}
fn default_tap_release_delay_ms() -> u64 {
    50
}
fn default_scroll_scale() -> f64 {
    15.0
}
fn default_true() -> bool {
    true
}
fn default_log_path() -> PathBuf {
    PathBuf::from("/data/touch_debug.log")
}
fn default_surface_width() -> u32 {
    2160
}
fn default_surface_height() -> u32 {
    1080
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            listener: ListenerSection::default(),
            dispatch: DispatchSection::default(),
            diagnostics: DiagnosticsSection::default(),
            surface: SurfaceSection::default(),
        }
    }
}

impl Default for ListenerSection {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            poll_interval_ms: default_poll_interval_ms(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            tap_release_delay_ms: default_tap_release_delay_ms(),
            scroll_scale: default_scroll_scale(),
        }
    }
}

impl Default for DiagnosticsSection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            log_path: default_log_path(),
        }
    }
}

impl Default for SurfaceSection {
    fn default() -> Self {
        Self {
            width: default_surface_width(),
            height: default_surface_height(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl InjectorConfig {
    /// Listener settings.  Zero values are raised to the smallest usable ones.
    pub fn listener_config(&self) -> ListenerConfig {
        ListenerConfig {
            socket_path: self.listener.socket_path.clone(),
            poll_interval: Duration::from_millis(self.listener.poll_interval_ms.max(1)),
            max_payload_bytes: self.listener.max_payload_bytes.max(1),
        }
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            tap_release_delay: Duration::from_millis(self.dispatch.tap_release_delay_ms),
            scroll_scale: self.dispatch.scroll_scale,
        }
    }

    /// Path of the diagnostics log, or `None` when disabled.
    pub fn diagnostics_path(&self) -> Option<&Path> {
        self.diagnostics
            .enabled
            .then_some(self.diagnostics.log_path.as_path())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses a configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed or a field has the
/// wrong type.
pub fn from_toml_str(content: &str) -> Result<InjectorConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Renders `config` as pretty TOML.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if serialization fails.
pub fn to_toml_string(config: &InjectorConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Loads the configuration at `path`, returning the defaults if the file does
/// not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<InjectorConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => from_toml_str(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(InjectorConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_reference_values() {
        // Arrange / Act
        let cfg = InjectorConfig::default();

        // Assert
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.listener.socket_path, PathBuf::from("/tmp/ui_touch_socket"));
        assert_eq!(cfg.listener.poll_interval_ms, 1000);
        assert_eq!(cfg.listener.max_payload_bytes, 2048);
        assert_eq!(cfg.dispatch.tap_release_delay_ms, 50);
        assert_eq!(cfg.dispatch.scroll_scale, 15.0);
        assert!(cfg.diagnostics.enabled);
        assert_eq!(cfg.diagnostics.log_path, PathBuf::from("/data/touch_debug.log"));
        assert_eq!((cfg.surface.width, cfg.surface.height), (2160, 1080));
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg = from_toml_str("").expect("empty file is valid");
        assert_eq!(cfg, InjectorConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        // Arrange
        let toml = r#"
            [listener]
            socket_path = "/run/ui/touch.sock"

            [dispatch]
            scroll_scale = 30.0
        "#;

        // Act
        let cfg = from_toml_str(toml).expect("valid");

        // Assert
        assert_eq!(cfg.listener.socket_path, PathBuf::from("/run/ui/touch.sock"));
        assert_eq!(cfg.listener.poll_interval_ms, 1000);
        assert_eq!(cfg.dispatch.scroll_scale, 30.0);
        assert_eq!(cfg.dispatch.tap_release_delay_ms, 50);
        assert_eq!(cfg.diagnostics, DiagnosticsSection::default());
    }

    #[test]
    fn test_wrong_field_type_is_a_parse_error() {
        let result = from_toml_str("[listener]\npoll_interval_ms = \"fast\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_serialized_defaults_parse_back() {
        let cfg = InjectorConfig::default();
        let text = to_toml_string(&cfg).expect("serialize");
        assert_eq!(from_toml_str(&text).expect("parse"), cfg);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let cfg = load_config(Path::new("/nonexistent-touch-dir/config.toml")).expect("defaults");
        assert_eq!(cfg, InjectorConfig::default());
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        // Arrange
        let path = std::env::temp_dir().join(format!("touch-cfg-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "log_level = \"debug\"\n[diagnostics]\nenabled = false\n").unwrap();

        // Act
        let cfg = load_config(&path).expect("valid file");

        // Assert
        assert_eq!(cfg.log_level, "debug");
        assert!(cfg.diagnostics_path().is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_listener_config_conversion_clamps_zero_values() {
        let mut cfg = InjectorConfig::default();
        cfg.listener.poll_interval_ms = 0;
        cfg.listener.max_payload_bytes = 0;

        let listener = cfg.listener_config();

        assert_eq!(listener.poll_interval, Duration::from_millis(1));
        assert_eq!(listener.max_payload_bytes, 1);
    }

    #[test]
    fn test_dispatch_settings_conversion() {
        let mut cfg = InjectorConfig::default();
        cfg.dispatch.tap_release_delay_ms = 80;

        let settings = cfg.dispatch_settings();

        assert_eq!(settings.tap_release_delay, Duration::from_millis(80));
        assert_eq!(settings.scroll_scale, 15.0);
    }
}
