//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bstviz/bstviz.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `BSTVIZ__<SECTION>__<FIELD>`
//!
//! Command line flags for the canvas size are applied on top by the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{Canvas, LayoutParams};

/// Search animation pacing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Delay between two animation steps in milliseconds
    pub interval_ms: u64,
    /// Play the animation step by step; when false the host finishes it at once
    pub enabled: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 550,
            enabled: true,
        }
    }
}

impl AnimationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Raw canvas section (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCanvas {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayout {
    pub horizontal_margin: Option<f64>,
    pub top_margin: Option<f64>,
    pub max_level_height: Option<f64>,
    pub min_usable_height: Option<f64>,
    pub vertical_reserve: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawAnimation {
    pub interval_ms: Option<u64>,
    pub enabled: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub canvas: RawCanvas,
    pub layout: RawLayout,
    pub animation: RawAnimation,
}

/// Unified configuration for bstviz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Drawing surface handed to the layout engine
    pub canvas: Canvas,
    /// Layout spacing tuning
    pub layout: LayoutParams,
    /// Search animation pacing
    pub animation: AnimationConfig,
}

/// Get the XDG config directory for bstviz.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bstviz").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bstviz.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base). Overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let canvas = Canvas {
            width: overlay.canvas.width.unwrap_or(self.canvas.width),
            height: overlay.canvas.height.unwrap_or(self.canvas.height),
        };
        let raw = &overlay.layout;
        let layout = LayoutParams {
            horizontal_margin: raw
                .horizontal_margin
                .unwrap_or(self.layout.horizontal_margin),
            top_margin: raw.top_margin.unwrap_or(self.layout.top_margin),
            max_level_height: raw
                .max_level_height
                .unwrap_or(self.layout.max_level_height),
            min_usable_height: raw
                .min_usable_height
                .unwrap_or(self.layout.min_usable_height),
            vertical_reserve: raw
                .vertical_reserve
                .unwrap_or(self.layout.vertical_reserve),
        };
        let animation = AnimationConfig {
            interval_ms: overlay
                .animation
                .interval_ms
                .unwrap_or(self.animation.interval_ms),
            enabled: overlay.animation.enabled.unwrap_or(self.animation.enabled),
        };
        Self {
            canvas,
            layout,
            animation,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line. Unlike the
    ///   global file it must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("loading config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply BSTVIZ__* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("BSTVIZ").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_float("canvas.width") {
            settings.canvas.width = val;
        }
        if let Ok(val) = config.get_float("canvas.height") {
            settings.canvas.height = val;
        }
        if let Ok(val) = config.get_float("layout.horizontal_margin") {
            settings.layout.horizontal_margin = val;
        }
        if let Ok(val) = config.get_float("layout.top_margin") {
            settings.layout.top_margin = val;
        }
        if let Ok(val) = config.get_float("layout.max_level_height") {
            settings.layout.max_level_height = val;
        }
        if let Ok(val) = config.get_float("layout.min_usable_height") {
            settings.layout.min_usable_height = val;
        }
        if let Ok(val) = config.get_float("layout.vertical_reserve") {
            settings.layout.vertical_reserve = val;
        }
        if let Ok(val) = config.get::<u64>("animation.interval_ms") {
            settings.animation.interval_ms = val;
        }
        if let Ok(val) = config.get_bool("animation.enabled") {
            settings.animation.enabled = val;
        }

        Ok(settings)
    }

    /// Replace canvas dimensions where given (command line overrides).
    pub fn with_canvas(mut self, width: Option<f64>, height: Option<f64>) -> Result<Self, ApplicationError> {
        if let Some(width) = width {
            self.canvas.width = width;
        }
        if let Some(height) = height {
            self.canvas.height = height;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values the layout or animation cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let invalid = |message: String| Err(ApplicationError::Config { message });
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return invalid(format!(
                "canvas must be positive, got {}x{}",
                self.canvas.width, self.canvas.height
            ));
        }
        if self.layout.max_level_height <= 0.0 {
            return invalid("layout.max_level_height must be positive".to_string());
        }
        if self.animation.interval_ms == 0 {
            return invalid("animation.interval_ms must be at least 1".to_string());
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# bstviz configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/bstviz/bstviz.toml
#   Explicit: bstviz --config <file>
#   Env:      BSTVIZ__<SECTION>__<FIELD>, e.g. BSTVIZ__CANVAS__WIDTH=1024

[canvas]
# width = 1300.0
# height = 500.0

[layout]
# Empty band on the left and right edge
# horizontal_margin = 40.0
# Y coordinate of the root
# top_margin = 40.0
# Upper bound for the distance between levels
# max_level_height = 120.0
# Lower bound for the height levels are spread over
# min_usable_height = 120.0
# Canvas height not available to levels
# vertical_reserve = 80.0

[animation]
# Delay between search animation steps
# interval_ms = 550
# enabled = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_match_reference_values() {
        let settings = Settings::default();
        assert_eq!(settings.canvas.width, 1300.0);
        assert_eq!(settings.canvas.height, 500.0);
        assert_eq!(settings.animation.interval(), Duration::from_millis(550));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_given_fields_change() {
        let overlay: RawSettings = toml::from_str(
            r#"
[canvas]
width = 640

[animation]
interval_ms = 100
"#,
        )
        .expect("parse overlay");

        let merged = Settings::default().merge_with(&overlay);

        assert_eq!(merged.canvas.width, 640.0);
        assert_eq!(merged.canvas.height, 500.0);
        assert_eq!(merged.animation.interval_ms, 100);
        assert!(merged.animation.enabled);
        assert_eq!(merged.layout, LayoutParams::default());
    }

    #[test]
    fn given_zero_interval_when_validating_then_config_error() {
        let mut settings = Settings::default();
        settings.animation.interval_ms = 0;
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_cli_canvas_when_applied_then_overrides() {
        let settings = Settings::default()
            .with_canvas(Some(800.0), None)
            .expect("valid canvas");
        assert_eq!(settings.canvas.width, 800.0);
        assert_eq!(settings.canvas.height, 500.0);
        assert!(Settings::default().with_canvas(Some(-1.0), None).is_err());
    }

    #[test]
    fn given_settings_when_serialized_then_roundtrips_through_raw() {
        let text = Settings::default().to_toml().expect("serialize");
        assert!(text.contains("[canvas]"));
        let raw: RawSettings = toml::from_str(&text).expect("parse back");
        assert_eq!(raw.animation.interval_ms, Some(550));
    }

    #[test]
    fn given_template_when_parsed_then_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.canvas.width.is_none());
    }
}
