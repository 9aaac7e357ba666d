// Build-time defaults and the optional framer.json override file

use crate::error::{FramerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Name of the override file inside the app config directory
pub const CONFIG_FILE_NAME: &str = "framer.json";

/// Calibrated against the webview's own DPI handling; re-measure on other host stacks.
pub const DEFAULT_ZOOM_CORRECTION: f64 = 1.3820904113504174;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FramerConfig {
    #[serde(default)]
    pub frame: FrameLimits,

    #[serde(default = "SurfaceConfig::overlay_default")]
    pub overlay: SurfaceConfig,

    #[serde(default = "SurfaceConfig::control_default")]
    pub control: SurfaceConfig,

    #[serde(default = "default_zoom_correction")]
    pub zoom_correction: f64,

    #[serde(default = "default_show_settle_ms")]
    pub show_settle_ms: u64,

    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,

    #[serde(default = "default_toggle_shortcut")]
    pub toggle_shortcut: String,
}

/// Size limits and the fallback size of the frame rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameLimits {
    #[serde(default = "default_min_size")]
    pub min_width: u32,

    #[serde(default = "default_min_size")]
    pub min_height: u32,

    #[serde(default = "default_frame_width")]
    pub default_width: u32,

    #[serde(default = "default_frame_height")]
    pub default_height: u32,
}

/// Settings that differ between the overlay and the control surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceConfig {
    /// Height of the reserved strip at the top of the screen
    #[serde(default = "default_band_height")]
    pub control_band_height: u32,

    /// Interactivity applied when the window is created
    #[serde(default)]
    pub initial_interactive: bool,
}

fn default_min_size() -> u32 {
    20
}

fn default_frame_width() -> u32 {
    300
}

fn default_frame_height() -> u32 {
    200
}

fn default_band_height() -> u32 {
    50
}

fn default_zoom_correction() -> f64 {
    DEFAULT_ZOOM_CORRECTION
}

fn default_show_settle_ms() -> u64 {
    200
}

fn default_hide_delay_ms() -> u64 {
    50
}

fn default_toggle_shortcut() -> String {
    "CmdOrCtrl+Shift+F".to_string()
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            min_width: default_min_size(),
            min_height: default_min_size(),
            default_width: default_frame_width(),
            default_height: default_frame_height(),
        }
    }
}

impl SurfaceConfig {
    pub fn overlay_default() -> Self {
        Self {
            control_band_height: default_band_height(),
            initial_interactive: false,
        }
    }

    pub fn control_default() -> Self {
        Self {
            control_band_height: default_band_height(),
            initial_interactive: true,
        }
    }
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            frame: FrameLimits::default(),
            overlay: SurfaceConfig::overlay_default(),
            control: SurfaceConfig::control_default(),
            zoom_correction: default_zoom_correction(),
            show_settle_ms: default_show_settle_ms(),
            hide_delay_ms: default_hide_delay_ms(),
            toggle_shortcut: default_toggle_shortcut(),
        }
    }
}

impl FramerConfig {
    /// Parse a config from JSON text and validate it
    pub fn from_json(text: &str) -> Result<Self> {
        let config: FramerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the override file, falling back to defaults when it is missing or unusable
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
                return Self::default();
            }
        };

        match Self::from_json(&text) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let f = &self.frame;
        if f.min_width == 0 || f.min_height == 0 {
            return Err(FramerError::Config(
                "minWidth and minHeight must be at least 1".to_string(),
            ));
        }
        if f.default_width < f.min_width || f.default_height < f.min_height {
            return Err(FramerError::Config(format!(
                "default frame {}x{} is smaller than the minimum {}x{}",
                f.default_width, f.default_height, f.min_width, f.min_height
            )));
        }
        if !(self.zoom_correction.is_finite() && self.zoom_correction > 0.0) {
            return Err(FramerError::Config(format!(
                "zoomCorrection must be positive, got {}",
                self.zoom_correction
            )));
        }
        if self.toggle_shortcut.trim().is_empty() {
            return Err(FramerError::Config("toggleShortcut is empty".to_string()));
        }
        Ok(())
    }
}
