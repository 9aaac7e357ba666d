// Host window API seams
//
// The frame engine and coordinators only talk to windows, monitors and the
// event bus through these traits. `tauri_host` implements them for Tauri.

pub mod tauri_host;

#[cfg(test)]
pub mod fake;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Name of the cross-window event carrying the overlay's interactive flag
pub const SET_INTERACTIVE_EVENT: &str = "set-main-interactive-globally";

/// Window labels from tauri.conf.json
pub const OVERLAY_LABEL: &str = "main";
pub const CONTROL_LABEL: &str = "control";

/// Position and size in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// What the host reports about a monitor (physical pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

/// Window-level calls the coordinators issue
pub trait HostWindow {
    fn label(&self) -> &str;
    fn set_ignore_cursor_events(&self, ignore: bool) -> Result<()>;
    fn set_fullscreen(&self, fullscreen: bool) -> Result<()>;
    fn set_decorations(&self, decorations: bool) -> Result<()>;
    fn set_always_on_top(&self, always_on_top: bool) -> Result<()>;
    fn set_focus(&self) -> Result<()>;
    fn show(&self) -> Result<()>;
    fn hide(&self) -> Result<()>;
    fn is_maximized(&self) -> Result<bool>;
    fn unmaximize(&self) -> Result<()>;
    /// setSize followed by setPosition
    fn set_bounds(&self, bounds: LogicalBounds) -> Result<()>;
}

/// Monitor queries and render zoom for one webview
pub trait DisplaySurface {
    fn current_monitor(&self) -> Result<Option<MonitorInfo>>;
    fn primary_monitor(&self) -> Result<Option<MonitorInfo>>;
    fn available_monitors(&self) -> Result<Vec<MonitorInfo>>;
    /// Size of the screen in logical pixels, used when no monitor is reported
    fn logical_screen_size(&self) -> Result<(f64, f64)>;
    fn device_pixel_ratio(&self) -> f64;
    fn set_zoom(&self, zoom: f64) -> Result<()>;
}

/// Fire-and-forget message channel between windows
pub trait InteractivityBus {
    fn emit_interactive(&self, target: &str, interactive: bool) -> Result<()>;
}
