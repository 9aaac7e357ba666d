// Monitor resolution and render-zoom correction for scaled displays

use crate::frame_engine::MonitorBounds;
use crate::host::{DisplaySurface, MonitorInfo};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Resolved monitor size, OS scale factor and the zoom applied to the webview
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleInfo {
    pub physical_width: u32,
    pub physical_height: u32,
    pub scale_factor: f64,
    applied_zoom: f64,
}

impl ScaleInfo {
    pub fn applied_zoom(&self) -> f64 {
        self.applied_zoom
    }

    pub fn monitor(&self) -> MonitorBounds {
        MonitorBounds::new(self.physical_width, self.physical_height)
    }
}

impl Default for ScaleInfo {
    fn default() -> Self {
        Self {
            physical_width: 0,
            physical_height: 0,
            scale_factor: 1.0,
            applied_zoom: 1.0,
        }
    }
}

/// Zoom that makes the webview render at physical size.
///
/// `1.0` for unscaled monitors, otherwise `(1 / scale_factor) / correction`.
pub fn zoom_for_scale(scale_factor: f64, correction: f64) -> f64 {
    if scale_factor == 1.0 {
        1.0
    } else {
        (1.0 / scale_factor) / correction
    }
}

/// Resolves monitor metrics and keeps the last result
pub struct ScaleAdapter {
    correction: f64,
    info: ScaleInfo,
}

impl ScaleAdapter {
    pub fn new(correction: f64) -> Self {
        Self {
            correction,
            info: ScaleInfo::default(),
        }
    }

    pub fn info(&self) -> ScaleInfo {
        self.info
    }

    /// Query the monitor and apply the zoom correction. Never fails.
    pub fn resolve<D: DisplaySurface>(&mut self, surface: &D) -> ScaleInfo {
        let (width, height, scale_factor) = match query_monitor(surface) {
            Some(monitor) => {
                info!(
                    width = monitor.width,
                    height = monitor.height,
                    scale_factor = monitor.scale_factor,
                    "Using host monitor info"
                );
                (monitor.width, monitor.height, monitor.scale_factor)
            }
            None => fallback_metrics(surface),
        };

        self.info.physical_width = width;
        self.info.physical_height = height;
        self.info.scale_factor = scale_factor;

        if scale_factor == 1.0 {
            self.info.applied_zoom = 1.0;
            debug!("Scale factor is 1.0, no zoom applied");
        } else {
            let zoom = zoom_for_scale(scale_factor, self.correction);
            match surface.set_zoom(zoom) {
                Ok(()) => {
                    self.info.applied_zoom = zoom;
                    info!(zoom, "Applied render zoom");
                }
                Err(e) => {
                    error!(
                        zoom,
                        kept = self.info.applied_zoom,
                        error = %e,
                        "Failed to apply render zoom"
                    );
                }
            }
        }

        self.info
    }
}

/// Current monitor, then primary, then the first listed one.
fn query_monitor<D: DisplaySurface>(surface: &D) -> Option<MonitorInfo> {
    let usable = |m: &MonitorInfo| m.scale_factor > 0.0 && m.width > 0 && m.height > 0;

    match surface.current_monitor() {
        Ok(Some(m)) if usable(&m) => return Some(m),
        Ok(_) => debug!("Current monitor unavailable or invalid"),
        Err(e) => warn!(error = %e, "Could not query current monitor"),
    }

    match surface.primary_monitor() {
        Ok(Some(m)) if usable(&m) => return Some(m),
        Ok(_) => debug!("Primary monitor unavailable, trying available monitors"),
        Err(e) => warn!(error = %e, "Could not query primary monitor"),
    }

    match surface.available_monitors() {
        Ok(monitors) => monitors.into_iter().find(|m| usable(m)),
        Err(e) => {
            warn!(error = %e, "Could not list monitors");
            None
        }
    }
}

/// Logical screen size times the device pixel ratio
fn fallback_metrics<D: DisplaySurface>(surface: &D) -> (u32, u32, f64) {
    let dpr = match surface.device_pixel_ratio() {
        r if r.is_finite() && r > 0.0 => r,
        _ => 1.0,
    };
    let (logical_w, logical_h) = surface.logical_screen_size().unwrap_or_else(|e| {
        warn!(error = %e, "Could not read logical screen size");
        (0.0, 0.0)
    });

    let width = (logical_w * dpr).round() as u32;
    let height = (logical_h * dpr).round() as u32;
    info!(width, height, dpr, "Using fallback monitor metrics");
    (width, height, dpr)
}
