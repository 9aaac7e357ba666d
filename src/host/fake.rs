// Recording fakes of the host seams for unit tests

use super::{DisplaySurface, HostWindow, InteractivityBus, LogicalBounds, MonitorInfo};
use crate::error::{FramerError, Result};
use std::collections::HashSet;
use std::sync::Mutex;

/// Window that records every call and fails the ones it is told to
pub struct FakeWindow {
    label: String,
    pub calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    maximized: Mutex<bool>,
}

impl FakeWindow {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            maximized: Mutex::new(false),
        }
    }

    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    pub fn heal(&self, method: &'static str) {
        self.failing.lock().unwrap().remove(method);
    }

    pub fn set_maximized(&self, maximized: bool) {
        *self.maximized.lock().unwrap() = maximized;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, method: &'static str, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(method) {
            Err(FramerError::Host(format!("{} rejected", method)))
        } else {
            Ok(())
        }
    }
}

impl HostWindow for FakeWindow {
    fn label(&self) -> &str {
        &self.label
    }

    fn set_ignore_cursor_events(&self, ignore: bool) -> Result<()> {
        self.record(
            "set_ignore_cursor_events",
            format!("set_ignore_cursor_events({})", ignore),
        )
    }

    fn set_fullscreen(&self, fullscreen: bool) -> Result<()> {
        self.record("set_fullscreen", format!("set_fullscreen({})", fullscreen))
    }

    fn set_decorations(&self, decorations: bool) -> Result<()> {
        self.record("set_decorations", format!("set_decorations({})", decorations))
    }

    fn set_always_on_top(&self, always_on_top: bool) -> Result<()> {
        self.record(
            "set_always_on_top",
            format!("set_always_on_top({})", always_on_top),
        )
    }

    fn set_focus(&self) -> Result<()> {
        self.record("set_focus", "set_focus".to_string())
    }

    fn show(&self) -> Result<()> {
        self.record("show", "show".to_string())
    }

    fn hide(&self) -> Result<()> {
        self.record("hide", "hide".to_string())
    }

    fn is_maximized(&self) -> Result<bool> {
        self.record("is_maximized", "is_maximized".to_string())?;
        Ok(*self.maximized.lock().unwrap())
    }

    fn unmaximize(&self) -> Result<()> {
        self.record("unmaximize", "unmaximize".to_string())?;
        *self.maximized.lock().unwrap() = false;
        Ok(())
    }

    fn set_bounds(&self, bounds: LogicalBounds) -> Result<()> {
        self.record(
            "set_bounds",
            format!(
                "set_bounds({},{},{},{})",
                bounds.x, bounds.y, bounds.width, bounds.height
            ),
        )
    }
}

/// Monitor source with scripted answers
pub struct FakeDisplay {
    pub current: Result<Option<MonitorInfo>>,
    pub primary: Option<MonitorInfo>,
    pub available: Vec<MonitorInfo>,
    pub logical_screen: (f64, f64),
    pub dpr: f64,
    pub zoom_fails: bool,
    pub zooms: Mutex<Vec<f64>>,
}

impl FakeDisplay {
    pub fn with_monitor(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            current: Ok(Some(MonitorInfo {
                width,
                height,
                scale_factor,
            })),
            primary: None,
            available: Vec::new(),
            logical_screen: (1280.0, 720.0),
            dpr: 1.0,
            zoom_fails: false,
            zooms: Mutex::new(Vec::new()),
        }
    }

    pub fn without_monitor(logical_width: f64, logical_height: f64, dpr: f64) -> Self {
        Self {
            current: Ok(None),
            primary: None,
            available: Vec::new(),
            logical_screen: (logical_width, logical_height),
            dpr,
            zoom_fails: false,
            zooms: Mutex::new(Vec::new()),
        }
    }

    pub fn zooms(&self) -> Vec<f64> {
        self.zooms.lock().unwrap().clone()
    }
}

impl DisplaySurface for FakeDisplay {
    fn current_monitor(&self) -> Result<Option<MonitorInfo>> {
        match &self.current {
            Ok(info) => Ok(*info),
            Err(e) => Err(FramerError::Host(e.to_string())),
        }
    }

    fn primary_monitor(&self) -> Result<Option<MonitorInfo>> {
        Ok(self.primary)
    }

    fn available_monitors(&self) -> Result<Vec<MonitorInfo>> {
        Ok(self.available.clone())
    }

    fn logical_screen_size(&self) -> Result<(f64, f64)> {
        Ok(self.logical_screen)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    fn set_zoom(&self, zoom: f64) -> Result<()> {
        self.zooms.lock().unwrap().push(zoom);
        if self.zoom_fails {
            Err(FramerError::Host("set_zoom rejected".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Message bus that records emits; may drop everything
#[derive(Default)]
pub struct FakeBus {
    pub sent: Mutex<Vec<(String, bool)>>,
    pub broken: bool,
}

impl FakeBus {
    pub fn sent(&self) -> Vec<(String, bool)> {
        self.sent.lock().unwrap().clone()
    }
}

impl InteractivityBus for FakeBus {
    fn emit_interactive(&self, target: &str, interactive: bool) -> Result<()> {
        if self.broken {
            return Err(FramerError::Host("emit rejected".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((target.to_string(), interactive));
        Ok(())
    }
}
