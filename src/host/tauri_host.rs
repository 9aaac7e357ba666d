// Tauri implementations of the host seams

use super::{DisplaySurface, HostWindow, InteractivityBus, LogicalBounds, MonitorInfo};
use super::SET_INTERACTIVE_EVENT;
use crate::error::Result;
use tauri::{AppHandle, Emitter, LogicalPosition, LogicalSize, Monitor, WebviewWindow};

fn monitor_info(monitor: &Monitor) -> MonitorInfo {
    let size = monitor.size();
    MonitorInfo {
        width: size.width,
        height: size.height,
        scale_factor: monitor.scale_factor(),
    }
}

impl HostWindow for WebviewWindow {
    fn label(&self) -> &str {
        WebviewWindow::label(self)
    }

    fn set_ignore_cursor_events(&self, ignore: bool) -> Result<()> {
        Ok(WebviewWindow::set_ignore_cursor_events(self, ignore)?)
    }

    fn set_fullscreen(&self, fullscreen: bool) -> Result<()> {
        Ok(WebviewWindow::set_fullscreen(self, fullscreen)?)
    }

    fn set_decorations(&self, decorations: bool) -> Result<()> {
        Ok(WebviewWindow::set_decorations(self, decorations)?)
    }

    fn set_always_on_top(&self, always_on_top: bool) -> Result<()> {
        Ok(WebviewWindow::set_always_on_top(self, always_on_top)?)
    }

    fn set_focus(&self) -> Result<()> {
        Ok(WebviewWindow::set_focus(self)?)
    }

    fn show(&self) -> Result<()> {
        Ok(WebviewWindow::show(self)?)
    }

    fn hide(&self) -> Result<()> {
        Ok(WebviewWindow::hide(self)?)
    }

    fn is_maximized(&self) -> Result<bool> {
        Ok(WebviewWindow::is_maximized(self)?)
    }

    fn unmaximize(&self) -> Result<()> {
        Ok(WebviewWindow::unmaximize(self)?)
    }

    fn set_bounds(&self, bounds: LogicalBounds) -> Result<()> {
        WebviewWindow::set_size(self, LogicalSize::new(bounds.width, bounds.height))?;
        WebviewWindow::set_position(self, LogicalPosition::new(bounds.x, bounds.y))?;
        Ok(())
    }
}

impl DisplaySurface for WebviewWindow {
    fn current_monitor(&self) -> Result<Option<MonitorInfo>> {
        Ok(WebviewWindow::current_monitor(self)?.as_ref().map(monitor_info))
    }

    fn primary_monitor(&self) -> Result<Option<MonitorInfo>> {
        Ok(WebviewWindow::primary_monitor(self)?.as_ref().map(monitor_info))
    }

    fn available_monitors(&self) -> Result<Vec<MonitorInfo>> {
        Ok(WebviewWindow::available_monitors(self)?
            .iter()
            .map(monitor_info)
            .collect())
    }

    fn logical_screen_size(&self) -> Result<(f64, f64)> {
        let scale = WebviewWindow::scale_factor(self)?;
        let size = WebviewWindow::outer_size(self)?.to_logical::<f64>(scale);
        Ok((size.width, size.height))
    }

    fn device_pixel_ratio(&self) -> f64 {
        WebviewWindow::scale_factor(self).unwrap_or(1.0)
    }

    fn set_zoom(&self, zoom: f64) -> Result<()> {
        Ok(WebviewWindow::set_zoom(self, zoom)?)
    }
}

impl InteractivityBus for AppHandle {
    fn emit_interactive(&self, target: &str, interactive: bool) -> Result<()> {
        Ok(self.emit_to(target, SET_INTERACTIVE_EVENT, interactive)?)
    }
}
