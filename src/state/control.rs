use crate::config::FramerConfig;
use crate::error::FramerError;
use crate::host::{HostWindow, InteractivityBus, LogicalBounds, OVERLAY_LABEL};
use crate::interactivity::{
    relay_interactivity, ApplyOutcome, InteractivityCoordinator, InteractivityState,
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What a frame toggle managed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReport {
    /// Optimistic flag, flipped before any host call
    pub frame_visible: bool,
    /// `None` when the overlay window was missing
    pub interactivity: Option<ApplyOutcome>,
    pub relayed: bool,
}

/// The control window's side: the visible flag and the click-through state of
/// both windows. It is the only owner of the overlay's click-through state.
pub struct ControlSurface {
    frame_visible: bool,
    overlay_interactivity: InteractivityCoordinator,
    control_interactivity: InteractivityCoordinator,
    overlay_initial: bool,
    control_initial: bool,
    show_settle: Duration,
    hide_delay: Duration,
    band: u32,
}

impl ControlSurface {
    pub fn new(config: &FramerConfig) -> Self {
        Self {
            frame_visible: false,
            // Assume click-through until a host call says otherwise
            overlay_interactivity: InteractivityCoordinator::default(),
            control_interactivity: InteractivityCoordinator::default(),
            overlay_initial: config.overlay.initial_interactive,
            control_initial: config.control.initial_interactive,
            show_settle: Duration::from_millis(config.show_settle_ms),
            hide_delay: Duration::from_millis(config.hide_delay_ms),
            band: config.control.control_band_height,
        }
    }

    pub fn frame_visible(&self) -> bool {
        self.frame_visible
    }

    pub fn overlay_interactivity(&self) -> InteractivityState {
        self.overlay_interactivity.state()
    }

    pub fn control_interactivity(&self) -> InteractivityState {
        self.control_interactivity.state()
    }

    /// Apply each window's configured click-through once, at creation.
    ///
    /// Tracked state only changes when the host call succeeds, so a failed
    /// overlay setup is retried by the first toggle.
    pub fn initialize_interactivity<W: HostWindow>(
        &mut self,
        control: Option<&W>,
        overlay: Option<&W>,
    ) {
        if let Some(control) = control {
            self.control_interactivity.initialize(control, self.control_initial);
        }
        match overlay {
            Some(overlay) => {
                self.overlay_interactivity.initialize(overlay, self.overlay_initial);
            }
            None => warn!(
                window = OVERLAY_LABEL,
                "Overlay missing, click-through not initialized"
            ),
        }
    }

    /// Pin the control window over the band and prepare the overlay.
    ///
    /// Either window may be missing; each step is best-effort.
    pub fn setup_windows<W: HostWindow>(
        &self,
        control: Option<&W>,
        overlay: Option<&W>,
        logical_width: f64,
    ) {
        match control {
            Some(control) => {
                let bounds = LogicalBounds {
                    x: 0.0,
                    y: 0.0,
                    width: logical_width,
                    height: self.band as f64,
                };
                if let Err(e) = control.set_always_on_top(true) {
                    warn!(window = control.label(), error = %e, "Failed to set always-on-top");
                }
                if let Err(e) = control.set_bounds(bounds) {
                    warn!(window = control.label(), error = %e, "Failed to place control window");
                }
                info!(window = control.label(), ?bounds, "Control window placed over band");
            }
            None => warn!("Control window not found, skipping its setup"),
        }

        let Some(overlay) = overlay else {
            warn!(
                error = %FramerError::WindowNotFound(OVERLAY_LABEL.to_string()),
                "Skipping overlay setup"
            );
            return;
        };
        unmaximize_if_needed(overlay);
        if let Err(e) = overlay.set_fullscreen(true) {
            warn!(window = overlay.label(), error = %e, "Failed to make overlay fullscreen");
        }
        if let Err(e) = overlay.set_decorations(false) {
            warn!(window = overlay.label(), error = %e, "Failed to remove overlay decorations");
        }
    }

    /// Flip the frame between shown-and-interactive and hidden-and-click-through
    pub async fn toggle_frame<W, B>(
        &mut self,
        overlay: Option<&W>,
        control: Option<&W>,
        bus: &B,
    ) -> ToggleReport
    where
        W: HostWindow + Sync,
        B: InteractivityBus + Sync,
    {
        let visible = !self.frame_visible;
        self.set_frame_visible(visible, overlay, control, bus).await
    }

    pub async fn set_frame_visible<W, B>(
        &mut self,
        visible: bool,
        overlay: Option<&W>,
        control: Option<&W>,
        bus: &B,
    ) -> ToggleReport
    where
        W: HostWindow + Sync,
        B: InteractivityBus + Sync,
    {
        // UI reflects the request immediately, even if the host calls below fail
        self.frame_visible = visible;
        info!(visible, "Frame toggled");

        let Some(overlay) = overlay else {
            warn!(
                error = %FramerError::WindowNotFound(OVERLAY_LABEL.to_string()),
                visible,
                "Frame toggle skipped"
            );
            return ToggleReport {
                frame_visible: visible,
                interactivity: None,
                relayed: false,
            };
        };

        let (interactivity, relayed) = if visible {
            self.show_overlay(overlay, control, bus).await
        } else {
            self.hide_overlay(overlay, bus).await
        };

        ToggleReport {
            frame_visible: visible,
            interactivity: Some(interactivity),
            relayed,
        }
    }

    async fn show_overlay<W, B>(
        &mut self,
        overlay: &W,
        control: Option<&W>,
        bus: &B,
    ) -> (ApplyOutcome, bool)
    where
        W: HostWindow + Sync,
        B: InteractivityBus + Sync,
    {
        unmaximize_if_needed(overlay);
        if let Err(e) = overlay.show() {
            warn!(window = overlay.label(), error = %e, "Failed to show overlay");
        }

        // Let the window manager finish mapping the window
        if !self.show_settle.is_zero() {
            tokio::time::sleep(self.show_settle).await;
        }

        let outcome = self.overlay_interactivity.set_interactive(overlay, true);
        let relayed = relay_interactivity(bus, OVERLAY_LABEL, true);

        if let Some(control) = control {
            raise(control);
        }
        (outcome, relayed)
    }

    async fn hide_overlay<W, B>(&mut self, overlay: &W, bus: &B) -> (ApplyOutcome, bool)
    where
        W: HostWindow + Sync,
        B: InteractivityBus + Sync,
    {
        let relayed = relay_interactivity(bus, OVERLAY_LABEL, false);
        let outcome = self.overlay_interactivity.set_interactive(overlay, false);

        if !self.hide_delay.is_zero() {
            tokio::time::sleep(self.hide_delay).await;
        }
        if let Err(e) = overlay.hide() {
            warn!(window = overlay.label(), error = %e, "Failed to hide overlay");
        }
        (outcome, relayed)
    }
}

fn unmaximize_if_needed<W: HostWindow>(window: &W) {
    match window.is_maximized() {
        Ok(true) => {
            debug!(window = window.label(), "Unmaximizing");
            if let Err(e) = window.unmaximize() {
                warn!(window = window.label(), error = %e, "Failed to unmaximize");
            }
        }
        Ok(false) => {}
        Err(e) => warn!(window = window.label(), error = %e, "Could not query maximized state"),
    }
}

/// Put the control window back on top of the freshly shown overlay
fn raise<W: HostWindow>(control: &W) {
    let steps = [
        ("set_always_on_top(false)", control.set_always_on_top(false)),
        ("set_always_on_top(true)", control.set_always_on_top(true)),
        ("set_focus", control.set_focus()),
    ];
    for (step, result) in steps {
        if let Err(e) = result {
            warn!(window = control.label(), step, error = %e, "Failed to raise control window");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::{FakeBus, FakeWindow};

    fn instant_config() -> FramerConfig {
        FramerConfig {
            show_settle_ms: 0,
            hide_delay_ms: 0,
            ..FramerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_toggle_on_sequence() {
        let overlay = FakeWindow::new("main");
        let control = FakeWindow::new("control");
        let bus = FakeBus::default();
        let mut surface = ControlSurface::new(&instant_config());

        let report = surface.toggle_frame(Some(&overlay), Some(&control), &bus).await;

        assert_eq!(
            report,
            ToggleReport {
                frame_visible: true,
                interactivity: Some(ApplyOutcome::Applied),
                relayed: true,
            }
        );
        assert_eq!(
            overlay.calls(),
            vec![
                "is_maximized",
                "show",
                "set_ignore_cursor_events(false)",
                "set_fullscreen(true)",
                "set_decorations(false)",
            ]
        );
        assert_eq!(bus.sent(), vec![("main".to_string(), true)]);
        assert_eq!(
            control.calls(),
            vec!["set_always_on_top(false)", "set_always_on_top(true)", "set_focus"]
        );
        assert!(surface.overlay_interactivity().is_interactive);
    }

    #[tokio::test]
    async fn test_toggle_off_relays_before_click_through() {
        let overlay = FakeWindow::new("main");
        let bus = FakeBus::default();
        let mut surface = ControlSurface::new(&instant_config());
        surface.toggle_frame(Some(&overlay), None, &bus).await;
        overlay.clear();

        let report = surface.toggle_frame(Some(&overlay), None, &bus).await;
        assert!(!report.frame_visible);
        assert_eq!(bus.sent().last(), Some(&("main".to_string(), false)));
        assert_eq!(
            overlay.calls(),
            vec![
                "set_ignore_cursor_events(true)",
                "set_fullscreen(true)",
                "set_decorations(false)",
                "hide",
            ]
        );
    }

    #[tokio::test]
    async fn test_toggle_unmaximizes_overlay() {
        let overlay = FakeWindow::new("main");
        overlay.set_maximized(true);
        let mut surface = ControlSurface::new(&instant_config());

        surface
            .toggle_frame(Some(&overlay), None, &FakeBus::default())
            .await;
        assert_eq!(&overlay.calls()[..3], ["is_maximized", "unmaximize", "show"]);
    }

    #[tokio::test]
    async fn test_missing_overlay_keeps_optimistic_flag() {
        let bus = FakeBus::default();
        let mut surface = ControlSurface::new(&instant_config());

        let report = surface.toggle_frame(None::<&FakeWindow>, None, &bus).await;
        assert!(report.frame_visible);
        assert!(surface.frame_visible());
        assert_eq!(report.interactivity, None);
        assert!(bus.sent().is_empty());
        assert!(!surface.overlay_interactivity().is_interactive);
    }

    #[tokio::test]
    async fn test_lost_relay_still_applies_click_through() {
        let overlay = FakeWindow::new("main");
        let bus = FakeBus {
            broken: true,
            ..Default::default()
        };
        let mut surface = ControlSurface::new(&instant_config());

        let report = surface.toggle_frame(Some(&overlay), None, &bus).await;
        assert!(!report.relayed);
        assert_eq!(report.interactivity, Some(ApplyOutcome::Applied));
        assert!(surface.overlay_interactivity().is_interactive);
    }

    #[tokio::test]
    async fn test_click_through_failure_still_relays() {
        let overlay = FakeWindow::new("main");
        overlay.fail("set_ignore_cursor_events");
        let bus = FakeBus::default();
        let mut surface = ControlSurface::new(&instant_config());

        let report = surface.toggle_frame(Some(&overlay), None, &bus).await;
        assert_eq!(report.interactivity, Some(ApplyOutcome::Failed));
        assert!(report.relayed);
        assert!(!surface.overlay_interactivity().is_interactive);
    }

    #[tokio::test]
    async fn test_show_waits_for_settle() {
        let overlay = FakeWindow::new("main");
        let config = FramerConfig {
            show_settle_ms: 20,
            hide_delay_ms: 0,
            ..FramerConfig::default()
        };
        let mut surface = ControlSurface::new(&config);

        let started = std::time::Instant::now();
        surface
            .toggle_frame(Some(&overlay), None, &FakeBus::default())
            .await;
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_setup_windows() {
        let control = FakeWindow::new("control");
        let overlay = FakeWindow::new("main");
        overlay.set_maximized(true);
        let surface = ControlSurface::new(&FramerConfig::default());

        surface.setup_windows(Some(&control), Some(&overlay), 1536.0);
        assert_eq!(
            control.calls(),
            vec!["set_always_on_top(true)", "set_bounds(0,0,1536,50)"]
        );
        assert_eq!(
            overlay.calls(),
            vec![
                "is_maximized",
                "unmaximize",
                "set_fullscreen(true)",
                "set_decorations(false)",
            ]
        );
    }

    #[test]
    fn test_initialize_interactivity_uses_each_surface_config() {
        let control = FakeWindow::new("control");
        let overlay = FakeWindow::new("main");
        let mut surface = ControlSurface::new(&FramerConfig::default());

        surface.initialize_interactivity(Some(&control), Some(&overlay));
        assert_eq!(control.calls(), vec!["set_ignore_cursor_events(false)"]);
        assert_eq!(overlay.calls(), vec!["set_ignore_cursor_events(true)"]);
        assert!(surface.control_interactivity().is_interactive);
        assert!(!surface.overlay_interactivity().is_interactive);
    }

    #[test]
    fn test_control_initial_interactive_is_configurable() {
        let control = FakeWindow::new("control");
        let mut config = FramerConfig::default();
        config.control.initial_interactive = false;
        let mut surface = ControlSurface::new(&config);

        surface.initialize_interactivity(Some(&control), None);
        assert_eq!(control.calls(), vec!["set_ignore_cursor_events(true)"]);
        assert!(!surface.control_interactivity().is_interactive);
    }

    #[tokio::test]
    async fn test_failed_overlay_initialize_is_retried_by_toggle() {
        let overlay = FakeWindow::new("main");
        overlay.fail("set_ignore_cursor_events");
        let mut config = instant_config();
        config.overlay.initial_interactive = true;
        let mut surface = ControlSurface::new(&config);

        surface.initialize_interactivity(None, Some(&overlay));
        assert!(!surface.overlay_interactivity().is_interactive);

        overlay.heal("set_ignore_cursor_events");
        let report = surface
            .toggle_frame(Some(&overlay), None, &FakeBus::default())
            .await;
        assert_eq!(report.interactivity, Some(ApplyOutcome::Applied));
        assert!(surface.overlay_interactivity().is_interactive);
    }

    #[test]
    fn test_setup_windows_tolerates_missing_windows() {
        let surface = ControlSurface::new(&FramerConfig::default());
        surface.setup_windows(None::<&FakeWindow>, None, 1280.0);
    }
}
