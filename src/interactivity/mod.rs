// Interactivity module: click-through state per window and the cross-window relay
//
// Every host call here is best-effort. Failures are logged and swallowed; the
// caller gets an outcome instead of an error so a stuck overlay can be fixed by
// the next toggle.

use crate::host::{HostWindow, InteractivityBus};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Whether a window currently accepts pointer input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractivityState {
    pub is_interactive: bool,
}

impl InteractivityState {
    pub fn new(is_interactive: bool) -> Self {
        Self { is_interactive }
    }

    pub fn ignore_cursor_events(&self) -> bool {
        !self.is_interactive
    }

    /// Held regardless of interactivity
    pub fn fullscreen(&self) -> bool {
        true
    }

    /// Held regardless of interactivity
    pub fn decorations(&self) -> bool {
        false
    }
}

/// What happened to a requested interactivity change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyOutcome {
    /// Already in the requested state, no host call issued
    Unchanged,
    /// Click-through applied and window flags re-asserted
    Applied,
    /// Click-through applied but fullscreen/decorations could not be re-asserted
    Degraded,
    /// Click-through call failed; tracked state kept its previous value
    Failed,
}

/// Tracks and applies one window's interactivity
#[derive(Debug, Default)]
pub struct InteractivityCoordinator {
    state: InteractivityState,
}

impl InteractivityCoordinator {
    pub fn new(state: InteractivityState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> InteractivityState {
        self.state
    }

    pub fn is_interactive(&self) -> bool {
        self.state.is_interactive
    }

    /// One-time setup at window creation; always issues the host call.
    pub fn initialize<W: HostWindow>(
        &mut self,
        window: &W,
        initial_interactive: bool,
    ) -> ApplyOutcome {
        match window.set_ignore_cursor_events(!initial_interactive) {
            Ok(()) => {
                self.state.is_interactive = initial_interactive;
                info!(
                    window = window.label(),
                    ignore_cursor_events = !initial_interactive,
                    "Initial interactivity applied"
                );
                ApplyOutcome::Applied
            }
            Err(e) => {
                error!(window = window.label(), error = %e, "Failed to set initial interactivity");
                ApplyOutcome::Failed
            }
        }
    }

    /// Make the window interactive or click-through.
    ///
    /// No host call is issued when the tracked state already matches.
    pub fn set_interactive<W: HostWindow>(
        &mut self,
        window: &W,
        interactive: bool,
    ) -> ApplyOutcome {
        if self.state.is_interactive == interactive {
            debug!(
                window = window.label(),
                interactive, "Interactivity already set, no host call"
            );
            return ApplyOutcome::Unchanged;
        }

        if let Err(e) = window.set_ignore_cursor_events(!interactive) {
            error!(
                window = window.label(),
                ignore_cursor_events = !interactive,
                error = %e,
                "Failed to change click-through"
            );
            return ApplyOutcome::Failed;
        }
        self.state.is_interactive = interactive;

        // Platforms may drop these on focus changes
        let mut outcome = ApplyOutcome::Applied;
        if let Err(e) = window.set_fullscreen(self.state.fullscreen()) {
            warn!(window = window.label(), error = %e, "Failed to re-assert fullscreen");
            outcome = ApplyOutcome::Degraded;
        }
        if let Err(e) = window.set_decorations(self.state.decorations()) {
            warn!(window = window.label(), error = %e, "Failed to re-assert decorations");
            outcome = ApplyOutcome::Degraded;
        }

        info!(
            window = window.label(),
            ignore_cursor_events = !interactive,
            ?outcome,
            "Interactivity changed"
        );
        outcome
    }

    pub fn toggle<W: HostWindow>(&mut self, window: &W) -> ApplyOutcome {
        debug!(
            window = window.label(),
            current = self.state.is_interactive,
            "Toggling interactivity"
        );
        self.set_interactive(window, !self.state.is_interactive)
    }
}

/// Tell another window about the overlay's interactivity.
///
/// At-most-once with no acknowledgement; returns whether the bus accepted it.
pub fn relay_interactivity<B: InteractivityBus>(bus: &B, target: &str, interactive: bool) -> bool {
    match bus.emit_interactive(target, interactive) {
        Ok(()) => {
            debug!(to = target, interactive, "Relayed interactivity");
            true
        }
        Err(e) => {
            error!(to = target, interactive, error = %e, "Failed to relay interactivity");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::{FakeBus, FakeWindow};

    #[test]
    fn test_set_interactive_issues_full_sequence() {
        let window = FakeWindow::new("main");
        let mut coordinator = InteractivityCoordinator::default();

        let outcome = coordinator.set_interactive(&window, true);
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert!(coordinator.is_interactive());
        assert_eq!(
            window.calls(),
            vec![
                "set_ignore_cursor_events(false)",
                "set_fullscreen(true)",
                "set_decorations(false)",
            ]
        );
    }

    #[test]
    fn test_set_interactive_is_idempotent() {
        let window = FakeWindow::new("main");
        let mut coordinator = InteractivityCoordinator::default();

        coordinator.set_interactive(&window, true);
        let calls_after_first = window.calls().len();
        let outcome = coordinator.set_interactive(&window, true);

        assert_eq!(outcome, ApplyOutcome::Unchanged);
        assert_eq!(window.calls().len(), calls_after_first);
    }

    #[test]
    fn test_click_through_failure_keeps_previous_state() {
        let window = FakeWindow::new("main");
        window.fail("set_ignore_cursor_events");
        let mut coordinator = InteractivityCoordinator::default();

        let outcome = coordinator.set_interactive(&window, true);
        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(!coordinator.is_interactive());
        // Nothing after the failed call is attempted
        assert_eq!(window.calls(), vec!["set_ignore_cursor_events(false)"]);

        // The next request retries because tracked state never changed
        window.heal("set_ignore_cursor_events");
        assert_eq!(coordinator.set_interactive(&window, true), ApplyOutcome::Applied);
    }

    #[test]
    fn test_reassert_failure_is_degraded_not_rolled_back() {
        let window = FakeWindow::new("main");
        window.fail("set_fullscreen");
        let mut coordinator = InteractivityCoordinator::default();

        let outcome = coordinator.set_interactive(&window, true);
        assert_eq!(outcome, ApplyOutcome::Degraded);
        assert!(coordinator.is_interactive());
        // Decorations are still attempted after fullscreen fails
        assert!(window.calls().contains(&"set_decorations(false)".to_string()));
    }

    #[test]
    fn test_initialize_skips_idempotence_check() {
        let window = FakeWindow::new("main");
        let mut coordinator = InteractivityCoordinator::default();

        assert_eq!(coordinator.initialize(&window, false), ApplyOutcome::Applied);
        assert_eq!(coordinator.initialize(&window, false), ApplyOutcome::Applied);
        assert_eq!(
            window.calls(),
            vec![
                "set_ignore_cursor_events(true)",
                "set_ignore_cursor_events(true)"
            ]
        );
    }

    #[test]
    fn test_toggle() {
        let window = FakeWindow::new("main");
        let mut coordinator = InteractivityCoordinator::new(InteractivityState::new(false));

        coordinator.toggle(&window);
        assert!(coordinator.is_interactive());
        coordinator.toggle(&window);
        assert!(!coordinator.is_interactive());
        assert_eq!(
            window.calls().first().map(String::as_str),
            Some("set_ignore_cursor_events(false)")
        );
    }

    #[test]
    fn test_derived_flags() {
        let state = InteractivityState::new(false);
        assert!(state.ignore_cursor_events());
        assert!(state.fullscreen());
        assert!(!state.decorations());
        assert!(!InteractivityState::new(true).ignore_cursor_events());
    }

    #[test]
    fn test_relay() {
        let bus = FakeBus::default();
        assert!(relay_interactivity(&bus, "main", true));
        assert_eq!(bus.sent(), vec![("main".to_string(), true)]);

        let broken = FakeBus {
            broken: true,
            ..Default::default()
        };
        assert!(!relay_interactivity(&broken, "main", false));
        assert!(broken.sent().is_empty());
    }
}
