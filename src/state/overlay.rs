use crate::config::FramerConfig;
use crate::error::Result;
use crate::frame_engine::{
    FrameGeometryEngine, Geometry, GestureEnd, GestureKind, MonitorBounds, PointerTarget,
};
use crate::interactivity::InteractivityState;
use crate::presets::{PresetApplier, PresetPlacement, ScreenPreset};
use crate::scaling::ScaleInfo;
use serde::Serialize;
use tracing::{debug, info};

/// Emitted to the overlay webview on every rectangle change
pub const GEOMETRY_CHANGED_EVENT: &str = "frame-geometry-changed";
/// Emitted to the overlay webview when a gesture starts or ends
pub const GESTURE_EVENT: &str = "frame-gesture";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameGeometryPayload {
    pub geometry: Geometry,
    pub dimension_label: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GesturePhase {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameGesturePayload {
    pub kind: GestureKind,
    pub phase: GesturePhase,
    /// UI disables text selection while this is set
    pub selection_suppressed: bool,
}

/// Full overlay snapshot for the `get_frame_state` command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameState {
    pub geometry: Geometry,
    pub frame_active: bool,
    pub gesture: Option<GestureKind>,
    pub interactivity: InteractivityState,
    pub scale: ScaleInfo,
    pub band: u32,
}

/// The overlay window's side: frame engine and the gating flag written by the
/// control surface's relay message. Click-through lives on the control side.
pub struct OverlaySurface {
    engine: FrameGeometryEngine,
    /// Gate for new draws; independent of the click-through flag
    frame_active: bool,
    scale: ScaleInfo,
}

impl OverlaySurface {
    pub fn new(config: &FramerConfig) -> Self {
        Self {
            engine: FrameGeometryEngine::new(config.frame, config.overlay.control_band_height),
            frame_active: false,
            scale: ScaleInfo::default(),
        }
    }

    pub fn engine(&self) -> &FrameGeometryEngine {
        &self.engine
    }

    pub fn frame_active(&self) -> bool {
        self.frame_active
    }

    pub fn scale(&self) -> ScaleInfo {
        self.scale
    }

    pub fn set_scale(&mut self, scale: ScaleInfo) {
        self.scale = scale;
    }

    pub fn monitor(&self) -> MonitorBounds {
        self.scale.monitor()
    }

    pub fn band(&self) -> u32 {
        self.engine.band()
    }

    pub fn place(&mut self, geometry: Geometry) -> Result<Geometry> {
        self.engine.place(geometry)
    }

    /// Route a pointer-down to the gesture its target starts
    pub fn pointer_down(
        &mut self,
        target: PointerTarget,
        x: f64,
        y: f64,
    ) -> Result<FrameGesturePayload> {
        let kind = match target {
            PointerTarget::Body => {
                self.engine.begin_draw(x, y, self.frame_active)?;
                GestureKind::Draw
            }
            PointerTarget::Frame => {
                self.engine.begin_drag(x, y)?;
                GestureKind::Drag
            }
            PointerTarget::Handle(handle) => {
                self.engine.begin_resize(x, y, handle)?;
                GestureKind::Resize
            }
        };

        Ok(FrameGesturePayload {
            kind,
            phase: GesturePhase::Start,
            selection_suppressed: self.engine.selection_suppressed(),
        })
    }

    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        ctrl_held: bool,
    ) -> Option<FrameGeometryPayload> {
        self.engine.on_pointer_move(x, y, ctrl_held)?;
        Some(self.geometry_payload())
    }

    /// `None` for a pointer-up that closes nothing
    pub fn pointer_up(&mut self) -> Option<(GestureEnd, FrameGesturePayload)> {
        let end = self.engine.end_gesture()?;
        let payload = FrameGesturePayload {
            kind: end.kind,
            phase: GesturePhase::End,
            selection_suppressed: self.engine.selection_suppressed(),
        };
        Some((end, payload))
    }

    /// Inbound `set-main-interactive-globally` message.
    ///
    /// Only the gate changes here; click-through is applied by the control surface.
    /// Returns the default frame when switching on created one.
    pub fn on_relay_message(&mut self, active: bool) -> Option<Geometry> {
        debug!(from = self.frame_active, to = active, "Frame gate updated by relay");
        self.frame_active = active;
        if active {
            self.engine.ensure_frame()
        } else {
            None
        }
    }

    /// Size and center the frame to a preset
    pub fn apply_preset(&mut self, preset: &ScreenPreset) -> Result<PresetPlacement> {
        let placement =
            PresetApplier::apply(preset, self.monitor(), self.band(), self.frame_active);
        self.engine.place(placement.geometry)?;
        info!(preset = preset.label, "Frame resized to preset");
        Ok(placement)
    }

    pub fn geometry_payload(&self) -> FrameGeometryPayload {
        let geometry = self.engine.geometry();
        FrameGeometryPayload {
            dimension_label: geometry.dimension_label(),
            geometry,
            visible: self.frame_active && !geometry.is_empty(),
        }
    }

    /// `interactivity` is the overlay click-through state tracked by the control surface
    pub fn snapshot(&self, interactivity: InteractivityState) -> FrameState {
        FrameState {
            geometry: self.engine.geometry(),
            frame_active: self.frame_active,
            gesture: self.engine.active_gesture().map(|g| g.kind),
            interactivity,
            scale: self.scale,
            band: self.band(),
        }
    }
}
