// Pointer-driven state machine that owns the frame rectangle

use super::spatial::{drag_rect, draw_rect, resize_rect};
use super::types::*;
use crate::config::FrameLimits;
use crate::error::{FramerError, Result};
use tracing::{debug, trace};

/// Owns the frame rectangle and the one gesture that may be mutating it
pub struct FrameGeometryEngine {
    limits: FrameLimits,
    band: u32,
    rect: Geometry,
    gesture: Option<PointerGesture>,
    /// Text selection is disabled while a handle is held
    selection_suppressed: bool,
}

impl FrameGeometryEngine {
    pub fn new(limits: FrameLimits, band: u32) -> Self {
        Self {
            limits,
            band,
            rect: Geometry::default(),
            gesture: None,
            selection_suppressed: false,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.rect
    }

    pub fn band(&self) -> u32 {
        self.band
    }

    pub fn active_gesture(&self) -> Option<&PointerGesture> {
        self.gesture.as_ref()
    }

    pub fn selection_suppressed(&self) -> bool {
        self.selection_suppressed
    }

    /// Replace the rectangle outside of a gesture (startup placement, presets)
    pub fn place(&mut self, geometry: Geometry) -> Result<Geometry> {
        self.ensure_idle()?;
        self.rect = geometry;
        debug!(?geometry, "Frame placed");
        Ok(self.rect)
    }

    /// Start a new frame at the pointer
    pub fn begin_draw(&mut self, x: f64, y: f64, overlay_interactive: bool) -> Result<Geometry> {
        self.ensure_idle()?;
        if !overlay_interactive {
            debug!("Frame is off, draw ignored");
            return Err(FramerError::NotInteractive);
        }
        if y < self.band as f64 {
            return Err(FramerError::InvalidGeometry(format!(
                "draw must start below the control band ({} < {})",
                y, self.band
            )));
        }

        self.rect = Geometry::new(x as i32, y as i32, 0, 0);
        self.open(GestureKind::Draw, x, y, None);
        Ok(self.rect)
    }

    /// Start moving the frame body
    pub fn begin_drag(&mut self, x: f64, y: f64) -> Result<Geometry> {
        self.ensure_idle()?;
        self.open(GestureKind::Drag, x, y, None);
        Ok(self.rect)
    }

    /// Start resizing from one of the compass handles
    pub fn begin_resize(&mut self, x: f64, y: f64, handle: ResizeHandle) -> Result<Geometry> {
        self.ensure_idle()?;
        self.open(GestureKind::Resize, x, y, Some(handle));
        self.selection_suppressed = true;
        Ok(self.rect)
    }

    /// Apply a pointer move to the active gesture.
    ///
    /// Returns the new rectangle, or `None` when no gesture is active.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, ctrl_held: bool) -> Option<Geometry> {
        let gesture = self.gesture?;
        let dx = x - gesture.start_x;
        let dy = y - gesture.start_y;

        self.rect = match (gesture.kind, gesture.active_handle) {
            (GestureKind::Draw, _) => draw_rect(gesture.start_x, gesture.start_y, x, y, self.band),
            (GestureKind::Drag, _) => drag_rect(gesture.initial_rect, dx, dy, self.band),
            (GestureKind::Resize, Some(handle)) => resize_rect(
                gesture.initial_rect,
                handle,
                dx,
                dy,
                ctrl_held,
                &self.limits,
                self.band,
            ),
            (GestureKind::Resize, None) => gesture.initial_rect,
        };

        trace!(kind = ?gesture.kind, geometry = ?self.rect, "Pointer move");
        Some(self.rect)
    }

    /// Close the active gesture.
    ///
    /// A pointer-up without a matching pointer-down is a no-op.
    pub fn end_gesture(&mut self) -> Option<GestureEnd> {
        self.selection_suppressed = false;
        let gesture = self.gesture.take()?;
        debug!(kind = ?gesture.kind, geometry = ?self.rect, "Gesture ended");
        Some(GestureEnd {
            kind: gesture.kind,
            geometry: self.rect,
        })
    }

    /// Default frame shown when the overlay is switched on with nothing drawn
    pub fn ensure_frame(&mut self) -> Option<Geometry> {
        if self.gesture.is_some() || !self.rect.is_empty() {
            return None;
        }
        self.rect = Geometry::new(
            100,
            (self.band + 50) as i32,
            self.limits.default_width,
            self.limits.default_height,
        );
        debug!(geometry = ?self.rect, "Created default frame");
        Some(self.rect)
    }

    fn open(&mut self, kind: GestureKind, x: f64, y: f64, handle: Option<ResizeHandle>) {
        self.gesture = Some(PointerGesture {
            kind,
            start_x: x,
            start_y: y,
            initial_rect: self.rect,
            active_handle: handle,
        });
        debug!(?kind, x, y, ?handle, "Gesture started");
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.gesture.is_some() {
            Err(FramerError::GestureActive)
        } else {
            Ok(())
        }
    }
}
