// Per-window runtime state: the overlay that owns the frame and the control
// surface that drives it. Neither touches the other directly; they meet only
// through host calls and the relay event.

pub mod control;
pub mod overlay;

pub use control::{ControlSurface, ToggleReport};
pub use overlay::{
    FrameGeometryPayload, FrameGesturePayload, FrameState, OverlaySurface, GEOMETRY_CHANGED_EVENT,
    GESTURE_EVENT,
};
