// Frame geometry module: the overlay rectangle and the gestures that change it
// Handles drawing, dragging and resizing with band, minimum-size and aspect constraints

pub mod engine;
pub mod spatial;
pub mod types;

pub use engine::FrameGeometryEngine;
pub use types::*;
