// Rectangle math for the draw, drag and resize gestures
//
// Intermediate values are floating point; they are truncated toward zero only
// when written into a Geometry.

use super::types::{Edges, Geometry, ResizeHandle};
use crate::config::FrameLimits;

/// Bounding box of the draw start and the current pointer, kept below the band.
pub fn draw_rect(start_x: f64, start_y: f64, x: f64, y: f64, band: u32) -> Geometry {
    let band = band as f64;
    let left = start_x.min(x);
    let width = (x - start_x).abs();
    let mut top = start_y.min(y);
    let mut height = (y - start_y).abs();

    if top < band {
        height = (height - (band - top)).max(0.0);
        top = band;
    }

    Geometry {
        left: left as i32,
        top: top as i32,
        width: width as u32,
        height: height as u32,
    }
}

/// Translate the initial rectangle by the pointer delta.
///
/// Only the top edge is clamped; `left` may leave the screen.
pub fn drag_rect(initial: Geometry, dx: f64, dy: f64, band: u32) -> Geometry {
    let left = initial.left as f64 + dx;
    let top = (initial.top as f64 + dy).max(band as f64);

    Geometry {
        left: left as i32,
        top: top as i32,
        width: initial.width,
        height: initial.height,
    }
}

/// Resize the initial rectangle from one handle.
///
/// With `keep_aspect` the dimension with the larger fractional displacement
/// drives the other through the initial aspect ratio.
pub fn resize_rect(
    initial: Geometry,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    keep_aspect: bool,
    limits: &FrameLimits,
    band: u32,
) -> Geometry {
    let edges = handle.edges();
    let min_w = limits.min_width as f64;
    let min_h = limits.min_height as f64;
    let iw = initial.width as f64;
    let ih = initial.height as f64;

    let mut width = iw;
    let mut height = ih;

    if edges.contains(Edges::EAST) {
        width = (iw + dx).max(min_w);
    } else if edges.contains(Edges::WEST) {
        width = (iw - dx).max(min_w);
    }
    if edges.contains(Edges::SOUTH) {
        height = (ih + dy).max(min_h);
    } else if edges.contains(Edges::NORTH) {
        height = (ih - dy).max(min_h);
    }

    if keep_aspect && iw > 0.0 && ih > 0.0 {
        (width, height) = aspect_locked_size(edges, iw, ih, dx, dy, min_w, min_h);
    }

    let mut left = initial.left as f64;
    let mut top = initial.top as f64;
    if edges.contains(Edges::WEST) {
        left += iw - width;
    }
    if edges.contains(Edges::NORTH) {
        top += ih - height;
    }

    let band = band as f64;
    if top < band {
        height = (height - (band - top)).max(min_h);
        top = band;
    }

    Geometry {
        left: left as i32,
        top: top as i32,
        width: width as u32,
        height: height as u32,
    }
}

fn aspect_locked_size(
    edges: Edges,
    iw: f64,
    ih: f64,
    dx: f64,
    dy: f64,
    min_w: f64,
    min_h: f64,
) -> (f64, f64) {
    let ratio = iw / ih;

    let mut proposed_w = iw;
    let mut proposed_h = ih;
    if edges.contains(Edges::EAST) {
        proposed_w = iw + dx;
    } else if edges.contains(Edges::WEST) {
        proposed_w = iw - dx;
    }
    if edges.contains(Edges::SOUTH) {
        proposed_h = ih + dy;
    } else if edges.contains(Edges::NORTH) {
        proposed_h = ih - dy;
    }

    let width_drives =
        edges.horizontal() && (!edges.vertical() || (dx / iw).abs() >= (dy / ih).abs());

    let (mut width, mut height) = if width_drives {
        (proposed_w, proposed_w / ratio)
    } else {
        (proposed_h * ratio, proposed_h)
    };

    if width < min_w {
        width = min_w;
        height = width / ratio;
    }
    // Single re-derivation: widening to honour min_h keeps width >= min_w
    if height < min_h {
        height = min_h;
        width = height * ratio;
    }

    let width = if width.is_nan() { min_w } else { width.max(min_w) };
    let height = if height.is_nan() { min_h } else { height.max(min_h) };
    (width, height)
}
