// Core data structures for the frame rectangle and pointer gestures

use crate::config::FrameLimits;
use serde::{Deserialize, Serialize};

/// The frame rectangle in physical pixels
///
/// `left` is signed because a horizontal drag is allowed to carry the frame off-screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// True when the rectangle has never been given an area
    pub fn is_empty(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }

    /// Text shown by the dimension readout while a gesture is running
    pub fn dimension_label(&self) -> String {
        format!("w: {}px h: {}px", self.width, self.height)
    }

    /// Center a rectangle of the given size on a monitor, never covering the band.
    pub fn centered(width: u32, height: u32, monitor: MonitorBounds, band: u32) -> Self {
        let left = monitor.width as f64 / 2.0 - width as f64 / 2.0;
        let top = monitor.height as f64 / 2.0 - height as f64 / 2.0;
        Self {
            left: left.max(0.0) as i32,
            top: top.max(band as f64) as i32,
            width,
            height,
        }
    }

    /// Pull a previously saved rectangle back inside the monitor.
    ///
    /// Width and height are raised to the minimums first, then the origin is
    /// clamped so the rectangle fits; the band always wins over the bottom edge.
    pub fn clamped_to_monitor(
        &self,
        limits: &FrameLimits,
        monitor: MonitorBounds,
        band: u32,
    ) -> Self {
        let width = self.width.max(limits.min_width);
        let height = self.height.max(limits.min_height);

        let max_left = monitor.width as i64 - width as i64;
        let max_top = monitor.height as i64 - height as i64;
        let left = (self.left as i64).min(max_left).max(0);
        let top = (self.top as i64).min(max_top).max(band as i64);

        Self {
            left: left as i32,
            top: top as i32,
            width,
            height,
        }
    }
}

/// Physical pixel size of the monitor the overlay lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorBounds {
    pub width: u32,
    pub height: u32,
}

impl MonitorBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Set of rectangle edges touched by a resize handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edges(u8);

impl Edges {
    pub const NORTH: Edges = Edges(0b0001);
    pub const SOUTH: Edges = Edges(0b0010);
    pub const EAST: Edges = Edges(0b0100);
    pub const WEST: Edges = Edges(0b1000);

    pub const fn union(self, other: Edges) -> Edges {
        Edges(self.0 | other.0)
    }

    pub const fn contains(self, other: Edges) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Moves the left or right edge
    pub const fn horizontal(self) -> bool {
        self.contains(Edges::EAST) || self.contains(Edges::WEST)
    }

    /// Moves the top or bottom edge
    pub const fn vertical(self) -> bool {
        self.contains(Edges::NORTH) || self.contains(Edges::SOUTH)
    }
}

/// The eight compass handles around the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ResizeHandle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
        ResizeHandle::NW,
    ];

    pub const fn edges(self) -> Edges {
        match self {
            ResizeHandle::N => Edges::NORTH,
            ResizeHandle::NE => Edges::NORTH.union(Edges::EAST),
            ResizeHandle::E => Edges::EAST,
            ResizeHandle::SE => Edges::SOUTH.union(Edges::EAST),
            ResizeHandle::S => Edges::SOUTH,
            ResizeHandle::SW => Edges::SOUTH.union(Edges::WEST),
            ResizeHandle::W => Edges::WEST,
            ResizeHandle::NW => Edges::NORTH.union(Edges::WEST),
        }
    }

    /// Parse a handle id, accepting both `"ne"` and the element id form `"handle-ne"`
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let id = lower.strip_prefix("handle-").unwrap_or(&lower);
        match id {
            "n" => Some(ResizeHandle::N),
            "ne" => Some(ResizeHandle::NE),
            "e" => Some(ResizeHandle::E),
            "se" => Some(ResizeHandle::SE),
            "s" => Some(ResizeHandle::S),
            "sw" => Some(ResizeHandle::SW),
            "w" => Some(ResizeHandle::W),
            "nw" => Some(ResizeHandle::NW),
            _ => None,
        }
    }
}

impl TryFrom<String> for ResizeHandle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ResizeHandle::parse(&value).ok_or_else(|| format!("unknown resize handle: {}", value))
    }
}

/// What a pointer-down landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "handle", rename_all = "camelCase")]
pub enum PointerTarget {
    /// Empty overlay area (starts a new frame)
    Body,
    /// The frame itself, not one of its handles
    Frame,
    /// One of the resize handles
    Handle(ResizeHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Draw,
    Drag,
    Resize,
}

/// One pointer-down to pointer-up interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerGesture {
    pub kind: GestureKind,
    pub start_x: f64,
    pub start_y: f64,
    pub initial_rect: Geometry,
    pub active_handle: Option<ResizeHandle>,
}

/// Result of closing a gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEnd {
    pub kind: GestureKind,
    pub geometry: Geometry,
}
