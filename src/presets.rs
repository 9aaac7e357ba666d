// Screen-size presets and their placement on the active monitor

use crate::error::{FramerError, Result};
use crate::frame_engine::{Geometry, MonitorBounds};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PresetKind {
    Desktop,
    Mobile,
}

/// A named frame size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenPreset {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub kind: PresetKind,
}

const fn preset(label: &'static str, width: u32, height: u32, kind: PresetKind) -> ScreenPreset {
    ScreenPreset {
        label,
        width,
        height,
        kind,
    }
}

pub const CATALOGUE: [ScreenPreset; 12] = [
    preset("4K UHD (3840x2160)", 3840, 2160, PresetKind::Desktop),
    preset("QHD (2560x1440)", 2560, 1440, PresetKind::Desktop),
    preset("Full HD (1920x1080)", 1920, 1080, PresetKind::Desktop),
    preset("HD (1280x720)", 1280, 720, PresetKind::Desktop),
    preset("SD (640x480) 4:3", 640, 480, PresetKind::Desktop),
    preset("Square (1080x1080)", 1080, 1080, PresetKind::Desktop),
    preset("Mobile Landscape L (926x428)", 926, 428, PresetKind::Mobile),
    preset("Mobile Landscape M (800x360)", 800, 360, PresetKind::Mobile),
    preset("Mobile Landscape S (640x360)", 640, 360, PresetKind::Mobile),
    preset("Mobile Portrait L (428x926)", 428, 926, PresetKind::Mobile),
    preset("Mobile Portrait M (360x800)", 360, 800, PresetKind::Mobile),
    preset("Mobile Portrait S (360x640)", 360, 640, PresetKind::Mobile),
];

impl ScreenPreset {
    /// Strictly smaller than the monitor in both dimensions
    pub fn fits(&self, monitor: MonitorBounds) -> bool {
        self.width < monitor.width && self.height < monitor.height
    }
}

/// Presets of one kind that fit the monitor, widest first
pub fn available(kind: PresetKind, monitor: MonitorBounds) -> Vec<ScreenPreset> {
    let mut presets: Vec<ScreenPreset> = CATALOGUE
        .iter()
        .copied()
        .filter(|p| p.kind == kind && p.fits(monitor))
        .collect();
    presets.sort_by(|a, b| b.width.cmp(&a.width));
    presets
}

/// Look a preset up by label among those that fit the monitor
pub fn find_available(label: &str, monitor: MonitorBounds) -> Result<ScreenPreset> {
    CATALOGUE
        .iter()
        .copied()
        .find(|p| p.label == label && p.fits(monitor))
        .ok_or_else(|| FramerError::UnknownPreset(label.to_string()))
}

/// Both preset lists for one monitor, as handed to the control surface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetLists {
    pub desktop: Vec<ScreenPreset>,
    pub mobile: Vec<ScreenPreset>,
}

impl PresetLists {
    pub fn for_monitor(monitor: MonitorBounds) -> Self {
        Self {
            desktop: available(PresetKind::Desktop, monitor),
            mobile: available(PresetKind::Mobile, monitor),
        }
    }
}

/// Where a preset lands and whether the frame must be switched on to show it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetPlacement {
    pub geometry: Geometry,
    pub needs_activation: bool,
}

pub struct PresetApplier;

impl PresetApplier {
    /// Size the frame to the preset and center it below the control band.
    pub fn apply(
        preset: &ScreenPreset,
        monitor: MonitorBounds,
        band: u32,
        frame_active: bool,
    ) -> PresetPlacement {
        let geometry = Geometry::centered(preset.width, preset.height, monitor, band);
        info!(preset = preset.label, ?geometry, "Preset applied");
        if !frame_active {
            debug!("Frame is off, preset requests activation");
        }
        PresetPlacement {
            geometry,
            needs_activation: !frame_active,
        }
    }
}
