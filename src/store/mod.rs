// Geometry persistence: the store seam, the on-disk encoding and startup placement

pub mod json_store;

pub use json_store::JsonFileStore;

use crate::config::FrameLimits;
use crate::error::{FramerError, Result};
use crate::frame_engine::{Geometry, MonitorBounds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tauri::async_runtime::JoinHandle;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Key the frame rectangle is stored under
pub const FRAME_GEOMETRY_KEY: &str = "frameGeometry";

/// Asynchronous key-value persistence for the frame rectangle
pub trait GeometryStore: Send + Sync + 'static {
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<Geometry>>> + Send;
    fn save(&self, key: &str, geometry: &Geometry) -> impl Future<Output = Result<()>> + Send;
}

/// Stored form: decimal pixel strings such as `"320px"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGeometry {
    pub left: String,
    pub top: String,
    pub width: String,
    pub height: String,
}

impl From<&Geometry> for StoredGeometry {
    fn from(geo: &Geometry) -> Self {
        Self {
            left: format!("{}px", geo.left),
            top: format!("{}px", geo.top),
            width: format!("{}px", geo.width),
            height: format!("{}px", geo.height),
        }
    }
}

impl TryFrom<&StoredGeometry> for Geometry {
    type Error = FramerError;

    fn try_from(stored: &StoredGeometry) -> Result<Self> {
        let left = parse_px(&stored.left)?;
        let top = parse_px(&stored.top)?;
        let width = parse_px(&stored.width)?;
        let height = parse_px(&stored.height)?;
        Ok(Geometry {
            left: left.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            top: top.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            width: width.clamp(0, u32::MAX as i64) as u32,
            height: height.clamp(0, u32::MAX as i64) as u32,
        })
    }
}

/// Parse `"320px"`, `"320"` or `"320.7px"` (fractions truncate)
fn parse_px(value: &str) -> Result<i64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
        .ok_or_else(|| FramerError::InvalidGeometry(format!("not a pixel value: {:?}", value)))
}

/// In-process store used by tests and when no data directory is available
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoredGeometry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GeometryStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Geometry>> {
        let stored = self
            .entries
            .lock()
            .map_err(|e| FramerError::Store(e.to_string()))?
            .get(key)
            .cloned();
        stored.as_ref().map(Geometry::try_from).transpose()
    }

    async fn save(&self, key: &str, geometry: &Geometry) -> Result<()> {
        self.entries
            .lock()
            .map_err(|e| FramerError::Store(e.to_string()))?
            .insert(key.to_string(), StoredGeometry::from(geometry));
        Ok(())
    }
}

/// Store chosen at startup: the settings file, or memory when there is no data directory
pub enum SettingsStore {
    File(JsonFileStore),
    Memory(MemoryStore),
}

impl SettingsStore {
    pub fn open(app: &tauri::AppHandle) -> Self {
        match JsonFileStore::in_app_data_dir(app) {
            Ok(store) => {
                info!(path = %store.path().display(), "Using settings file");
                SettingsStore::File(store)
            }
            Err(e) => {
                warn!(error = %e, "No app data directory, geometry will not survive restarts");
                SettingsStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl GeometryStore for SettingsStore {
    async fn load(&self, key: &str) -> Result<Option<Geometry>> {
        match self {
            SettingsStore::File(store) => store.load(key).await,
            SettingsStore::Memory(store) => store.load(key).await,
        }
    }

    async fn save(&self, key: &str, geometry: &Geometry) -> Result<()> {
        match self {
            SettingsStore::File(store) => store.save(key, geometry).await,
            SettingsStore::Memory(store) => store.save(key, geometry).await,
        }
    }
}

/// Place the frame at startup from the stored rectangle, or center the default size.
pub async fn initialize_geometry<S: GeometryStore>(
    store: &S,
    limits: &FrameLimits,
    monitor: MonitorBounds,
    band: u32,
) -> Geometry {
    let fallback = Geometry::centered(limits.default_width, limits.default_height, monitor, band);

    let geometry = match store.load(FRAME_GEOMETRY_KEY).await {
        Ok(Some(saved)) => {
            info!(?saved, "Loaded saved frame geometry");
            saved.clamped_to_monitor(limits, monitor, band)
        }
        Ok(None) => {
            info!("No saved frame geometry, using defaults");
            fallback
        }
        Err(e) => {
            warn!(error = %e, "Failed to load frame geometry, using defaults");
            fallback
        }
    };

    info!(?geometry, "Frame geometry initialized");
    geometry
}

/// Queue for background saves.
///
/// One worker task drains the queue in order and only writes the newest
/// rectangle waiting, so the file always ends on the latest geometry.
#[derive(Clone)]
pub struct GeometrySaver {
    tx: mpsc::UnboundedSender<Geometry>,
}

impl GeometrySaver {
    /// Start the worker. It exits once every saver clone is dropped, and the
    /// handle resolves to the number of successful writes.
    pub fn spawn<S: GeometryStore>(store: Arc<S>) -> (Self, JoinHandle<usize>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tauri::async_runtime::spawn(save_worker(store, rx));
        (Self { tx }, worker)
    }

    /// Fire-and-forget; failures are logged by the worker
    pub fn queue(&self, geometry: Geometry) {
        if self.tx.send(geometry).is_err() {
            error!(?geometry, "Save worker stopped, geometry not saved");
        }
    }
}

async fn save_worker<S: GeometryStore>(
    store: Arc<S>,
    mut rx: mpsc::UnboundedReceiver<Geometry>,
) -> usize {
    let mut written = 0;
    while let Some(mut geometry) = rx.recv().await {
        while let Ok(newer) = rx.try_recv() {
            geometry = newer;
        }
        match store.save(FRAME_GEOMETRY_KEY, &geometry).await {
            Ok(()) => {
                info!(?geometry, "Frame geometry saved");
                written += 1;
            }
            Err(e) => error!(?geometry, error = %e, "Failed to save frame geometry"),
        }
    }
    debug!(written, "Save worker stopped");
    written
}
