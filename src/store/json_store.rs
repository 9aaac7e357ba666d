use super::{GeometryStore, StoredGeometry};
use crate::error::{FramerError, Result};
use crate::frame_engine::Geometry;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tauri::Manager;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Settings file name inside the app data directory
pub const SETTINGS_FILE_NAME: &str = ".framer-settings.dat";

/// Key-value JSON file store. Each key maps to a `StoredGeometry` object.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles from concurrent detached saves
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at `<app data dir>/.framer-settings.dat`
    pub fn in_app_data_dir(app: &tauri::AppHandle) -> Result<Self> {
        let dir = app
            .path()
            .app_data_dir()
            .map_err(|e| FramerError::Store(format!("Failed to get app data dir: {}", e)))?;
        Ok(Self::new(dir.join(SETTINGS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole file as a JSON object; a missing file is an empty object
    async fn read_entries(&self) -> Result<Map<String, Value>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            other => Err(FramerError::Store(format!(
                "{} does not hold a JSON object (found {})",
                self.path.display(),
                type_name(&other)
            ))),
        }
    }

    async fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("dat.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl GeometryStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<Geometry>> {
        let entries = self.read_entries().await?;
        let Some(value) = entries.get(key) else {
            debug!(key, path = %self.path.display(), "Key not present in settings file");
            return Ok(None);
        };

        let stored: StoredGeometry = serde_json::from_value(value.clone())?;
        Geometry::try_from(&stored).map(Some)
    }

    async fn save(&self, key: &str, geometry: &Geometry) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(FramerError::Io(e)) => return Err(FramerError::Io(e)),
            Err(e) => {
                // Unreadable content would otherwise block every future save
                warn!(path = %self.path.display(), error = %e, "Replacing corrupt settings file");
                Map::new()
            }
        };

        entries.insert(
            key.to_string(),
            serde_json::to_value(StoredGeometry::from(geometry))?,
        );
        self.write_entries(&entries).await?;
        debug!(key, path = %self.path.display(), "Settings file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FRAME_GEOMETRY_KEY;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(SETTINGS_FILE_NAME));
        assert_eq!(store.load(FRAME_GEOMETRY_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);
        let store = JsonFileStore::new(&path);
        let geo = Geometry::new(320, 180, 1280, 720);

        store.save(FRAME_GEOMETRY_KEY, &geo).await.unwrap();
        assert_eq!(store.load(FRAME_GEOMETRY_KEY).await.unwrap(), Some(geo));

        let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw[FRAME_GEOMETRY_KEY]["width"], "1280px");
        assert!(!path.with_extension("dat.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_preserves_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = JsonFileStore::new(&path);
        store
            .save(FRAME_GEOMETRY_KEY, &Geometry::new(1, 60, 30, 30))
            .await
            .unwrap();

        let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw[FRAME_GEOMETRY_KEY]["top"], "60px");
    }

    #[tokio::test]
    async fn test_load_accepts_unsuffixed_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(
            &path,
            r#"{"frameGeometry":{"left":"10","top":"70px","width":"400","height":"300.5px"}}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(
            store.load(FRAME_GEOMETRY_KEY).await.unwrap(),
            Some(Geometry::new(10, 70, 400, 300))
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_load_but_save_recovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "not json at all").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load(FRAME_GEOMETRY_KEY).await.is_err());

        let geo = Geometry::new(5, 55, 50, 50);
        store.save(FRAME_GEOMETRY_KEY, &geo).await.unwrap();
        assert_eq!(store.load(FRAME_GEOMETRY_KEY).await.unwrap(), Some(geo));
    }

    #[tokio::test]
    async fn test_non_object_file_is_store_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonFileStore::new(&path);
        match store.load(FRAME_GEOMETRY_KEY).await {
            Err(FramerError::Store(msg)) => assert!(msg.contains("array")),
            other => panic!("expected store error, got {:?}", other),
        }
    }
}
