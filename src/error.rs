// Error types shared by the frame engine, the window coordinators and the store

/// Errors that can occur while placing or driving the frame overlay
#[derive(Debug, thiserror::Error)]
pub enum FramerError {
    /// The host window API rejected a call
    #[error("Host call failed: {0}")]
    Host(String),

    /// A window looked up by label does not exist
    #[error("Window not found: {0}")]
    WindowNotFound(String),

    /// Persistence read or write failed
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Invalid config: {0}")]
    Config(String),

    /// A stored or requested rectangle could not be interpreted
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A pointer gesture is already in progress
    #[error("A gesture is already active")]
    GestureActive,

    /// The overlay is not accepting new frames
    #[error("Overlay is not interactive")]
    NotInteractive,

    /// No preset with that label fits the current monitor
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

impl From<tauri::Error> for FramerError {
    fn from(err: tauri::Error) -> Self {
        FramerError::Host(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FramerError>;
