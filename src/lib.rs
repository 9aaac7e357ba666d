// Error type shared by every module
mod error;

// framer.json defaults and overrides
mod config;

// Frame rectangle state machine
#[path = "frameEngine/mod.rs"]
mod frame_engine;

// Host window traits and their Tauri implementations
mod host;

// Click-through state and the cross-window relay
mod interactivity;

// Monitor metrics and zoom correction
mod scaling;

// Geometry persistence
mod store;

// Screen-size presets
mod presets;

// Overlay and control surface runtime state
mod state;

// App / OS details
mod sys_info;

use config::{FramerConfig, CONFIG_FILE_NAME};
use frame_engine::{Geometry, PointerTarget};
use host::{CONTROL_LABEL, OVERLAY_LABEL, SET_INTERACTIVE_EVENT};
use presets::PresetLists;
use scaling::{ScaleAdapter, ScaleInfo};
use serde::Serialize;
use state::{
    ControlSurface, FrameGeometryPayload, FrameGesturePayload, FrameState, OverlaySurface,
    ToggleReport, GEOMETRY_CHANGED_EVENT, GESTURE_EVENT,
};
use std::sync::{Arc, Mutex};
use store::{initialize_geometry, GeometrySaver, SettingsStore};
use sys_info::AppInfo;
use tauri::{AppHandle, Emitter, Listener, Manager, State};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Emitted to the control window after every toggle
const FRAME_TOGGLED_EVENT: &str = "frame-toggled";

// Shared between commands, the relay listener and the shortcut handler
struct AppState {
    overlay: Arc<Mutex<OverlaySurface>>,
    // Held across the show/hide pauses, so toggles never interleave
    control: Arc<tokio::sync::Mutex<ControlSurface>>,
    scale: Mutex<ScaleAdapter>,
    saver: GeometrySaver,
}

fn setup_logging() {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("framer_lib={default_level}")));

    // A second run() in the same process keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

fn emit_to_window<S: Serialize + Clone>(app: &AppHandle, label: &str, event: &str, payload: S) {
    if let Err(e) = app.emit_to(label, event, payload) {
        warn!(window = label, event, error = %e, "Failed to emit event");
    }
}

// ===== Frame commands (overlay window) =====

#[tauri::command]
fn pointer_down(
    target: PointerTarget,
    x: f64,
    y: f64,
    app: AppHandle,
    state: State<AppState>,
) -> Result<FrameGesturePayload, String> {
    let mut overlay = state.overlay.lock().map_err(|e| e.to_string())?;
    let payload = overlay.pointer_down(target, x, y).map_err(|e| {
        debug!(?target, x, y, error = %e, "Pointer-down rejected");
        e.to_string()
    })?;

    emit_to_window(&app, OVERLAY_LABEL, GESTURE_EVENT, payload);
    emit_to_window(&app, OVERLAY_LABEL, GEOMETRY_CHANGED_EVENT, overlay.geometry_payload());
    Ok(payload)
}

#[tauri::command]
fn pointer_move(
    x: f64,
    y: f64,
    ctrl: bool,
    app: AppHandle,
    state: State<AppState>,
) -> Result<Option<FrameGeometryPayload>, String> {
    let mut overlay = state.overlay.lock().map_err(|e| e.to_string())?;
    let update = overlay.pointer_move(x, y, ctrl);
    if let Some(payload) = &update {
        emit_to_window(&app, OVERLAY_LABEL, GEOMETRY_CHANGED_EVENT, payload.clone());
    }
    Ok(update)
}

/// Ends the gesture and saves the rectangle in the background
#[tauri::command]
fn pointer_up(app: AppHandle, state: State<AppState>) -> Result<Option<Geometry>, String> {
    let mut overlay = state.overlay.lock().map_err(|e| e.to_string())?;
    let Some((end, payload)) = overlay.pointer_up() else {
        return Ok(None);
    };

    emit_to_window(&app, OVERLAY_LABEL, GESTURE_EVENT, payload);
    state.saver.queue(end.geometry);
    Ok(Some(end.geometry))
}

/// Waits for a running toggle so the click-through state is settled
#[tauri::command]
async fn get_frame_state(app: AppHandle) -> Result<FrameState, String> {
    let state = app.state::<AppState>();
    let interactivity = state.control.lock().await.overlay_interactivity();
    let overlay = state.overlay.lock().map_err(|e| e.to_string())?;
    Ok(overlay.snapshot(interactivity))
}

/// Re-query the monitor, e.g. after the overlay moved to another display
#[tauri::command]
fn refresh_scale(app: AppHandle, state: State<AppState>) -> Result<ScaleInfo, String> {
    let window = app
        .get_webview_window(OVERLAY_LABEL)
        .ok_or_else(|| error::FramerError::WindowNotFound(OVERLAY_LABEL.to_string()).to_string())?;

    let info = state
        .scale
        .lock()
        .map_err(|e| e.to_string())?
        .resolve(&window);
    state
        .overlay
        .lock()
        .map_err(|e| e.to_string())?
        .set_scale(info);
    Ok(info)
}

// ===== Control commands =====

#[tauri::command]
async fn toggle_frame(app: AppHandle) -> Result<ToggleReport, String> {
    switch_frame(&app, None).await
}

#[tauri::command]
fn list_presets(state: State<AppState>) -> Result<PresetLists, String> {
    let overlay = state.overlay.lock().map_err(|e| e.to_string())?;
    Ok(PresetLists::for_monitor(overlay.monitor()))
}

/// Resize the frame to a preset, switching the frame on if it was off
#[tauri::command]
async fn apply_preset(label: String, app: AppHandle) -> Result<Geometry, String> {
    let state = app.state::<AppState>();

    let placement = {
        let mut overlay = state.overlay.lock().map_err(|e| e.to_string())?;
        let preset = presets::find_available(&label, overlay.monitor()).map_err(|e| {
            warn!(label, error = %e, "Preset not applied");
            e.to_string()
        })?;
        let placement = overlay.apply_preset(&preset).map_err(|e| e.to_string())?;
        emit_to_window(&app, OVERLAY_LABEL, GEOMETRY_CHANGED_EVENT, overlay.geometry_payload());
        placement
    };

    state.saver.queue(placement.geometry);

    if placement.needs_activation {
        switch_frame(&app, Some(true)).await?;
    }
    Ok(placement.geometry)
}

#[tauri::command]
fn app_info(app: AppHandle) -> AppInfo {
    AppInfo::collect(app.package_info())
}

/// Show or hide the frame; `None` flips the current state
async fn switch_frame(app: &AppHandle, visible: Option<bool>) -> Result<ToggleReport, String> {
    let state = app.state::<AppState>();
    let overlay = app.get_webview_window(OVERLAY_LABEL);
    let control = app.get_webview_window(CONTROL_LABEL);

    let mut surface = state.control.lock().await;
    let report = match visible {
        Some(visible) => {
            surface
                .set_frame_visible(visible, overlay.as_ref(), control.as_ref(), app)
                .await
        }
        None => {
            surface
                .toggle_frame(overlay.as_ref(), control.as_ref(), app)
                .await
        }
    };
    drop(surface);

    emit_to_window(app, CONTROL_LABEL, FRAME_TOGGLED_EVENT, report);
    Ok(report)
}

// ===== Relay listener (overlay side) =====

fn on_relay_event(app: &AppHandle, payload: &str) {
    let active = match serde_json::from_str::<bool>(payload) {
        Ok(active) => active,
        Err(e) => {
            warn!(payload, error = %e, "Ignoring malformed relay payload");
            return;
        }
    };

    let state = app.state::<AppState>();
    let Ok(mut overlay) = state.overlay.lock() else {
        error!("Overlay state poisoned, relay dropped");
        return;
    };
    if let Some(created) = overlay.on_relay_message(active) {
        info!(geometry = ?created, "Default frame shown");
    }
    emit_to_window(app, OVERLAY_LABEL, GEOMETRY_CHANGED_EVENT, overlay.geometry_payload());
}

fn register_toggle_shortcut(app: &AppHandle, accelerator: &str) {
    let shortcut = match accelerator.parse::<Shortcut>() {
        Ok(shortcut) => shortcut,
        Err(e) => {
            warn!(accelerator, error = %e, "Invalid toggle shortcut, none registered");
            return;
        }
    };
    match app.global_shortcut().register(shortcut) {
        Ok(()) => info!(accelerator, "Toggle shortcut registered"),
        Err(e) => warn!(accelerator, error = %e, "Failed to register toggle shortcut"),
    }
}

fn load_config(app: &AppHandle) -> FramerConfig {
    match app.path().app_config_dir() {
        Ok(dir) => FramerConfig::load_or_default(&dir.join(CONFIG_FILE_NAME)),
        Err(e) => {
            warn!(error = %e, "No app config directory, using default config");
            FramerConfig::default()
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    setup_logging();

    tauri::Builder::default()
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_handler(|app, shortcut, event| {
                    // Only process on key press, not release
                    if event.state != ShortcutState::Pressed {
                        return;
                    }
                    debug!(?shortcut, "Toggle shortcut pressed");

                    let app = app.clone();
                    tauri::async_runtime::spawn(async move {
                        if let Err(e) = switch_frame(&app, None).await {
                            error!(error = %e, "Shortcut toggle failed");
                        }
                    });
                })
                .build(),
        )
        .setup(|app| {
            let handle = app.handle().clone();
            let config = load_config(&handle);
            let store = Arc::new(SettingsStore::open(&handle));

            let overlay_window = app.get_webview_window(OVERLAY_LABEL);
            let control_window = app.get_webview_window(CONTROL_LABEL);

            let mut overlay = OverlaySurface::new(&config);
            let mut control = ControlSurface::new(&config);
            let mut adapter = ScaleAdapter::new(config.zoom_correction);

            match &overlay_window {
                Some(window) => overlay.set_scale(adapter.resolve(window)),
                None => warn!(window = OVERLAY_LABEL, "Overlay window missing at startup"),
            }
            control.initialize_interactivity(control_window.as_ref(), overlay_window.as_ref());

            let geometry = tauri::async_runtime::block_on(initialize_geometry(
                store.as_ref(),
                &config.frame,
                overlay.monitor(),
                overlay.band(),
            ));
            overlay.place(geometry)?;
            let (saver, _worker) = GeometrySaver::spawn(store);

            let scale = overlay.scale();
            let logical_width = scale.physical_width as f64 / scale.scale_factor;
            control.setup_windows(control_window.as_ref(), overlay_window.as_ref(), logical_width);

            app.manage(AppState {
                overlay: Arc::new(Mutex::new(overlay)),
                control: Arc::new(tokio::sync::Mutex::new(control)),
                scale: Mutex::new(adapter),
                saver,
            });

            if let Some(window) = &overlay_window {
                let relay_handle = handle.clone();
                window.listen(SET_INTERACTIVE_EVENT, move |event| {
                    on_relay_event(&relay_handle, event.payload());
                });
            }

            register_toggle_shortcut(&handle, &config.toggle_shortcut);
            info!(app = %AppInfo::collect(handle.package_info()).summary(), "Framer started");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Overlay
            pointer_down,
            pointer_move,
            pointer_up,
            get_frame_state,
            refresh_scale,
            // Control
            toggle_frame,
            list_presets,
            apply_preset,
            app_info,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
