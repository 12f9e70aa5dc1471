//! The storage bridge exposed to the web view.
//!
//! Every command returns a JSON-encoded `String` rather than a typed
//! `Result`: the web side parses the text and branches on the presence of
//! an `error` field, so a fault must never surface as a rejected
//! invocation. Internally each operation produces a tagged [`Outcome`]
//! which is serialized to the operation's wire shape - object, array, or
//! bare base64 string - at this boundary and nowhere else.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use tauri::Manager;
use tauri_plugin_opener::OpenerExt;

use crate::share;
use crate::storage;
use crate::types::{OpReport, PdfLocation};
use crate::utils;

/// Cross-command bridge state.
///
/// The Save Gate is process-lifetime only, never persisted: every fresh
/// process starts with project saves denied until an explicit
/// `set_save_permission` call opens it.
#[derive(Default)]
pub struct BridgeState {
    allow_project_save: AtomicBool,
}

/// Tagged result of one bridge call.
enum Outcome {
    Success(serde_json::Value),
    Failure(String),
}

impl Outcome {
    fn success<T: Serialize>(value: &T) -> Outcome {
        match serde_json::to_value(value) {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::Failure(format!("Failed to serialize result: {}", e)),
        }
    }

    /// JSON text for object- and array-shaped operations.
    fn into_json(self) -> String {
        match self {
            Outcome::Success(value) => value.to_string(),
            Outcome::Failure(message) => error_json(&message),
        }
    }

    /// Raw text for `get_pdf_base64`: the success payload is the bare
    /// string, not a JSON-quoted one. Errors keep the object shape so the
    /// caller can still branch on a leading `{`.
    fn into_raw(self) -> String {
        match self {
            Outcome::Success(serde_json::Value::String(text)) => text,
            Outcome::Success(value) => value.to_string(),
            Outcome::Failure(message) => error_json(&message),
        }
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Resolve the storage root under which `Groxy/pdfs` and `Groxy/projects`
/// live.
fn storage_root(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    app.path()
        .app_data_dir()
        .map_err(|e| format!("Failed to resolve app data dir: {}", e))
}

/// Locate a stored PDF and mint its shareable reference.
fn pdf_location(app: &tauri::AppHandle, path: PathBuf) -> PdfLocation {
    PdfLocation {
        uri: share::shareable_uri(app, &path),
        path: utils::display_path(&path),
    }
}

/// Arm or disarm the Save Gate. Side effect only: no return value, no
/// failure mode.
#[tauri::command]
pub fn set_save_permission(state: tauri::State<'_, BridgeState>, allow: bool) {
    state.allow_project_save.store(allow, Ordering::SeqCst);
    log::debug!(
        "project save {}",
        if allow { "allowed" } else { "denied" }
    );
}

/// Persist a base64-encoded PDF and return `{"uri","path"}`.
#[tauri::command]
pub fn save_pdf(app: tauri::AppHandle, filename: String, data: String) -> String {
    log::debug!("save_pdf: {} ({} base64 chars)", filename, data.len());

    let outcome = match storage_root(&app) {
        Ok(root) => match storage::write_pdf(&root, &filename, &data) {
            Ok(path) => Outcome::success(&pdf_location(&app, path)),
            Err(e) => Outcome::Failure(e.to_string()),
        },
        Err(e) => Outcome::Failure(e),
    };
    outcome.into_json()
}

/// Persist a project document, subject to the Save Gate.
///
/// A closed gate is a policy denial, not a fault: the fixed
/// `saveProject blocked` message is returned before any file access.
#[tauri::command]
pub fn save_project(
    app: tauri::AppHandle,
    state: tauri::State<'_, BridgeState>,
    document: String,
) -> String {
    if !state.allow_project_save.load(Ordering::SeqCst) {
        log::warn!("save_project blocked: gate is closed");
        return Outcome::Failure("saveProject blocked".to_string()).into_json();
    }

    let outcome = match storage_root(&app) {
        Ok(root) => match storage::save_project(&root, &document) {
            Ok(path) => {
                log::info!("project saved to {}", path.display());
                Outcome::success(&OpReport { success: true })
            }
            Err(e) => Outcome::Failure(e.to_string()),
        },
        Err(e) => Outcome::Failure(e),
    };
    outcome.into_json()
}

/// Enumerate stored project documents as a JSON array string.
///
/// This operation never takes the error shape: an unreachable storage root
/// degrades to `[]`, matching what callers already expect.
#[tauri::command]
pub fn list_projects(app: tauri::AppHandle) -> String {
    let root = match storage_root(&app) {
        Ok(root) => root,
        Err(e) => {
            log::error!("list_projects: {}", e);
            return "[]".to_string();
        }
    };

    let projects = storage::list_projects(&root);
    log::debug!("list_projects: {} documents", projects.len());
    serde_json::Value::Array(projects).to_string()
}

/// Delete a project document; `{"success":false}` when the id is unknown.
#[tauri::command]
pub fn delete_project(app: tauri::AppHandle, id: String) -> String {
    let outcome = match storage_root(&app) {
        Ok(root) => match storage::delete_project(&root, &id) {
            Ok(deleted) => Outcome::success(&OpReport { success: deleted }),
            Err(e) => Outcome::Failure(e.to_string()),
        },
        Err(e) => Outcome::Failure(e),
    };
    outcome.into_json()
}

/// Shareable reference for an already-stored PDF.
#[tauri::command]
pub fn get_pdf_uri(app: tauri::AppHandle, filename: String) -> String {
    let outcome = match storage_root(&app) {
        Ok(root) => match storage::locate_pdf(&root, &filename) {
            Ok(path) => Outcome::success(&pdf_location(&app, path)),
            Err(e) => Outcome::Failure(e.to_string()),
        },
        Err(e) => Outcome::Failure(e),
    };
    outcome.into_json()
}

/// Read a stored PDF back as bare base64 text, no line wrapping.
#[tauri::command]
pub fn get_pdf_base64(app: tauri::AppHandle, filename: String) -> String {
    let outcome = match storage_root(&app) {
        Ok(root) => match storage::read_pdf(&root, &filename) {
            Ok(bytes) => {
                log::debug!("get_pdf_base64: {} ({} bytes)", filename, bytes.len());
                Outcome::Success(serde_json::Value::String(STANDARD.encode(&bytes)))
            }
            Err(e) => Outcome::Failure(e.to_string()),
        },
        Err(e) => Outcome::Failure(e),
    };
    outcome.into_raw()
}

/// Hand a stored PDF to the platform's default viewer.
#[tauri::command]
pub fn open_pdf(app: tauri::AppHandle, filename: String) -> String {
    let outcome = match storage_root(&app) {
        Ok(root) => match storage::locate_pdf(&root, &filename) {
            Ok(path) => {
                match app
                    .opener()
                    .open_path(path.to_string_lossy(), None::<String>)
                {
                    Ok(()) => Outcome::success(&OpReport { success: true }),
                    Err(e) => Outcome::Failure(format!("Failed to open PDF: {}", e)),
                }
            }
            Err(e) => Outcome::Failure(e.to_string()),
        },
        Err(e) => Outcome::Failure(e),
    };
    outcome.into_json()
}

/// Debug logging from JavaScript - routed into the native log.
#[tauri::command]
pub fn js_log(message: String) {
    log::debug!("JS: {}", message);
}
