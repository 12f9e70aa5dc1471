//! Groxy native storage bridge.
//!
//! The native side of a hybrid web-view app: the UI runs in the webview
//! and calls a small fixed set of commands for PDF and project
//! persistence against the app's private data directory. Each call is a
//! synchronous request/response; results travel back as JSON text.

use tauri::Manager;

/// The storage bridge commands exposed to the web view
mod bridge;

/// Shareable-reference minting for stored PDFs
mod share;

/// Filesystem core: PDF blobs and project documents
mod storage;

/// Bridge boundary data types
mod types;
pub use types::{OpReport, PdfLocation};

/// Path and URI helpers
mod utils;

pub fn run() {
    // RUST_LOG takes precedence; default keeps our own diagnostics visible
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            app.manage(bridge::BridgeState::default());

            let root = app.path().app_data_dir()?;
            log::info!("storage root: {}", root.display());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            bridge::set_save_permission,
            bridge::save_pdf,
            bridge::save_project,
            bridge::list_projects,
            bridge::delete_project,
            bridge::get_pdf_uri,
            bridge::get_pdf_base64,
            bridge::open_pdf,
            bridge::js_log,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Groxy storage bridge");
}
