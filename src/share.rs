//! Shareable references for stored PDFs.
//!
//! The webview cannot load arbitrary local files, so exposing a stored PDF
//! means granting it to the asset protocol scope and handing back the
//! corresponding asset URL - a scoped grant the app can later revoke, the
//! Tauri analogue of a platform file-sharing authority. When the grant
//! fails the caller still gets a usable reference, just a plain `file://`
//! URI; the two classes are distinguishable by scheme alone.

use std::path::Path;

use tauri::Manager;

use crate::utils;

/// Mint a URL the webview (and external viewers) can open for `path`.
///
/// Tries the scoped asset protocol first, falls back to a direct file URI.
pub fn shareable_uri(app: &tauri::AppHandle, path: &Path) -> String {
    match app.asset_protocol_scope().allow_file(path) {
        Ok(()) => asset_url(path),
        Err(e) => {
            log::warn!(
                "asset scope grant failed for {}: {}; using file URI",
                path.display(),
                e
            );
            utils::file_uri(path)
        }
    }
}

/// Asset protocol URL for a local path.
///
/// Windows and Android resolve custom protocols through
/// `http://<scheme>.localhost`; everywhere else it is `<scheme>://localhost`.
/// The whole path is encoded as a single component, matching what
/// `convertFileSrc` produces on the web side.
fn asset_url(path: &Path) -> String {
    let text = utils::normalize_path(path).to_string_lossy().into_owned();
    let encoded = urlencoding::encode(&text);

    #[cfg(any(windows, target_os = "android"))]
    {
        format!("http://asset.localhost/{}", encoded)
    }
    #[cfg(not(any(windows, target_os = "android")))]
    {
        format!("asset://localhost/{}", encoded)
    }
}
