//! Utility functions for the Groxy storage bridge
//!
//! Path normalization and file-URI construction.

use std::path::{Path, PathBuf};

/// Normalize a path for display and URI minting.
/// On Windows: removes \\?\ prefixes and ensures proper separators
pub fn normalize_path(path: &Path) -> PathBuf {
    dunce::simplified(path).to_path_buf()
}

/// Absolute path as the string handed back to the web view.
pub fn display_path(path: &Path) -> String {
    normalize_path(path).to_string_lossy().to_string()
}

/// Build a `file://` URI for a local path, percent-encoding each segment.
///
/// Windows drive paths gain a leading slash (`file:///C:/...`); separators
/// are kept verbatim so the URI stays navigable.
pub fn file_uri(path: &Path) -> String {
    let mut text = normalize_path(path)
        .to_string_lossy()
        .replace('\\', "/");
    if !text.starts_with('/') {
        text.insert(0, '/');
    }

    let encoded = text
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    format!("file://{}", encoded)
}
