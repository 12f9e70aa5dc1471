//! Core data types for the Groxy storage bridge
//!
//! These are the payloads that cross the bridge boundary, serialized to
//! JSON text before being handed back to the web view.

use serde::{Deserialize, Serialize};

/// Location of a stored PDF: a shareable URI plus the absolute local path.
///
/// `uri` is either a scoped asset-protocol URL or, when the scope grant
/// fails, a plain `file://` URI. Callers tell the two apart by scheme.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PdfLocation {
    pub uri: String,
    pub path: String,
}

/// Outcome of a mutating operation (project save/delete).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpReport {
    pub success: bool,
}
