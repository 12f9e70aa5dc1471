//! Filesystem core of the storage bridge.
//!
//! This module handles persistent storage for Groxy:
//! - PDF blobs (Groxy/pdfs/<filename>)
//! - Project documents (Groxy/projects/<id>.json)
//!
//! Every operation takes the storage root explicitly so it can be exercised
//! against a temporary directory in tests; the command layer resolves the
//! root from the app data dir.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

/// Subdirectory for PDF blobs, relative to the storage root.
pub const PDFS_DIR: &str = "Groxy/pdfs";

/// Subdirectory for project documents, relative to the storage root.
pub const PROJECTS_DIR: &str = "Groxy/projects";

/// File suffix of project documents.
const PROJECT_SUFFIX: &str = ".json";

#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested file does not exist. The message is part of the wire
    /// contract: callers match on it verbatim.
    #[error("File not found")]
    NotFound,

    /// The caller handed us something unusable: an empty argument,
    /// malformed base64, or a document without a string `id`.
    #[error("{0}")]
    Invalid(String),

    /// Underlying filesystem failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl StorageError {
    fn io(context: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
        move |source| StorageError::Io {
            context: context.to_string(),
            source,
        }
    }
}

/// Path of a PDF blob. The filename is caller-supplied and used verbatim;
/// saving the same name twice overwrites (last write wins).
pub fn pdf_path(root: &Path, filename: &str) -> PathBuf {
    root.join(PDFS_DIR).join(filename)
}

/// Path of a project document, derived solely from its `id`.
pub fn project_path(root: &Path, id: &str) -> PathBuf {
    root.join(PROJECTS_DIR).join(format!("{}{}", id, PROJECT_SUFFIX))
}

/// Decode and persist a PDF, creating the directory on first write.
/// Returns the absolute path of the written file.
pub fn write_pdf(root: &Path, filename: &str, base64_data: &str) -> Result<PathBuf, StorageError> {
    if filename.is_empty() || base64_data.is_empty() {
        return Err(StorageError::Invalid(
            "Filename and data are required".to_string(),
        ));
    }

    let bytes = STANDARD
        .decode(base64_data.trim())
        .map_err(|e| StorageError::Invalid(format!("Invalid base64 data: {}", e)))?;

    let dir = root.join(PDFS_DIR);
    std::fs::create_dir_all(&dir).map_err(StorageError::io("Failed to create PDF directory"))?;

    let path = dir.join(filename);
    std::fs::write(&path, &bytes).map_err(StorageError::io("Failed to save PDF"))?;

    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

/// Resolve a stored PDF to its path, failing if it does not exist.
pub fn locate_pdf(root: &Path, filename: &str) -> Result<PathBuf, StorageError> {
    let path = pdf_path(root, filename);
    if !path.exists() {
        return Err(StorageError::NotFound);
    }
    Ok(path)
}

/// Read a stored PDF back as raw bytes.
pub fn read_pdf(root: &Path, filename: &str) -> Result<Vec<u8>, StorageError> {
    let path = locate_pdf(root, filename)?;
    std::fs::read(&path).map_err(StorageError::io("Failed to read PDF"))
}

/// Persist a project document under `<id>.json`, overwriting any prior file.
///
/// The raw text is written verbatim (not re-serialized) so the caller's
/// field order and formatting survive a round trip.
pub fn save_project(root: &Path, document: &str) -> Result<PathBuf, StorageError> {
    let id = document_id(document)?;

    let dir = root.join(PROJECTS_DIR);
    std::fs::create_dir_all(&dir)
        .map_err(StorageError::io("Failed to create project directory"))?;

    let path = dir.join(format!("{}{}", id, PROJECT_SUFFIX));
    std::fs::write(&path, document.as_bytes()).map_err(StorageError::io("Failed to save project"))?;

    log::debug!("project {} saved to {}", id, path.display());
    Ok(path)
}

/// Extract the mandatory string `id` from a project document.
fn document_id(document: &str) -> Result<String, StorageError> {
    let value: serde_json::Value = serde_json::from_str(document)
        .map_err(|e| StorageError::Invalid(format!("Invalid project JSON: {}", e)))?;

    match value.get("id").and_then(|id| id.as_str()) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(StorageError::Invalid(
            "Project document has no string \"id\"".to_string(),
        )),
    }
}

/// Enumerate all parseable project documents.
///
/// Files that cannot be read or do not parse as a JSON object are skipped
/// (logged, not surfaced) so one corrupt document cannot hide the rest.
/// An absent directory yields an empty list. Order follows the directory
/// enumeration and must not be assumed sorted.
pub fn list_projects(root: &Path) -> Vec<serde_json::Value> {
    let dir = root.join(PROJECTS_DIR);
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut projects = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let is_document = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(PROJECT_SUFFIX))
            .unwrap_or(false);
        if !is_document {
            continue;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("skipping unreadable project file {}: {}", path.display(), e);
                continue;
            }
        };

        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(value) if value.is_object() => projects.push(value),
            Ok(_) => {
                log::warn!("skipping non-object project file {}", path.display());
            }
            Err(e) => {
                log::warn!(
                    "skipping unparseable project file {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    projects
}

/// Delete a project document. Returns `Ok(false)` when no such file exists;
/// that is a reportable outcome, not an error.
pub fn delete_project(root: &Path, id: &str) -> Result<bool, StorageError> {
    let path = project_path(root, id);
    if !path.exists() {
        return Ok(false);
    }

    std::fs::remove_file(&path).map_err(StorageError::io("Failed to delete project"))?;
    log::debug!("project {} deleted", id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> tempfile::TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[test]
    fn pdf_round_trip() {
        let root = temp_root();
        let original: &[u8] = b"%PDF-1.4 fake document body";
        let encoded = STANDARD.encode(original);

        let path = write_pdf(root.path(), "a.pdf", &encoded).unwrap();
        assert_eq!(path, root.path().join("Groxy/pdfs/a.pdf"));

        let bytes = read_pdf(root.path(), "a.pdf").unwrap();
        assert_eq!(bytes, original);
    }

    #[test]
    fn pdf_same_filename_overwrites() {
        let root = temp_root();
        write_pdf(root.path(), "a.pdf", &STANDARD.encode(b"first")).unwrap();
        write_pdf(root.path(), "a.pdf", &STANDARD.encode(b"second")).unwrap();

        assert_eq!(read_pdf(root.path(), "a.pdf").unwrap(), b"second");
    }

    #[test]
    fn write_pdf_rejects_empty_arguments() {
        let root = temp_root();
        let err = write_pdf(root.path(), "", "QUJD").unwrap_err();
        assert_eq!(err.to_string(), "Filename and data are required");

        let err = write_pdf(root.path(), "a.pdf", "").unwrap_err();
        assert_eq!(err.to_string(), "Filename and data are required");
    }

    #[test]
    fn write_pdf_rejects_malformed_base64() {
        let root = temp_root();
        let err = write_pdf(root.path(), "a.pdf", "not*valid*base64").unwrap_err();
        assert!(err.to_string().starts_with("Invalid base64 data"));
        // Nothing may be written on a decode failure
        assert!(!root.path().join("Groxy/pdfs/a.pdf").exists());
    }

    #[test]
    fn missing_pdf_is_not_found() {
        let root = temp_root();
        assert_eq!(
            read_pdf(root.path(), "absent.pdf").unwrap_err().to_string(),
            "File not found"
        );
        assert_eq!(
            locate_pdf(root.path(), "absent.pdf")
                .unwrap_err()
                .to_string(),
            "File not found"
        );
    }

    #[test]
    fn save_project_writes_raw_text() {
        let root = temp_root();
        // Deliberately odd formatting; it must survive byte-for-byte
        let document = "{\"id\": \"p1\",  \"name\":\"Walls\",\"data\":{\"width\":4.5}}";

        let path = save_project(root.path(), document).unwrap();
        assert_eq!(path, root.path().join("Groxy/projects/p1.json"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), document);
    }

    #[test]
    fn save_project_same_id_overwrites() {
        let root = temp_root();
        save_project(root.path(), r#"{"id":"p1","rev":1}"#).unwrap();
        save_project(root.path(), r#"{"id":"p1","rev":2}"#).unwrap();

        let listed = list_projects(root.path());
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["rev"], 2);
    }

    #[test]
    fn save_project_requires_string_id() {
        let root = temp_root();

        let err = save_project(root.path(), r#"{"name":"no id"}"#).unwrap_err();
        assert!(err.to_string().contains("id"));

        let err = save_project(root.path(), r#"{"id":42}"#).unwrap_err();
        assert!(err.to_string().contains("id"));

        let err = save_project(root.path(), "not json at all").unwrap_err();
        assert!(err.to_string().starts_with("Invalid project JSON"));
    }

    #[test]
    fn saved_project_appears_in_listing() {
        let root = temp_root();
        let document = r#"{"id":"p9","name":"Listed","data":{"width":1}}"#;
        save_project(root.path(), document).unwrap();

        let listed = list_projects(root.path());
        assert_eq!(listed.len(), 1);
        let expected: serde_json::Value = serde_json::from_str(document).unwrap();
        assert_eq!(listed[0], expected);
    }

    #[test]
    fn list_projects_on_absent_dir_is_empty() {
        let root = temp_root();
        assert!(list_projects(root.path()).is_empty());
    }

    #[test]
    fn list_projects_skips_corrupt_files() {
        let root = temp_root();
        save_project(root.path(), r#"{"id":"p1","name":"one"}"#).unwrap();
        save_project(root.path(), r#"{"id":"p2","name":"two"}"#).unwrap();

        let dir = root.path().join(PROJECTS_DIR);
        std::fs::write(dir.join("broken.json"), "{ truncated").unwrap();
        std::fs::write(dir.join("array.json"), "[1,2,3]").unwrap();
        std::fs::write(dir.join("notes.txt"), "not a project").unwrap();

        let mut names: Vec<String> = list_projects(root.path())
            .into_iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["one", "two"]);
    }

    #[test]
    fn delete_project_reports_outcome() {
        let root = temp_root();
        save_project(root.path(), r#"{"id":"p1"}"#).unwrap();

        assert!(delete_project(root.path(), "p1").unwrap());
        assert!(!root.path().join("Groxy/projects/p1.json").exists());
        assert!(list_projects(root.path()).is_empty());

        // Absent id is a false outcome, not an error
        assert!(!delete_project(root.path(), "p1").unwrap());
        assert!(!delete_project(root.path(), "never-existed").unwrap());
    }
}
