//! Property-list document I/O
//!
//! Agent documents are read with serde through the `plist` crate. Writes go
//! through a temp file in the same directory and are persisted atomically.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur reading or writing a property-list document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },

    #[error("Failed to serialize '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
}

/// Load a required document
pub fn load<T: DeserializeOwned>(path: &Path) -> DocumentResult<T> {
    if !path.exists() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    plist::from_bytes(&bytes).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a document that may legitimately be absent
pub fn load_optional<T: DeserializeOwned>(path: &Path) -> DocumentResult<Option<T>> {
    match load(path) {
        Ok(doc) => Ok(Some(doc)),
        Err(DocumentError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write a document as XML, replacing any existing file atomically
pub fn save<T: Serialize>(path: &Path, doc: &T) -> DocumentResult<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| DocumentError::InvalidPath(path.to_path_buf()))?;

    let write_err = |source: std::io::Error| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(parent).map_err(write_err)?;

    let mut buffer = Vec::new();
    plist::to_writer_xml(&mut buffer, doc).map_err(|source| DocumentError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let mut temp_file = NamedTempFile::new_in(parent).map_err(write_err)?;
    temp_file.write_all(&buffer).map_err(write_err)?;
    temp_file.flush().map_err(write_err)?;
    temp_file
        .persist(path)
        .map_err(|e| write_err(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelfServeManifest;
    use tempfile::TempDir;

    #[test]
    fn test_load_optional_absent() {
        let temp = TempDir::new().unwrap();
        let doc: Option<SelfServeManifest> =
            load_optional(&temp.path().join("missing.plist")).unwrap();
        assert!(doc.is_none());
    }

    #[test]
    fn test_load_required_absent_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load::<SelfServeManifest>(&temp.path().join("missing.plist")).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.plist");
        fs::write(&path, "this is not a plist").unwrap();

        let err = load_optional::<SelfServeManifest>(&path).unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifests/SelfServeManifest");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>managed_installs</key>
    <array><string>Firefox</string><string>Slack</string></array>
    <key>optional_installs</key>
    <array><string>Zoom</string></array>
</dict>
</plist>"#,
        )
        .unwrap();

        let mut manifest: SelfServeManifest = load(&path).unwrap();
        assert!(manifest.managed_uninstalls.is_empty());
        manifest.managed_installs.retain(|i| i != "Firefox");
        save(&path, &manifest).unwrap();

        let reloaded: SelfServeManifest = load(&path).unwrap();
        assert_eq!(reloaded.managed_installs, vec!["Slack"]);
        assert!(reloaded.extra.contains_key("optional_installs"));
    }
}
