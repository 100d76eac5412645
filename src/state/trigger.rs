//! Logout-install trigger marker
//!
//! The agent only checks whether the file exists; it never reads its content.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TriggerFile {
    path: PathBuf,
}

impl TriggerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_present(&self) -> bool {
        self.path.exists()
    }

    /// Converge the marker to `present`. Returns whether anything changed.
    pub fn ensure(&self, present: bool) -> Result<bool> {
        match (present, self.is_present()) {
            (true, false) => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create directory {}", parent.display())
                    })?;
                }
                fs::File::create(&self.path).with_context(|| {
                    format!("Failed to create trigger file {}", self.path.display())
                })?;
                Ok(true)
            }
            (false, true) => {
                fs::remove_file(&self.path).with_context(|| {
                    format!("Failed to remove trigger file {}", self.path.display())
                })?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
