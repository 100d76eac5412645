//! Locating and loading the agent's documents

use crate::models::{HookConfig, InstallInfo, InstallReport, ManifestSource, OsUpdates, SelfServeManifest};
use crate::parser::{self, DocumentError};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Desired-state document together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedManifest {
    pub manifest: SelfServeManifest,
    pub source: ManifestSource,
    pub path: PathBuf,
}

/// Reasons the hook refuses to start
#[derive(Debug, thiserror::Error)]
pub enum PreconditionError {
    #[error("postflight must be run as root")]
    NotElevated,

    #[error("Agent binary not found at {0}")]
    AgentMissing(PathBuf),

    #[error("No desired-state document at {managed} or {fallback}")]
    NoManifest { managed: PathBuf, fallback: PathBuf },

    #[error("Desired-state document is unusable")]
    ManifestUnreadable(#[source] DocumentError),
}

/// Find the desired-state document, preferring the agent-managed one
pub fn locate_manifest(config: &HookConfig) -> Result<LocatedManifest, PreconditionError> {
    let candidates = [
        (config.managed_manifest_path(), ManifestSource::Managed),
        (config.static_manifest.clone(), ManifestSource::Static),
    ];

    for (path, source) in candidates {
        match parser::load::<SelfServeManifest>(&path) {
            Ok(manifest) => {
                return Ok(LocatedManifest {
                    manifest,
                    source,
                    path,
                })
            }
            Err(DocumentError::NotFound(_)) => continue,
            Err(e) => return Err(PreconditionError::ManifestUnreadable(e)),
        }
    }

    Err(PreconditionError::NoManifest {
        managed: config.managed_manifest_path(),
        fallback: config.static_manifest.clone(),
    })
}

/// Report and pending artifacts for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunDocuments {
    pub report: InstallReport,
    pub install_info: Option<InstallInfo>,
    pub os_updates: Option<OsUpdates>,
}

impl RunDocuments {
    /// Load everything the run reads besides the manifest.
    ///
    /// Absent documents are fine; unparsable ones are errors.
    pub fn load(config: &HookConfig) -> Result<Self> {
        let report_path = config.report_path();
        let report = parser::load_optional::<InstallReport>(&report_path)
            .context("Failed to load the run report")?
            .unwrap_or_else(|| {
                tracing::warn!(path = %report_path.display(), "No run report, nothing to reconcile");
                InstallReport::default()
            });

        let install_info = parser::load_optional(&config.install_info_path())
            .context("Failed to load install info")?;
        let os_updates = parser::load_optional(&config.os_updates_path())
            .context("Failed to load OS updates")?;

        Ok(Self {
            report,
            install_info,
            os_updates,
        })
    }
}
