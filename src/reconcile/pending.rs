//! Pending-count tracking

use crate::models::{InstallInfo, OsUpdates, OsVersion};

/// Pending counts for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCounts {
    /// Installs plus removals (plus OS updates on legacy systems)
    pub regular: u32,
    /// OS updates tracked as their own category; `None` on legacy systems
    pub os_updates: Option<u32>,
    /// Raw OS-update tally, whichever branch was taken
    pub os_updates_raw: u32,
}

impl PendingCounts {
    /// Everything still pending, for the end-of-run summary only
    pub fn summary_total(&self) -> u32 {
        self.regular.saturating_add(self.os_updates.unwrap_or(0))
    }
}

/// Compute pending counts from the optional install-info and OS-update documents.
///
/// At or below `legacy_threshold` OS updates are folded into the regular count
/// before any decision is made. Above it they stay separate.
pub fn track(
    install_info: Option<&InstallInfo>,
    os_updates: Option<&OsUpdates>,
    os_version: OsVersion,
    legacy_threshold: OsVersion,
) -> PendingCounts {
    let regular = install_info.map(InstallInfo::pending).unwrap_or(0);
    let os_raw = os_updates.map(OsUpdates::pending).unwrap_or(0);

    if os_version.is_legacy(legacy_threshold) {
        PendingCounts {
            regular: regular.saturating_add(os_raw),
            os_updates: None,
            os_updates_raw: os_raw,
        }
    } else {
        PendingCounts {
            regular,
            os_updates: Some(os_raw),
            os_updates_raw: os_raw,
        }
    }
}
