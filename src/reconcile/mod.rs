//! Reconciliation of desired state against the agent's run report
//!
//! Both entry points are pure functions:
//! - [`reconcile_manifest`] drops satisfied install/uninstall requests
//! - [`pending::track`] computes the current pending counts

pub mod pending;

pub use pending::{track, PendingCounts};

use crate::models::manifest::remove_item;
use crate::models::{InstallReport, NotificationAction, SelfServeManifest};

/// Outcome of reconciling one manifest against one report
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Manifest with satisfied requests removed
    pub manifest: SelfServeManifest,
    pub installed: u32,
    pub removed: u32,
    /// One `NotifyInstalled` per install result that completed a request
    pub completions: Vec<NotificationAction>,
}

impl Reconciliation {
    /// Whether any request was satisfied, i.e. the manifest needs rewriting
    pub fn changed(&self) -> bool {
        self.installed > 0 || self.removed > 0
    }
}

/// Remove every request the report shows as satisfied.
///
/// An identifier leaves the working set at most once, so an item that shows up
/// both as a successful result and in the "already done" list is counted once.
pub fn reconcile_manifest(manifest: &SelfServeManifest, report: &InstallReport) -> Reconciliation {
    let mut working = manifest.clone();
    let mut installed = 0;
    let mut removed = 0;
    let mut completions = Vec::new();

    for result in report.install_results.iter().filter(|r| r.succeeded()) {
        if remove_item(&mut working.managed_installs, &result.name) {
            installed += 1;
            completions.push(NotificationAction::NotifyInstalled {
                display_name: result.label().to_string(),
                version: result.version.clone().unwrap_or_default(),
            });
        }
    }

    // Equal or newer version already on disk: satisfied, but nothing to announce
    for name in &report.installed_items {
        if remove_item(&mut working.managed_installs, name) {
            installed += 1;
        }
    }

    for result in report.removal_results.iter().filter(|r| r.succeeded()) {
        if remove_item(&mut working.managed_uninstalls, &result.name) {
            removed += 1;
        }
    }

    for name in &report.removed_items {
        if remove_item(&mut working.managed_uninstalls, name) {
            removed += 1;
        }
    }

    Reconciliation {
        manifest: working,
        installed,
        removed,
        completions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InstallResult, RemovalResult};

    fn install(name: &str, status: i64, display: &str, version: &str) -> InstallResult {
        InstallResult {
            name: name.to_string(),
            status,
            display_name: Some(display.to_string()),
            version: Some(version.to_string()),
        }
    }

    fn removal(name: &str, status: i64) -> RemovalResult {
        RemovalResult {
            name: name.to_string(),
            status,
        }
    }

    #[test]
    fn test_successful_install_is_removed_and_announced() {
        let manifest = SelfServeManifest::new(&["A", "B"], &[]);
        let report = InstallReport {
            install_results: vec![install("A", 0, "App A", "1.0")],
            ..Default::default()
        };

        let outcome = reconcile_manifest(&manifest, &report);

        assert_eq!(outcome.manifest.managed_installs, vec!["B"]);
        assert_eq!(outcome.installed, 1);
        assert_eq!(
            outcome.completions,
            vec![NotificationAction::NotifyInstalled {
                display_name: "App A".to_string(),
                version: "1.0".to_string(),
            }]
        );
        assert!(outcome.changed());
    }

    #[test]
    fn test_failed_install_is_kept() {
        let manifest = SelfServeManifest::new(&["A"], &[]);
        let report = InstallReport {
            install_results: vec![install("A", 1, "App A", "1.0")],
            ..Default::default()
        };

        let outcome = reconcile_manifest(&manifest, &report);

        assert_eq!(outcome.manifest.managed_installs, vec!["A"]);
        assert_eq!(outcome.installed, 0);
        assert!(outcome.completions.is_empty());
        assert!(!outcome.changed());
    }

    #[test]
    fn test_result_for_unrequested_item_is_ignored() {
        let manifest = SelfServeManifest::new(&["B"], &[]);
        let report = InstallReport {
            install_results: vec![install("A", 0, "App A", "1.0")],
            ..Default::default()
        };

        let outcome = reconcile_manifest(&manifest, &report);
        assert_eq!(outcome.manifest.managed_installs, vec!["B"]);
        assert_eq!(outcome.installed, 0);
        assert!(outcome.completions.is_empty());
    }

    #[test]
    fn test_already_installed_is_removed_silently() {
        let manifest = SelfServeManifest::new(&["A", "B", "C"], &[]);
        let report = InstallReport {
            installed_items: vec!["B".to_string()],
            ..Default::default()
        };

        let outcome = reconcile_manifest(&manifest, &report);
        assert_eq!(outcome.manifest.managed_installs, vec!["A", "C"]);
        assert_eq!(outcome.installed, 1);
        assert!(outcome.completions.is_empty());
    }

    #[test]
    fn test_item_in_result_and_installed_list_counts_once() {
        let manifest = SelfServeManifest::new(&["A"], &[]);
        let report = InstallReport {
            install_results: vec![install("A", 0, "App A", "2.0")],
            installed_items: vec!["A".to_string()],
            ..Default::default()
        };

        let outcome = reconcile_manifest(&manifest, &report);
        assert!(outcome.manifest.managed_installs.is_empty());
        assert_eq!(outcome.installed, 1);
        assert_eq!(outcome.completions.len(), 1);
    }

    #[test]
    fn test_uninstalls_mirror_installs_without_notifications() {
        let manifest = SelfServeManifest::new(&[], &["X", "Y", "Z"]);
        let report = InstallReport {
            removal_results: vec![removal("X", 0), removal("Y", -1)],
            removed_items: vec!["X".to_string(), "Z".to_string()],
            ..Default::default()
        };

        let outcome = reconcile_manifest(&manifest, &report);
        assert_eq!(outcome.manifest.managed_uninstalls, vec!["Y"]);
        assert_eq!(outcome.removed, 2);
        assert!(outcome.completions.is_empty());
    }

    #[test]
    fn test_reconciling_twice_is_idempotent() {
        let manifest = SelfServeManifest::new(&["A", "B"], &["X"]);
        let report = InstallReport {
            install_results: vec![install("A", 0, "App A", "1.0")],
            removal_results: vec![removal("X", 0)],
            ..Default::default()
        };

        let first = reconcile_manifest(&manifest, &report);
        let second = reconcile_manifest(&first.manifest, &report);

        assert_eq!(second.manifest, first.manifest);
        assert_eq!(second.installed, 0);
        assert_eq!(second.removed, 0);
        assert!(second.completions.is_empty());
        assert!(!second.changed());
    }

    #[test]
    fn test_missing_version_announces_empty_version() {
        let manifest = SelfServeManifest::new(&["A"], &[]);
        let report = InstallReport {
            install_results: vec![InstallResult {
                name: "A".to_string(),
                status: 0,
                display_name: None,
                version: None,
            }],
            ..Default::default()
        };

        let outcome = reconcile_manifest(&manifest, &report);
        assert_eq!(
            outcome.completions,
            vec![NotificationAction::NotifyInstalled {
                display_name: "A".to_string(),
                version: String::new(),
            }]
        );
    }
}
