//! Hook configuration
//!
//! Loaded once at startup from a TOML file and then passed by reference into
//! every component. Nothing downstream reads configuration from anywhere else.

use super::os_version::OsVersion;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/Library/Application Support/postflight/config.toml";

// =============================================================================
// Notifier Configuration
// =============================================================================

/// Desktop notifier integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Whether notifications are dispatched at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Path to the notifier binary
    #[serde(default = "default_notifier_path")]
    pub path: PathBuf,

    /// Notification title
    #[serde(default = "default_title")]
    pub title: String,

    /// Bundle identifier the notification is attributed to
    #[serde(default = "default_sender_id")]
    pub sender_id: String,

    /// Action button shown on pending notifications (none when empty)
    #[serde(default = "default_button_label")]
    pub button_label: Option<String>,

    /// Message templates
    #[serde(default)]
    pub messages: MessageTemplates,
}

fn default_true() -> bool {
    true
}

fn default_notifier_path() -> PathBuf {
    PathBuf::from("/usr/local/bin/yo")
}

fn default_title() -> String {
    "Managed Software Center".to_string()
}

fn default_sender_id() -> String {
    "com.googlecode.munki.ManagedSoftwareCenter".to_string()
}

fn default_button_label() -> Option<String> {
    Some("Update".to_string())
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_notifier_path(),
            title: default_title(),
            sender_id: default_sender_id(),
            button_label: default_button_label(),
            messages: MessageTemplates::default(),
        }
    }
}

/// Message templates. `{count}`, `{name}` and `{version}` are substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageTemplates {
    #[serde(default = "default_pending")]
    pub pending: String,
    #[serde(default = "default_pending_resolved")]
    pub pending_resolved: String,
    #[serde(default = "default_os_updates")]
    pub os_updates: String,
    #[serde(default = "default_os_updates_resolved")]
    pub os_updates_resolved: String,
    #[serde(default = "default_installed")]
    pub installed: String,
}

fn default_pending() -> String {
    "{count} update(s) pending. They will be installed at logout, or open Managed Software Center to install now.".to_string()
}

fn default_pending_resolved() -> String {
    "All pending updates have been installed.".to_string()
}

fn default_os_updates() -> String {
    "{count} macOS update(s) available. Open Software Update to install.".to_string()
}

fn default_os_updates_resolved() -> String {
    "Your macOS updates are complete.".to_string()
}

fn default_installed() -> String {
    "{name} {version} has been installed.".to_string()
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            pending: default_pending(),
            pending_resolved: default_pending_resolved(),
            os_updates: default_os_updates(),
            os_updates_resolved: default_os_updates_resolved(),
            installed: default_installed(),
        }
    }
}

// =============================================================================
// Inventory Configuration
// =============================================================================

/// Inventory update command, run when something was installed or removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Program followed by its arguments
    #[serde(default = "default_inventory_command")]
    pub command: Vec<String>,
}

fn default_inventory_command() -> Vec<String> {
    vec!["/usr/local/bin/jamf".to_string(), "recon".to_string()]
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            command: default_inventory_command(),
        }
    }
}

// =============================================================================
// Hook Configuration
// =============================================================================

/// Top-level hook configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookConfig {
    /// Agent data directory holding reports and manifests
    #[serde(default = "default_agent_dir")]
    pub agent_dir: PathBuf,

    /// Agent binary that must exist before the hook runs
    #[serde(default = "default_agent_binary")]
    pub agent_binary: PathBuf,

    /// Read-only desired-state document used when the managed one is absent
    #[serde(default = "default_static_manifest")]
    pub static_manifest: PathBuf,

    /// Preference domain holding the pending counters
    #[serde(default = "default_prefs_path")]
    pub prefs_path: PathBuf,

    /// Agent preference domain (scrubbed of sensitive headers on request)
    #[serde(default = "default_agent_prefs_path")]
    pub agent_prefs_path: PathBuf,

    /// Marker file that forces an install pass at logout
    #[serde(default = "default_marker_path")]
    pub marker_path: PathBuf,

    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    #[serde(default = "default_system_version_path")]
    pub system_version_path: PathBuf,

    /// Device whose owner identifies the console user
    #[serde(default = "default_console_device")]
    pub console_device: PathBuf,

    /// Re-notify on every run while anything is pending
    #[serde(default)]
    pub always_notify_when_pending: bool,

    /// Delay before replacing a stale pending notification with a resolved one
    #[serde(default = "default_grace_interval_secs")]
    pub grace_interval_secs: u64,

    /// OS versions at or below this fold OS updates into the regular count
    #[serde(default = "default_legacy_os_threshold")]
    pub legacy_os_threshold: OsVersion,

    /// Remove `AdditionalHttpHeaders` from the agent preferences after each run
    #[serde(default)]
    pub scrub_http_headers: bool,

    #[serde(default)]
    pub notifier: NotifierConfig,

    #[serde(default)]
    pub inventory: InventoryConfig,
}

fn default_agent_dir() -> PathBuf {
    PathBuf::from("/Library/Managed Installs")
}

fn default_agent_binary() -> PathBuf {
    PathBuf::from("/usr/local/munki/managedsoftwareupdate")
}

fn default_static_manifest() -> PathBuf {
    PathBuf::from("/Library/Managed Installs/manifests/site_default")
}

fn default_prefs_path() -> PathBuf {
    PathBuf::from("/Library/Preferences/com.postflight.pending.plist")
}

fn default_agent_prefs_path() -> PathBuf {
    PathBuf::from("/Library/Preferences/ManagedInstalls.plist")
}

fn default_marker_path() -> PathBuf {
    PathBuf::from("/Users/Shared/.com.googlecode.munki.checkandinstallatlogout")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("/Library/Logs/postflight.log")
}

fn default_system_version_path() -> PathBuf {
    PathBuf::from("/System/Library/CoreServices/SystemVersion.plist")
}

fn default_console_device() -> PathBuf {
    PathBuf::from("/dev/console")
}

fn default_grace_interval_secs() -> u64 {
    5
}

fn default_legacy_os_threshold() -> OsVersion {
    OsVersion::new(10, 14)
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            agent_dir: default_agent_dir(),
            agent_binary: default_agent_binary(),
            static_manifest: default_static_manifest(),
            prefs_path: default_prefs_path(),
            agent_prefs_path: default_agent_prefs_path(),
            marker_path: default_marker_path(),
            log_path: default_log_path(),
            system_version_path: default_system_version_path(),
            console_device: default_console_device(),
            always_notify_when_pending: false,
            grace_interval_secs: default_grace_interval_secs(),
            legacy_os_threshold: default_legacy_os_threshold(),
            scrub_http_headers: false,
            notifier: NotifierConfig::default(),
            inventory: InventoryConfig::default(),
        }
    }
}

impl HookConfig {
    /// Load config from a TOML file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: HookConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Config rooted at `dir`: every path points inside it
    pub fn rooted_at(dir: &Path) -> Self {
        let agent_dir = dir.join("Managed Installs");
        Self {
            static_manifest: agent_dir.join("manifests/site_default"),
            agent_dir,
            agent_binary: dir.join("managedsoftwareupdate"),
            prefs_path: dir.join("Preferences/com.postflight.pending.plist"),
            agent_prefs_path: dir.join("Preferences/ManagedInstalls.plist"),
            marker_path: dir.join("Shared/.checkandinstallatlogout"),
            log_path: dir.join("Logs/postflight.log"),
            system_version_path: dir.join("SystemVersion.plist"),
            console_device: dir.join("console"),
            ..Self::default()
        }
    }

    pub fn grace_interval(&self) -> Duration {
        Duration::from_secs(self.grace_interval_secs)
    }

    pub fn install_info_path(&self) -> PathBuf {
        self.agent_dir.join("InstallInfo.plist")
    }

    pub fn os_updates_path(&self) -> PathBuf {
        self.agent_dir.join("AppleUpdates.plist")
    }

    pub fn report_path(&self) -> PathBuf {
        self.agent_dir.join("ManagedInstallReport.plist")
    }

    /// Desired-state document maintained by the agent's self-service app
    pub fn managed_manifest_path(&self) -> PathBuf {
        self.agent_dir.join("manifests/SelfServeManifest")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = HookConfig::load(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(config, HookConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_the_rest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
always_notify_when_pending = true
grace_interval_secs = 0
legacy_os_threshold = "10.13"

[notifier]
title = "IT Updates"
"#,
        )
        .unwrap();

        let config = HookConfig::load(&path).unwrap();
        assert!(config.always_notify_when_pending);
        assert_eq!(config.grace_interval(), Duration::ZERO);
        assert_eq!(config.legacy_os_threshold, OsVersion::new(10, 13));
        assert_eq!(config.notifier.title, "IT Updates");
        assert_eq!(config.notifier.sender_id, default_sender_id());
        assert!(config.notifier.enabled);
        assert_eq!(config.inventory.command, default_inventory_command());
    }

    #[test]
    fn test_invalid_threshold_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "legacy_os_threshold = \"ten\"\n").unwrap();
        assert!(HookConfig::load(&path).is_err());
    }

    #[test]
    fn test_derived_paths() {
        let config = HookConfig::rooted_at(Path::new("/tmp/x"));
        assert_eq!(
            config.report_path(),
            PathBuf::from("/tmp/x/Managed Installs/ManagedInstallReport.plist")
        );
        assert_eq!(
            config.managed_manifest_path(),
            PathBuf::from("/tmp/x/Managed Installs/manifests/SelfServeManifest")
        );
    }
}
