//! Read-only documents produced by the management agent
//!
//! Field names follow the agent's property-list keys. Every field defaults so
//! that a report written by an older agent still deserializes.

use serde::{Deserialize, Serialize};

/// Status code the agent records for a successful install or removal
pub const STATUS_SUCCESS: i64 = 0;

/// One entry of `InstallResults`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallResult {
    pub name: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl InstallResult {
    pub fn succeeded(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Display name, falling back to the item identifier
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.name,
        }
    }
}

/// One entry of `RemovalResults`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalResult {
    pub name: String,
    #[serde(default)]
    pub status: i64,
}

impl RemovalResult {
    pub fn succeeded(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Run report written at the end of every agent run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstallReport {
    #[serde(default)]
    pub install_results: Vec<InstallResult>,

    /// Items already present at an equal or newer version
    #[serde(default)]
    pub installed_items: Vec<String>,

    #[serde(default)]
    pub removal_results: Vec<RemovalResult>,

    /// Items already absent from the system
    #[serde(default)]
    pub removed_items: Vec<String>,

    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Pending install/removal tally. Entries are opaque; only their count matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstallInfo {
    #[serde(default)]
    pub managed_installs: Vec<plist::Value>,
    #[serde(default)]
    pub removals: Vec<plist::Value>,
}

impl InstallInfo {
    pub fn pending(&self) -> u32 {
        count(self.managed_installs.len() + self.removals.len())
    }
}

/// Pending OS updates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsUpdates {
    #[serde(rename = "AppleUpdates", default)]
    pub updates: Vec<plist::Value>,
}

impl OsUpdates {
    pub fn pending(&self) -> u32 {
        count(self.updates.len())
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
