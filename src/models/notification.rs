//! Notification actions and pending categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Independently tracked pending counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendingCategory {
    /// Agent-managed installs and removals
    Regular,
    /// Vendor OS updates
    OsUpdates,
}

impl PendingCategory {
    pub const ALL: [PendingCategory; 2] = [PendingCategory::Regular, PendingCategory::OsUpdates];

    /// Key used in the persisted preference domain
    pub fn pref_key(self) -> &'static str {
        match self {
            PendingCategory::Regular => "PendingUpdateCount",
            PendingCategory::OsUpdates => "PendingOSUpdateCount",
        }
    }
}

impl fmt::Display for PendingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingCategory::Regular => write!(f, "regular"),
            PendingCategory::OsUpdates => write!(f, "os-updates"),
        }
    }
}

/// What, if anything, to tell the console user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NotificationAction {
    None,
    NotifyPending { clear_prior: bool },
    NotifyOsUpdatesPending { clear_prior: bool },
    NotifyInstalled { display_name: String, version: String },
}

impl NotificationAction {
    pub fn is_none(&self) -> bool {
        matches!(self, NotificationAction::None)
    }
}

/// Notification type passed to the notifier binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Pending,
    OsUpdates,
    Installed,
}

impl NotificationKind {
    pub fn as_arg(self) -> &'static str {
        match self {
            NotificationKind::Pending => "pending",
            NotificationKind::OsUpdates => "os-updates",
            NotificationKind::Installed => "installed",
        }
    }
}
