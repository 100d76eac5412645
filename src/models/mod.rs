pub mod config;
pub mod manifest;
pub mod notification;
pub mod os_version;
pub mod report;

pub use config::{HookConfig, InventoryConfig, MessageTemplates, NotifierConfig};
pub use manifest::{ManifestSource, SelfServeManifest};
pub use notification::{NotificationAction, NotificationKind, PendingCategory};
pub use os_version::OsVersion;
pub use report::{InstallInfo, InstallReport, InstallResult, OsUpdates, RemovalResult};
