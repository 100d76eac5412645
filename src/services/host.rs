//! Host probes: privilege, console session, OS version

use crate::models::OsVersion;
use crate::parser;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Facts about the machine gathered once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostFacts {
    pub os_version: OsVersion,
    /// A real user (not the login window) owns the console
    pub session_active: bool,
}

/// Whether the process runs with an effective uid of 0
#[cfg(unix)]
pub fn is_elevated() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_elevated() -> bool {
    false
}

/// Whether a user is logged in at the console.
///
/// The console device is owned by root while the login window is showing and
/// by the logged-in user otherwise.
#[cfg(unix)]
pub fn console_session_active(console_device: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match std::fs::metadata(console_device) {
        Ok(meta) => meta.uid() != 0,
        Err(e) => {
            tracing::debug!(device = %console_device.display(), error = %e, "Console device unavailable");
            false
        }
    }
}

#[cfg(not(unix))]
pub fn console_session_active(_console_device: &Path) -> bool {
    false
}

#[derive(Debug, Deserialize)]
struct SystemVersion {
    #[serde(rename = "ProductVersion")]
    product_version: String,
}

/// Read the running OS version from the system version document
pub fn os_version(system_version_path: &Path) -> Result<OsVersion> {
    let doc: SystemVersion = parser::load(system_version_path)
        .context("Failed to determine the OS version")?;
    doc.product_version
        .parse()
        .with_context(|| format!("Unexpected ProductVersion in {}", system_version_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_system_version(path: &Path, version: &str) {
        std::fs::write(
            path,
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>ProductName</key>
    <string>macOS</string>
    <key>ProductVersion</key>
    <string>{}</string>
</dict>
</plist>"#,
                version
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_os_version_from_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("SystemVersion.plist");
        write_system_version(&path, "10.13.6");
        assert_eq!(os_version(&path).unwrap(), OsVersion::new(10, 13));
    }

    #[test]
    fn test_os_version_missing_document() {
        let temp = TempDir::new().unwrap();
        let err = os_version(&temp.path().join("SystemVersion.plist")).unwrap_err();
        assert!(err.to_string().contains("OS version"));
    }

    #[test]
    fn test_os_version_bad_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("SystemVersion.plist");
        write_system_version(&path, "unknown");
        assert!(os_version(&path).is_err());
    }

    #[test]
    fn test_missing_console_device_means_no_session() {
        let temp = TempDir::new().unwrap();
        assert!(!console_session_active(&temp.path().join("console")));
    }
}
