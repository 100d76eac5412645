use crate::models::{HookConfig, PendingCategory};
use crate::reconcile::track;
use crate::services::{host, RunDocuments};
use crate::state::{CounterStore, PlistCounterStore, TriggerFile};
use crate::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

/// Persisted state next to what the documents currently say
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub last_pending: u32,
    pub last_os_updates_pending: u32,
    pub marker_present: bool,
    /// `None` when the documents could not be read
    pub current_pending: Option<u32>,
    pub current_os_updates_pending: Option<u32>,
    pub session_active: bool,
    pub checked_at: DateTime<Utc>,
}

impl StatusReport {
    pub fn gather(config: &HookConfig, counters: &dyn CounterStore) -> Self {
        let current = match (
            RunDocuments::load(config),
            host::os_version(&config.system_version_path),
        ) {
            (Ok(docs), Ok(version)) => Some(track(
                docs.install_info.as_ref(),
                docs.os_updates.as_ref(),
                version,
                config.legacy_os_threshold,
            )),
            _ => None,
        };

        Self {
            last_pending: counters.get(PendingCategory::Regular),
            last_os_updates_pending: counters.get(PendingCategory::OsUpdates),
            marker_present: TriggerFile::new(&config.marker_path).is_present(),
            current_pending: current.map(|c| c.regular),
            current_os_updates_pending: current.map(|c| c.os_updates_raw),
            session_active: host::console_session_active(&config.console_device),
            checked_at: Utc::now(),
        }
    }
}

pub fn run(config: &HookConfig, json: bool) -> Result<()> {
    let counters = PlistCounterStore::new(&config.prefs_path);
    let report = StatusReport::gather(config, &counters);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let describe = |value: Option<u32>| match value {
        Some(v) => v.to_string(),
        None => "unknown".bright_black().to_string(),
    };

    println!("{}", "Pending status".cyan().bold());
    println!();
    println!(
        "   Pending:     {} (last run) / {} (now)",
        report.last_pending,
        describe(report.current_pending)
    );
    println!(
        "   OS updates:  {} (last run) / {} (now)",
        report.last_os_updates_pending,
        describe(report.current_os_updates_pending)
    );

    let marker = if report.marker_present {
        "present".yellow()
    } else {
        "absent".green()
    };
    println!("   Trigger:     {}", marker);
    println!(
        "   Session:     {}",
        if report.session_active { "active" } else { "none" }
    );

    Ok(())
}
