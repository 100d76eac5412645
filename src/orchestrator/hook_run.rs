//! One post-run pass: reconcile, decide, notify, persist

use super::director::{decide_os_updates, decide_regular, DecisionInputs};
use super::inventory;
use super::notifier::Notifier;
use super::process_runner::ProcessRunner;
use crate::models::{HookConfig, NotificationAction, PendingCategory};
use crate::parser;
use crate::reconcile::{reconcile_manifest, track};
use crate::services::{HostFacts, LocatedManifest, RunDocuments};
use crate::state::{CounterStore, PreferenceDomain, TriggerFile};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Agent preference holding credentials that must not linger on disk
pub const SENSITIVE_HEADER_KEY: &str = "AdditionalHttpHeaders";

/// What a run did, for the summary line and `--json` output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub installed: u32,
    pub removed: u32,
    /// Regular plus separately tracked OS-update pending items
    pub pending: u32,
    pub warnings: usize,
    pub regular_action: NotificationAction,
    pub os_updates_action: NotificationAction,
    pub marker_present: bool,
    pub notifications_sent: usize,
    pub inventory_attempted: bool,
    pub manifest_rewritten: bool,
    pub finished_at: DateTime<Utc>,
}

/// Everything a run needs, injected by the caller
pub struct HookRun<'a> {
    config: &'a HookConfig,
    counters: &'a mut dyn CounterStore,
    runner: &'a dyn ProcessRunner,
    host: HostFacts,
}

impl<'a> HookRun<'a> {
    pub fn new(
        config: &'a HookConfig,
        counters: &'a mut dyn CounterStore,
        runner: &'a dyn ProcessRunner,
        host: HostFacts,
    ) -> Self {
        Self {
            config,
            counters,
            runner,
            host,
        }
    }

    /// Execute the run.
    ///
    /// Counters and the trigger marker are authoritative and are updated even
    /// when every notifier or inventory call fails.
    pub async fn execute(
        &mut self,
        desired: &LocatedManifest,
        docs: &RunDocuments,
    ) -> Result<RunSummary> {
        let config = self.config;
        let always_notify = config.always_notify_when_pending;
        let session_active = self.host.session_active;
        let dispatch = config.notifier.enabled && session_active;
        let notifier = Notifier::new(&config.notifier, self.runner);
        let mut notifications_sent = 0;

        tracing::debug!(
            os_version = %self.host.os_version,
            session_active,
            source = ?desired.source,
            "Starting run"
        );

        let reconciliation = reconcile_manifest(&desired.manifest, &docs.report);
        let counts = track(
            docs.install_info.as_ref(),
            docs.os_updates.as_ref(),
            self.host.os_version,
            config.legacy_os_threshold,
        );

        // OS updates go first so their notification is not held up by the
        // regular category's grace interval
        let os_updates_action = match counts.os_updates {
            Some(current) => {
                let inputs = DecisionInputs {
                    last: self.counters.get(PendingCategory::OsUpdates),
                    current,
                    always_notify,
                    session_active,
                };
                let action = decide_os_updates(inputs, config.notifier.enabled);
                tracing::debug!(last = inputs.last, current, action = ?action, "OS update decision");
                if dispatch && send(&notifier, &action, current).await {
                    notifications_sent += 1;
                }
                action
            }
            None => NotificationAction::None,
        };

        let inputs = DecisionInputs {
            last: self.counters.get(PendingCategory::Regular),
            current: counts.regular,
            always_notify,
            session_active,
        };
        let decision = decide_regular(inputs);
        tracing::debug!(
            last = inputs.last,
            current = inputs.current,
            action = ?decision.action,
            marker = decision.marker_present,
            "Pending decision"
        );

        let trigger = TriggerFile::new(&config.marker_path);
        if trigger.ensure(decision.marker_present)? {
            tracing::info!(
                path = %trigger.path().display(),
                present = decision.marker_present,
                "Logout install trigger updated"
            );
        }

        if dispatch && !decision.action.is_none() {
            if decision.grace_delay {
                tokio::time::sleep(config.grace_interval()).await;
            }
            if send(&notifier, &decision.action, counts.regular).await {
                notifications_sent += 1;
            }
        }

        if dispatch {
            for completion in &reconciliation.completions {
                if send(&notifier, completion, 0).await {
                    notifications_sent += 1;
                }
            }
        }

        let inventory_attempted = match inventory::update_if_changed(
            &config.inventory,
            self.runner,
            reconciliation.installed,
            reconciliation.removed,
        )
        .await
        {
            Ok(started) => started,
            Err(e) => {
                tracing::warn!(error = %e, "Inventory update failed");
                true
            }
        };

        self.counters
            .set(PendingCategory::Regular, counts.regular)
            .context("Failed to persist pending count")?;
        self.counters
            .set(PendingCategory::OsUpdates, counts.os_updates_raw)
            .context("Failed to persist OS update count")?;

        let manifest_rewritten = desired.source.is_writable() && reconciliation.changed();
        if manifest_rewritten {
            parser::save(&desired.path, &reconciliation.manifest)
                .context("Failed to write desired-state document")?;
        }

        if config.scrub_http_headers {
            let agent_prefs = PreferenceDomain::new(&config.agent_prefs_path);
            match agent_prefs.remove(SENSITIVE_HEADER_KEY) {
                Ok(true) => {
                    tracing::info!(key = SENSITIVE_HEADER_KEY, "Removed sensitive agent preference")
                }
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "Failed to scrub agent preferences"),
            }
        }

        let summary = RunSummary {
            installed: reconciliation.installed,
            removed: reconciliation.removed,
            pending: counts.summary_total(),
            warnings: docs.report.warnings.len(),
            regular_action: decision.action,
            os_updates_action,
            marker_present: decision.marker_present,
            notifications_sent,
            inventory_attempted,
            manifest_rewritten,
            finished_at: Utc::now(),
        };

        tracing::info!(
            installed = summary.installed,
            removed = summary.removed,
            pending = summary.pending,
            warnings = summary.warnings,
            "Run complete"
        );

        Ok(summary)
    }
}

/// Best-effort send. Failures are logged, never propagated.
async fn send(notifier: &Notifier<'_>, action: &NotificationAction, count: u32) -> bool {
    match notifier.send(action, count).await {
        Ok(sent) => sent,
        Err(e) => {
            tracing::warn!(error = %e, "Notification failed");
            false
        }
    }
}
