use crate::models::HookConfig;
use crate::orchestrator::{HookRun, SystemProcessRunner};
use crate::services::host;
use crate::services::{locate_manifest, HostFacts, PreconditionError, RunDocuments};
use crate::state::PlistCounterStore;
use crate::Result;
use colored::Colorize;

/// Check startup preconditions, then run one post-run pass
pub async fn run(config: &HookConfig, skip_root_check: bool, json: bool) -> Result<()> {
    if !skip_root_check && !host::is_elevated() {
        return Err(PreconditionError::NotElevated.into());
    }

    if !config.agent_binary.exists() {
        return Err(PreconditionError::AgentMissing(config.agent_binary.clone()).into());
    }

    let desired = locate_manifest(config)?;
    let docs = RunDocuments::load(config)?;

    let facts = HostFacts {
        os_version: host::os_version(&config.system_version_path)?,
        session_active: host::console_session_active(&config.console_device),
    };

    let mut counters = PlistCounterStore::new(&config.prefs_path);
    let runner = SystemProcessRunner::new();

    let summary = HookRun::new(config, &mut counters, &runner, facts)
        .execute(&desired, &docs)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} installed={} removed={} pending={} warnings={}",
        "✓".green(),
        summary.installed,
        summary.removed,
        summary.pending,
        summary.warnings
    );
    if summary.marker_present {
        println!("   {}", "Logout install trigger set".yellow());
    }
    if summary.manifest_rewritten {
        println!("   {}", format!("Updated {}", desired.path.display()).cyan());
    }

    Ok(())
}
