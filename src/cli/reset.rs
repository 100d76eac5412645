use crate::models::{HookConfig, PendingCategory};
use crate::services::{host, PreconditionError};
use crate::state::{CounterStore, PlistCounterStore, TriggerFile};
use crate::Result;
use colored::Colorize;

/// Zero both counters and remove the trigger marker.
///
/// The next run then treats every pending item as new and notifies again.
pub fn run(config: &HookConfig, skip_root_check: bool) -> Result<()> {
    if !skip_root_check && !host::is_elevated() {
        return Err(PreconditionError::NotElevated.into());
    }

    let mut counters = PlistCounterStore::new(&config.prefs_path);
    reset(config, &mut counters)?;

    println!("{}", "✓ Pending counters reset".green());
    Ok(())
}

pub fn reset(config: &HookConfig, counters: &mut dyn CounterStore) -> Result<()> {
    for category in PendingCategory::ALL {
        counters.set(category, 0)?;
    }
    TriggerFile::new(&config.marker_path).ensure(false)?;
    tracing::info!("Pending counters and trigger reset");
    Ok(())
}
