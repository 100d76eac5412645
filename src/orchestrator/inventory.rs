//! Inventory update after installs or removals

use super::process_runner::ProcessRunner;
use crate::models::InventoryConfig;
use anyhow::Result;
use std::path::Path;

/// Run the configured inventory command when something changed on disk.
///
/// Returns whether the command was started.
pub async fn update_if_changed(
    config: &InventoryConfig,
    runner: &dyn ProcessRunner,
    installed: u32,
    removed: u32,
) -> Result<bool> {
    if !config.enabled || installed + removed == 0 {
        return Ok(false);
    }

    let Some((program, args)) = config.command.split_first() else {
        tracing::warn!("Inventory update enabled but no command configured");
        return Ok(false);
    };

    tracing::info!(program = %program, installed, removed, "Updating inventory");
    runner.run(Path::new(program), args).await?;
    Ok(true)
}
