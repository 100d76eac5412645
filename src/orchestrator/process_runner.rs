use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Spawns external programs with a pre-split argument list.
///
/// No shell is involved, so display names and versions taken from reports
/// are passed through verbatim.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` to completion. Errors on spawn failure or non-zero exit.
    async fn run(&self, program: &Path, args: &[String]) -> Result<()>;
}

/// Runner for real child processes
#[derive(Debug, Default)]
pub struct SystemProcessRunner {}

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<()> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| {
                format!(
                    "Command '{}' could not be started. Please ensure it is installed.",
                    program.display()
                )
            })?;

        if !output.status.success() {
            anyhow::bail!(
                "Command '{}' failed with exit code {:?}\nStderr: {}",
                program.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(program = %program.display(), output = %stdout.trim(), "Command output");
        }

        Ok(())
    }
}
