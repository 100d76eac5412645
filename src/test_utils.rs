//! Test doubles shared by unit and integration tests

use crate::orchestrator::ProcessRunner;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One recorded process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl RecordedCall {
    /// Value following `flag` in the argument list
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }
}

/// Records invocations instead of spawning anything
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<RecordedCall>>,
    fail: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that records every call and then reports failure
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose program is `program`
    pub fn calls_to(&self, program: &Path) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program)
            .collect()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<()> {
        self.calls.lock().unwrap().push(RecordedCall {
            program: program.to_path_buf(),
            args: args.to_vec(),
        });

        if self.fail {
            anyhow::bail!("Command '{}' failed with exit code Some(1)", program.display());
        }
        Ok(())
    }
}
