// Postflight - post-run hook for the endpoint-management agent
// Reconciles self-service requests, tracks pending updates and notifies the console user

pub mod cli;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod reconcile;
pub mod services;
pub mod state;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod utils;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use models::{HookConfig, NotificationAction, OsVersion, PendingCategory, SelfServeManifest};
pub use orchestrator::{HookRun, RunSummary};
pub use state::{CounterStore, PlistCounterStore, TriggerFile};
