//! Cross-run state
//!
//! Everything that outlives a single invocation:
//! - Pending counters in the machine-wide preference domain
//! - The logout-install trigger marker

mod counters;
mod preferences;
mod trigger;

pub use counters::{CounterStore, MemoryCounterStore, PlistCounterStore};
pub use preferences::PreferenceDomain;
pub use trigger::TriggerFile;
