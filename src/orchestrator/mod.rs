pub mod director;
pub mod hook_run;
pub mod inventory;
pub mod notifier;
pub mod process_runner;

pub use director::{decide_os_updates, decide_regular, Decision, DecisionInputs};
pub use hook_run::{HookRun, RunSummary};
pub use notifier::{Notification, Notifier};
pub use process_runner::{ProcessRunner, SystemProcessRunner};
