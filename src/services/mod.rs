//! Services - I/O around the pure core
//!
//! Host probes and document loading. The CLI uses these to assemble the
//! inputs of a run; the decision logic never calls them directly.

pub mod documents;
pub mod host;

pub use documents::{locate_manifest, LocatedManifest, PreconditionError, RunDocuments};
pub use host::HostFacts;
