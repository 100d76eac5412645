//! Parsers for agent-produced documents

pub mod plist_doc;

pub use plist_doc::{load, load_optional, save, DocumentError, DocumentResult};
