//! Desired-state document (self-service manifest)

use plist::{Dictionary, Value};
use serde::{Deserialize, Serialize};

const INSTALLS_KEY: &str = "managed_installs";
const UNINSTALLS_KEY: &str = "managed_uninstalls";

/// Install and uninstall requests, in the order the user made them
///
/// Uninterpreted keys round-trip with their plist types (dates, data).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Dictionary", into = "Dictionary")]
pub struct SelfServeManifest {
    pub managed_installs: Vec<String>,

    pub managed_uninstalls: Vec<String>,

    /// Keys this hook does not interpret; written back untouched
    pub extra: Dictionary,
}

/// A request list that is not an array of strings
#[derive(Debug, thiserror::Error)]
#[error("'{0}' must be an array of strings")]
pub struct ManifestShapeError(&'static str);

impl TryFrom<Dictionary> for SelfServeManifest {
    type Error = ManifestShapeError;

    fn try_from(dict: Dictionary) -> Result<Self, Self::Error> {
        let mut manifest = Self::default();
        for (key, value) in dict {
            match key.as_str() {
                INSTALLS_KEY => manifest.managed_installs = string_list(value, INSTALLS_KEY)?,
                UNINSTALLS_KEY => manifest.managed_uninstalls = string_list(value, UNINSTALLS_KEY)?,
                _ => {
                    manifest.extra.insert(key, value);
                }
            }
        }
        Ok(manifest)
    }
}

impl From<SelfServeManifest> for Dictionary {
    fn from(manifest: SelfServeManifest) -> Self {
        let mut dict = Dictionary::new();
        dict.insert(INSTALLS_KEY.to_string(), to_array(manifest.managed_installs));
        dict.insert(UNINSTALLS_KEY.to_string(), to_array(manifest.managed_uninstalls));
        dict.extend(manifest.extra);
        dict
    }
}

fn string_list(value: Value, key: &'static str) -> Result<Vec<String>, ManifestShapeError> {
    value
        .into_array()
        .ok_or(ManifestShapeError(key))?
        .into_iter()
        .map(|item| item.into_string().ok_or(ManifestShapeError(key)))
        .collect()
}

fn to_array(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

impl SelfServeManifest {
    pub fn new(installs: &[&str], uninstalls: &[&str]) -> Self {
        Self {
            managed_installs: installs.iter().map(|s| s.to_string()).collect(),
            managed_uninstalls: uninstalls.iter().map(|s| s.to_string()).collect(),
            extra: Dictionary::new(),
        }
    }
}

/// Where the desired-state document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSource {
    /// Maintained by the agent; rewritten after reconciliation
    Managed,
    /// Static fallback; never rewritten
    Static,
}

impl ManifestSource {
    pub fn is_writable(self) -> bool {
        matches!(self, ManifestSource::Managed)
    }
}

/// Remove `item` from `list` once, preserving the order of the rest
pub(crate) fn remove_item(list: &mut Vec<String>, item: &str) -> bool {
    match list.iter().position(|existing| existing == item) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}
