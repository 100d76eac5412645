//! Machine-wide preference domain backed by a property-list file
//!
//! Every mutation is a read-modify-write of the whole domain followed by an
//! atomic replace, so a `set` is visible to the next `get` immediately.

use crate::parser;
use anyhow::{Context, Result};
use plist::{Dictionary, Value};
use std::path::{Path, PathBuf};

/// A single preference domain file
#[derive(Debug, Clone)]
pub struct PreferenceDomain {
    path: PathBuf,
}

impl PreferenceDomain {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole domain. Missing or unreadable files read as empty.
    pub fn read(&self) -> Dictionary {
        match parser::load_optional::<Dictionary>(&self.path) {
            Ok(Some(dict)) => dict,
            Ok(None) => Dictionary::new(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Preference domain unreadable, treating as empty"
                );
                Dictionary::new()
            }
        }
    }

    /// Integer value for `key`, if present and integral
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        let dict = self.read();
        match dict.get(key)? {
            Value::Integer(i) => i.as_signed(),
            Value::Real(r) => Some(*r as i64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn set_integer(&self, key: &str, value: i64) -> Result<()> {
        let mut dict = self.read();
        dict.insert(key.to_string(), Value::Integer(value.into()));
        self.write(&dict)
    }

    /// Remove `key`. Returns whether it was present.
    ///
    /// Unlike reads, a domain that exists but cannot be parsed is an error:
    /// the key may still be in it.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let Some(mut dict) = parser::load_optional::<Dictionary>(&self.path)
            .with_context(|| format!("Failed to read preferences {}", self.path.display()))?
        else {
            return Ok(false);
        };
        if dict.remove(key).is_none() {
            return Ok(false);
        }
        self.write(&dict)?;
        Ok(true)
    }

    fn write(&self, dict: &Dictionary) -> Result<()> {
        parser::save(&self.path, dict).with_context(|| format!("Failed to update preferences {}", self.path.display()))
    }
}
