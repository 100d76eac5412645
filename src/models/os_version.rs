//! Typed OS version used for the legacy/modern OS-update branch

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Major/minor OS version. Patch components are accepted when parsing but ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
}

impl OsVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// True when this version is at or below `threshold`
    pub fn is_legacy(&self, threshold: OsVersion) -> bool {
        *self <= threshold
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid OS version '{0}': expected <major>.<minor>[.<patch>]")]
pub struct ParseOsVersionError(String);

impl FromStr for OsVersion {
    type Err = ParseOsVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split('.');

        let major = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| ParseOsVersionError(s.to_string()))?;

        // "11" is a valid ProductVersion on some releases; minor defaults to 0
        let minor = match parts.next() {
            Some(p) => p
                .parse::<u32>()
                .map_err(|_| ParseOsVersionError(s.to_string()))?,
            None => 0,
        };

        Ok(Self { major, minor })
    }
}

impl Serialize for OsVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OsVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
