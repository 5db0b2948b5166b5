//! Identity types for the dispatch registry
//!
//! Handle format:
//! - Plugin handles: `p-{7-char-hash}` (e.g., `p-7f2b4c1`)
//!
//! The hash is derived from the plugin's declared name, so two plugins with
//! the same name always produce the same handle. Duplicate registration is
//! detected through this collision, which makes the handle a contract, not
//! a cosmetic label.
//!
//! Caller identities are plain strings (a username, a service name). The
//! registry compares them verbatim against its configured administrator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum HandleError {
    #[error("Invalid plugin handle format: expected 'p-{{7-char-hash}}', got '{0}'")]
    InvalidHandle(String),
}

/// Generates the 7-character hash portion of a handle from a plugin name
fn generate_hash(name: &str) -> String {
    let hash = blake3::hash(name.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Plugin handle in the format `p-{7-char-hash}`
///
/// Derived deterministically from the plugin's name, so the same name
/// always maps to the same handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginHandle {
    hash: String,
}

impl PluginHandle {
    /// Derives the handle for a plugin name
    pub fn of(name: &str) -> Self {
        Self {
            hash: generate_hash(name),
        }
    }

    /// Returns the hash portion of the handle
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for PluginHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p-{}", self.hash)
    }
}

impl FromStr for PluginHandle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(hash) = s.strip_prefix("p-") else {
            return Err(HandleError::InvalidHandle(s.to_string()));
        };

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HandleError::InvalidHandle(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_string(),
        })
    }
}

impl TryFrom<String> for PluginHandle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PluginHandle> for String {
    fn from(handle: PluginHandle) -> Self {
        handle.to_string()
    }
}

/// Identity of the party performing a registry operation
///
/// The administrator identity is a `CallerId` fixed when the registry is
/// constructed; mutating operations compare the caller against it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    /// Creates a caller identity from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CallerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_is_deterministic_for_same_name() {
        assert_eq!(PluginHandle::of("vault"), PluginHandle::of("vault"));
    }

    #[test]
    fn handle_differs_for_different_names() {
        assert_ne!(PluginHandle::of("vault"), PluginHandle::of("double"));
    }

    #[test]
    fn handle_format_is_correct() {
        let handle = PluginHandle::of("double");
        let s = handle.to_string();

        assert!(s.starts_with("p-"));
        assert_eq!(s.len(), 9); // "p-" + 7 chars
    }

    #[test]
    fn handle_parses_correctly() {
        let original = PluginHandle::of("vault");
        let s = original.to_string();
        let parsed: PluginHandle = s.parse().unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn handle_rejects_invalid_format() {
        assert!("invalid".parse::<PluginHandle>().is_err());
        assert!("p-short".parse::<PluginHandle>().is_err());
        assert!("p-toolonggg".parse::<PluginHandle>().is_err());
        assert!("p-gggggg1".parse::<PluginHandle>().is_err()); // 'g' is not hex
    }

    #[test]
    fn serde_roundtrip_handle() {
        let original = PluginHandle::of("vault");
        let json = serde_json::to_string(&original).unwrap();
        let parsed: PluginHandle = serde_json::from_str(&json).unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn caller_id_compares_verbatim() {
        assert_eq!(CallerId::new("alice"), CallerId::from("alice"));
        assert_ne!(CallerId::new("alice"), CallerId::new("Alice"));
    }

    #[test]
    fn serde_caller_id_is_transparent() {
        let caller = CallerId::new("alice");
        let json = serde_json::to_string(&caller).unwrap();

        assert_eq!(json, "\"alice\"");
    }
}
