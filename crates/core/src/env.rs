//! Build environment record
//!
//! The key-value configuration object owned by the surrounding build
//! process. It is passed explicitly to every operation that reads or
//! mutates it; nothing in this crate holds ambient global state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::filter::SrcFilter;

/// A value held by one environment entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    /// A plain string entry, e.g. a platform identifier
    Str(String),
    /// An ordered source filter entry
    Filter(SrcFilter),
}

impl EnvValue {
    /// The string value, if this entry holds one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Filter(_) => None,
        }
    }

    /// The source filter, if this entry holds one
    pub fn as_filter(&self) -> Option<&SrcFilter> {
        match self {
            Self::Str(_) => None,
            Self::Filter(f) => Some(f),
        }
    }
}

/// The mutable build-environment record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEnv {
    entries: BTreeMap<String, EnvValue>,
}

impl BuildEnv {
    /// Create an empty environment
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Look up an entry. Absent keys yield `None`, never an error.
    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.entries.get(key)
    }

    /// Look up a string entry; `None` for absent or non-string entries
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(EnvValue::as_str)
    }

    /// Look up a filter entry; `None` for absent or non-filter entries
    pub fn get_filter(&self, key: &str) -> Option<&SrcFilter> {
        self.get(key).and_then(EnvValue::as_filter)
    }

    /// Overwrite-or-insert an entry, discarding any previous value
    pub fn replace(&mut self, key: impl Into<String>, value: EnvValue) {
        self.entries.insert(key.into(), value);
    }

    /// Convenience for seeding a string entry
    pub fn set_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.replace(key, EnvValue::Str(value.into()));
    }

    /// Whether an entry exists under this key
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the environment has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SrcFilter;

    #[test]
    fn test_absent_key_is_none() {
        let env = BuildEnv::new();
        assert!(env.get("PIOPLATFORM").is_none());
        assert!(env.get_str("PIOPLATFORM").is_none());
        assert!(env.get_filter("SRC_FILTER").is_none());
    }

    #[test]
    fn test_replace_overwrites() {
        let mut env = BuildEnv::new();
        env.set_str("PIOPLATFORM", "ststm32");
        env.set_str("PIOPLATFORM", "espressif32");
        assert_eq!(env.get_str("PIOPLATFORM"), Some("espressif32"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_typed_accessors_do_not_cross() {
        let mut env = BuildEnv::new();
        env.set_str("PIOPLATFORM", "espressif32");
        env.replace(
            "SRC_FILTER",
            EnvValue::Filter(SrcFilter::parse(["+<*>"]).unwrap()),
        );

        assert!(env.get_filter("PIOPLATFORM").is_none());
        assert!(env.get_str("SRC_FILTER").is_none());
        assert_eq!(env.get_filter("SRC_FILTER").unwrap().len(), 1);
    }

    #[test]
    fn test_replace_changes_entry_kind() {
        let mut env = BuildEnv::new();
        env.set_str("SRC_FILTER", "stale");
        env.replace(
            "SRC_FILTER",
            EnvValue::Filter(SrcFilter::parse(["+<*>"]).unwrap()),
        );
        assert!(env.get_str("SRC_FILTER").is_none());
        assert!(env.get_filter("SRC_FILTER").is_some());
    }
}
