//! Section/key config store abstraction.

use std::collections::BTreeMap;

use crate::error::StoreError;

/// A section-keyed string/int key-value store.
///
/// Reads never fail: a missing or malformed value yields the supplied
/// default. Writes may fail when the backing medium does.
pub trait ConfigStore {
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;

    fn get_string(&self, section: &str, key: &str, default: &str) -> String;

    fn set_int(&mut self, section: &str, key: &str, value: i64) -> Result<(), StoreError>;

    fn set_string(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &mut S {
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        (**self).get_int(section, key, default)
    }

    fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        (**self).get_string(section, key, default)
    }

    fn set_int(&mut self, section: &str, key: &str, value: i64) -> Result<(), StoreError> {
        (**self).set_int(section, key, value)
    }

    fn set_string(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_string(section, key, value)
    }
}

/// Parses an integer value the way the stores do: surrounding whitespace is
/// ignored and anything unparsable counts as absent.
pub(crate) fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// In-memory store. Values are kept as strings, like on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<(String, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of `section.key`, if set.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .map(String::as_str)
    }

    /// Number of stored keys across all sections.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn put(&mut self, section: &str, key: &str, value: String) {
        self.values
            .insert((section.to_string(), key.to_string()), value);
    }
}

impl ConfigStore for MemoryStore {
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get(section, key).and_then(parse_int).unwrap_or(default)
    }

    fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.get(section, key).unwrap_or(default).to_string()
    }

    fn set_int(&mut self, section: &str, key: &str, value: i64) -> Result<(), StoreError> {
        self.put(section, key, value.to_string());
        Ok(())
    }

    fn set_string(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError> {
        self.put(section, key, value.to_string());
        Ok(())
    }
}
