//! Ordered string settings.
//!
//! Values are kept as the exact strings the instrument displays. The key set is
//! fixed by the defaults the store was created from; writes to unknown keys are
//! refused.

/// Ordered mapping from setting name to its current display value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    entries: Vec<(String, String)>,
}

impl Settings {
    /// Build an owned copy of a default snapshot.
    pub fn from_defaults(defaults: &[(&str, &str)]) -> Self {
        Self {
            entries: defaults
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for display, empty if the key is unknown.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Overwrite an existing setting. Returns `false` if the key is unknown.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}
