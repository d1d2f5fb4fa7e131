use std::collections::BTreeMap;

/// Resources keyed by name.
///
/// Keys are kept sorted so listing is deterministic.
#[derive(Debug)]
pub struct Registry<T> {
    label: &'static str,
    entries: BTreeMap<String, T>,
}

impl<T> Registry<T> {
    /// `label` names the resource kind in log messages, e.g. `"texture"`.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: BTreeMap::new(),
        }
    }

    /// Insert under `key`, returning the resource it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        let key = key.into();
        let previous = self.entries.insert(key.clone(), value);
        if previous.is_some() {
            tracing::debug!(kind = self.label, %key, "replaced registry entry");
        }
        previous
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        let found = self.entries.get(key);
        if found.is_none() {
            tracing::warn!(kind = self.label, %key, "registry lookup missed");
        }
        found
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        let found = self.entries.get_mut(key);
        if found.is_none() {
            tracing::warn!(kind = self.label, %key, "registry lookup missed");
        }
        found
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
