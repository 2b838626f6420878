//! Write-once configuration slots.
//!
//! A [`Config`] holds at most one value per key. Setting a key twice is an
//! error, reading an unset key either yields `None` or memoizes a default,
//! and freezing the store locks it against all further writes. Builders in
//! the runtime crates record every definition-time setting through one of
//! these.

use crate::error::ConfigError;
use std::borrow::Borrow;
use std::fmt;

/// Insertion-ordered, write-once key/value store.
#[derive(Debug, Clone)]
pub struct Config<K, V> {
    owner: String,
    entries: Vec<(K, V)>,
    frozen: bool,
}

impl<K, V> Config<K, V>
where
    K: PartialEq + fmt::Display,
{
    /// Create an empty, unfrozen store. `owner` names the definition in
    /// finalization errors.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: Vec::new(),
            frozen: false,
        }
    }

    /// Name of the definition this store belongs to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Store `value` under `key`, or read the current value when `value`
    /// is `None`.
    ///
    /// Writing a key that is already set, or writing to a frozen store,
    /// fails with [`ConfigError::Frozen`].
    pub fn set_or_get(&mut self, key: K, value: Option<V>) -> Result<Option<&V>, ConfigError> {
        let Some(value) = value else {
            return Ok(self.get(&key));
        };
        if self.frozen || self.contains(&key) {
            return Err(ConfigError::frozen(key.to_string()));
        }
        self.entries.push((key, value));
        Ok(self.entries.last().map(|(_, v)| v))
    }

    /// Return the value under `key`, computing and storing `default()` the
    /// first time only.
    ///
    /// A frozen store cannot memoize, so a missing key on a frozen store
    /// fails with [`ConfigError::Frozen`].
    pub fn fetch_with_default(
        &mut self,
        key: K,
        default: impl FnOnce() -> V,
    ) -> Result<&V, ConfigError> {
        if let Some(idx) = self.position(&key) {
            return Ok(&self.entries[idx].1);
        }
        if self.frozen {
            return Err(ConfigError::frozen(key.to_string()));
        }
        self.entries.push((key, default()));
        let last = self.entries.len() - 1;
        Ok(&self.entries[last].1)
    }

    /// Return the value under `key`, or [`ConfigError::Missing`].
    pub fn require<Q>(&self, key: &Q) -> Result<&V, ConfigError>
    where
        K: Borrow<Q>,
        Q: PartialEq + fmt::Display + ?Sized,
    {
        self.get(key)
            .ok_or_else(|| ConfigError::missing(key.to_string()))
    }

    /// Look up `key` without side effects.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| <K as Borrow<Q>>::borrow(k) == key)
            .map(|(_, v)| v)
    }

    /// Whether `key` has been set.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Lock the store. Freezing twice fails with
    /// [`ConfigError::AlreadyFinalized`].
    pub fn freeze(&mut self) -> Result<(), ConfigError> {
        if self.frozen {
            return Err(ConfigError::AlreadyFinalized {
                name: self.owner.clone(),
            });
        }
        self.frozen = true;
        Ok(())
    }

    /// Whether [`freeze`](Self::freeze) has been called.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Number of keys set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// An unfrozen copy carrying the same entries, for deriving a new
    /// definition from an existing one.
    pub fn thaw_copy(&self, owner: impl Into<String>) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self {
            owner: owner.into(),
            entries: self.entries.clone(),
            frozen: false,
        }
    }

    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries.iter().position(|(k, _)| <K as Borrow<Q>>::borrow(k) == key)
    }
}

impl<K, V> IntoIterator for Config<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
