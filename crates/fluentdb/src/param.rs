//! Ordered bind maps handed to the statement executor.

use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;

/// Key of a bound value: a `:name` placeholder or a `?` position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindKey {
    Named(String),
    Positional(usize),
}

impl fmt::Display for BindKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Positional(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for BindKey {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for BindKey {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<usize> for BindKey {
    fn from(i: usize) -> Self {
        Self::Positional(i)
    }
}

/// An ordered map of bind values.
///
/// Named keys keep their first insertion position when overwritten;
/// positional keys are always renumbered `0..n` in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binds {
    entries: IndexMap<BindKey, Value>,
    positional: usize,
}

impl Binds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a positional bind list (`?` placeholders).
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut binds = Self::new();
        for v in values {
            binds.push(v);
        }
        binds
    }

    /// Build a named bind map (`:name` placeholders).
    pub fn from_named<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut binds = Self::new();
        for (k, v) in values {
            binds.set(k, v);
        }
        binds
    }

    /// Set a named value, overwriting an existing one in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries
            .insert(BindKey::Named(name.into()), value.into());
    }

    /// Append a positional value.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.entries
            .insert(BindKey::Positional(self.positional), value.into());
        self.positional += 1;
    }

    /// Insert under an arbitrary key; positional keys are appended.
    pub fn insert(&mut self, key: BindKey, value: Value) {
        match key {
            BindKey::Named(name) => self.set(name, value),
            BindKey::Positional(_) => self.push(value),
        }
    }

    /// Merge another map into this one.
    pub fn merge(&mut self, other: Binds) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(&BindKey::Named(name.to_string()))
    }

    pub fn get_positional(&self, index: usize) -> Option<&Value> {
        self.entries.get(&BindKey::Positional(index))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positional = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BindKey, &Value)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }
}

impl<V: Into<Value>> From<Vec<V>> for Binds {
    fn from(values: Vec<V>) -> Self {
        Self::from_values(values)
    }
}

impl IntoIterator for Binds {
    type Item = (BindKey, Value);
    type IntoIter = indexmap::map::IntoIter<BindKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
