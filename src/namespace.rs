// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Namespace: one fully resolved point of a parameter space.
//!
//! A `Namespace` maps parameter names to values. Iteration follows
//! insertion order; display and serialization helpers sort any keys that
//! are not given an explicit position.
//!
//! # Examples
//!
//! ```
//! use permspace::{Namespace, Value};
//!
//! let mut ns = Namespace::new();
//! ns.set("b", "x");
//! ns.set("a", 1);
//! assert_eq!(ns.get("a").unwrap(), &Value::from(1));
//! assert_eq!(ns.keys().collect::<Vec<_>>(), vec!["b", "a"]);
//! assert_eq!(ns.to_delimited_row(["a"]).unwrap(), "1\tx");
//! assert_eq!(ns.to_string(), "Namespace(a=1, b='x')");
//! ```

use crate::error::{Result, SpaceError};
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Ordered key-value map of parameter values.
///
/// Equality is structural: two namespaces are equal when they hold the same
/// keys with the same values, regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace {
    entries: IndexMap<String, Value>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.entries
            .get(key)
            .ok_or_else(|| SpaceError::KeyNotFound(key.to_string()))
    }

    /// Insert or overwrite `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove `key`, returning its value. Remaining keys keep their order.
    pub fn delete(&mut self, key: &str) -> Result<Value> {
        self.entries
            .shift_remove(key)
            .ok_or_else(|| SpaceError::KeyNotFound(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.values()
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A new namespace with `other`'s entries layered over this one's.
    pub fn merge(&self, other: &Namespace) -> Namespace {
        let mut merged = self.clone();
        for (key, value) in &other.entries {
            merged.entries.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Explicit order followed by every remaining key, sorted.
    fn expand_order<I, S>(&self, order: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut expanded: Vec<String> = order.into_iter().map(|k| k.as_ref().to_string()).collect();
        let mut rest: Vec<String> = self
            .entries
            .keys()
            .filter(|k| !expanded.contains(k))
            .cloned()
            .collect();
        rest.sort();
        expanded.extend(rest);
        expanded
    }

    /// Project onto `order`, then the remaining keys sorted by name.
    ///
    /// Fails with `KeyNotFound` if `order` names a key this namespace lacks.
    pub fn to_ordered_tuple<I, S>(&self, order: I) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expand_order(order)
            .iter()
            .map(|key| self.get(key).cloned())
            .collect()
    }

    /// Tab separated row of [`Namespace::to_ordered_tuple`].
    pub fn to_delimited_row<I, S>(&self, order: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells: Vec<String> = self
            .to_ordered_tuple(order)?
            .iter()
            .map(Value::to_string)
            .collect();
        Ok(cells.join("\t"))
    }
}

impl Index<&str> for Namespace {
    type Output = Value;

    /// Panics if `key` is absent; use [`Namespace::get`] to handle that case.
    fn index(&self, key: &str) -> &Value {
        match self.entries.get(key) {
            Some(value) => value,
            None => panic!("key not found: {}", key),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Namespace
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Namespace {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<(&String, &Value)> = self.entries.iter().collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "Namespace(")?;
        for (i, (key, value)) in items.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", key, value.repr())?;
        }
        write!(f, ")")
    }
}
