//! Capture environment.
//!
//! A [`Match`] is created fresh for every match attempt and filled in by
//! `Named` patterns as execution proceeds depth-first, left to right.
//!
//! Captures written by a branch that later failed are **not** rolled back:
//! after `OR([0, NAMED(1)], [NAMED(1), 1])` fails on `[5, 5]`, key `1` is still
//! bound. Only the boolean result of the match is authoritative.

use crate::value::{Key, Value};
use std::collections::HashMap;
use std::ops::Index;

/// Capture bindings produced by one pattern execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Match {
    groups: HashMap<Key, Value>,
}

impl Match {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.groups.get(&key.into())
    }

    /// Bind `value` under `key`, replacing any earlier binding.
    pub fn set(&mut self, key: Key, value: Value) {
        self.groups.insert(key, value);
    }

    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.groups.contains_key(&key.into())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Bindings sorted by key (indices first, then names).
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        let mut pairs: Vec<_> = self.groups.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs.into_iter()
    }
}

impl<K: Into<Key>> Index<K> for Match {
    type Output = Value;

    /// Unbound keys read as `Nil`.
    fn index(&self, key: K) -> &Value {
        static NIL: Value = Value::Nil;
        self.groups.get(&key.into()).unwrap_or(&NIL)
    }
}
