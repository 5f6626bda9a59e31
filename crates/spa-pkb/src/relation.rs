//! Bidirectional relation indices.
//!
//! Every concrete relation in the knowledge base is backed by one of four
//! index shapes, chosen by the relation's cardinality:
//!
//! - [`OneToOne`]: each key has at most one value and vice versa
//!   (e.g. `Follows` — a statement has at most one direct successor).
//! - [`OneToMany`]: a key maps to a set of values, each value has one key
//!   (e.g. `Parent` — a container has many children, a child one parent).
//! - [`ManyToOne`]: the mirror image (e.g. statement -> statement type).
//! - [`ManyToMany`]: set-valued on both sides (e.g. `Uses`, `Calls`).
//!
//! All shapes maintain a forward and a reverse map so that lookups in either
//! direction are O(1) amortized. Insertion is append-only and idempotent;
//! lookups never fail — an absent key yields `None` or an empty iterator.

use ahash::{AHashMap, AHashSet};
use std::hash::Hash;

/// Functional in both directions: `K -> V` and `V -> K`.
///
/// Inserting a second value for an existing key (or a second key for an
/// existing value) is ignored; population is append-only and upstream
/// guarantees uniqueness, so first-write-wins keeps the two maps consistent.
#[derive(Debug, Clone)]
pub struct OneToOne<K, V> {
    forward: AHashMap<K, V>,
    reverse: AHashMap<V, K>,
}

impl<K, V> Default for OneToOne<K, V> {
    fn default() -> Self {
        Self {
            forward: AHashMap::new(),
            reverse: AHashMap::new(),
        }
    }
}

impl<K, V> OneToOne<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K, value: V) {
        if self.forward.contains_key(&key) || self.reverse.contains_key(&value) {
            return;
        }
        self.forward.insert(key.clone(), value.clone());
        self.reverse.insert(value, key);
    }

    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.forward.get(key) == Some(value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.reverse.contains_key(value)
    }

    pub fn value_of(&self, key: &K) -> Option<&V> {
        self.forward.get(key)
    }

    pub fn key_of(&self, value: &V) -> Option<&K> {
        self.reverse.get(value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.forward.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.forward.values()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&K, &V)> {
        self.forward.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }
}

/// `K -> {V}` forward, `V -> K` reverse.
#[derive(Debug, Clone)]
pub struct OneToMany<K, V> {
    forward: AHashMap<K, AHashSet<V>>,
    reverse: AHashMap<V, K>,
}

impl<K, V> Default for OneToMany<K, V> {
    fn default() -> Self {
        Self {
            forward: AHashMap::new(),
            reverse: AHashMap::new(),
        }
    }
}

impl<K, V> OneToMany<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K, value: V) {
        if self.reverse.contains_key(&value) {
            return;
        }
        self.forward
            .entry(key.clone())
            .or_default()
            .insert(value.clone());
        self.reverse.insert(value, key);
    }

    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.reverse.get(value) == Some(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.reverse.contains_key(value)
    }

    pub fn values_of(&self, key: &K) -> impl Iterator<Item = &V> {
        self.forward.get(key).into_iter().flatten()
    }

    pub fn key_of(&self, value: &V) -> Option<&K> {
        self.reverse.get(value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.forward.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.reverse.keys()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&K, &V)> {
        self.forward
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }
}

/// `K -> V` forward, `V -> {K}` reverse.
#[derive(Debug, Clone)]
pub struct ManyToOne<K, V> {
    forward: AHashMap<K, V>,
    reverse: AHashMap<V, AHashSet<K>>,
}

impl<K, V> Default for ManyToOne<K, V> {
    fn default() -> Self {
        Self {
            forward: AHashMap::new(),
            reverse: AHashMap::new(),
        }
    }
}

impl<K, V> ManyToOne<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K, value: V) {
        if self.forward.contains_key(&key) {
            return;
        }
        self.forward.insert(key.clone(), value.clone());
        self.reverse.entry(value).or_default().insert(key);
    }

    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.forward.get(key) == Some(value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.reverse.contains_key(value)
    }

    pub fn value_of(&self, key: &K) -> Option<&V> {
        self.forward.get(key)
    }

    pub fn keys_of(&self, value: &V) -> impl Iterator<Item = &K> {
        self.reverse.get(value).into_iter().flatten()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.forward.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.reverse.keys()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&K, &V)> {
        self.forward.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }
}

/// Set-valued in both directions.
#[derive(Debug, Clone)]
pub struct ManyToMany<K, V> {
    forward: AHashMap<K, AHashSet<V>>,
    reverse: AHashMap<V, AHashSet<K>>,
    len: usize,
}

impl<K, V> Default for ManyToMany<K, V> {
    fn default() -> Self {
        Self {
            forward: AHashMap::new(),
            reverse: AHashMap::new(),
            len: 0,
        }
    }
}

impl<K, V> ManyToMany<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K, value: V) {
        let inserted = self
            .forward
            .entry(key.clone())
            .or_default()
            .insert(value.clone());
        if inserted {
            self.reverse.entry(value).or_default().insert(key);
            self.len += 1;
        }
    }

    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.forward
            .get(key)
            .is_some_and(|vs| vs.contains(value))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.reverse.contains_key(value)
    }

    pub fn values_of(&self, key: &K) -> impl Iterator<Item = &V> {
        self.forward.get(key).into_iter().flatten()
    }

    pub fn keys_of(&self, value: &V) -> impl Iterator<Item = &K> {
        self.reverse.get(value).into_iter().flatten()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.forward.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.reverse.keys()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&K, &V)> {
        self.forward
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct (key, value) pairs.
    pub fn len(&self) -> usize {
        self.len
    }
}
