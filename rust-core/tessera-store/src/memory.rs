// SPDX-License-Identifier: MIT
//! Pure-Rust in-memory quad store.
//!
//! Keeps every quad under a canonical key with one index per quad
//! direction, giving O(1) directional lookups. All state sits behind a
//! single `RwLock`, so a transactional batch mutates under one write
//! guard and readers never observe a half-applied batch.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use tessera_quad::{Direction, GraphValue, Quad};
use tracing::debug;

use crate::backend::QuadStore;
use crate::error::StoreError;
use crate::transaction::{Transaction, TxOp};

/// A canonicalised quad key for deduplication and index entries.
///
/// Holds the canonical text form of all four positions; an absent
/// label canonicalises to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QuadKey(String, String, String, String);

impl QuadKey {
    fn from_quad(quad: &Quad) -> Self {
        Self(
            quad.subject.canonical(),
            quad.predicate.canonical(),
            quad.object.canonical(),
            quad.label.as_ref().map(GraphValue::canonical).unwrap_or_default(),
        )
    }
}

/// Quad set plus the four directional indices, mutated as one unit.
#[derive(Debug, Default)]
struct Inner {
    quads: HashMap<QuadKey, Quad>,
    by_subject: HashMap<String, HashSet<QuadKey>>,
    by_predicate: HashMap<String, HashSet<QuadKey>>,
    by_object: HashMap<String, HashSet<QuadKey>>,
    by_label: HashMap<String, HashSet<QuadKey>>,
}

impl Inner {
    fn index_mut(&mut self, direction: Direction) -> &mut HashMap<String, HashSet<QuadKey>> {
        match direction {
            Direction::Subject => &mut self.by_subject,
            Direction::Predicate => &mut self.by_predicate,
            Direction::Object => &mut self.by_object,
            Direction::Label => &mut self.by_label,
        }
    }

    fn index(&self, direction: Direction) -> &HashMap<String, HashSet<QuadKey>> {
        match direction {
            Direction::Subject => &self.by_subject,
            Direction::Predicate => &self.by_predicate,
            Direction::Object => &self.by_object,
            Direction::Label => &self.by_label,
        }
    }

    fn insert(&mut self, quad: &Quad) {
        let key = QuadKey::from_quad(quad);
        for direction in Direction::ALL {
            if let Some(value) = quad.value_at(direction) {
                let canonical = value.canonical();
                self.index_mut(direction)
                    .entry(canonical)
                    .or_default()
                    .insert(key.clone());
            }
        }
        self.quads.insert(key, quad.clone());
    }

    fn remove(&mut self, quad: &Quad) {
        let key = QuadKey::from_quad(quad);
        for direction in Direction::ALL {
            if let Some(value) = quad.value_at(direction) {
                let canonical = value.canonical();
                let index = self.index_mut(direction);
                if let Some(keys) = index.get_mut(&canonical) {
                    keys.remove(&key);
                    if keys.is_empty() {
                        index.remove(&canonical);
                    }
                }
            }
        }
        self.quads.remove(&key);
    }
}

/// In-memory [`QuadStore`] backend.
///
/// Thread-safe via a single `RwLock` over the quad set and its
/// indices. Duplicate additions are idempotent; removals of absent
/// quads are no-ops, so applying a batch cannot fail half-way.
#[derive(Debug, Default)]
pub struct MemoryQuadStore {
    inner: RwLock<Inner>,
}

impl MemoryQuadStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of quads currently stored.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .quads
            .len())
    }

    /// Whether the store holds no quads.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl QuadStore for MemoryQuadStore {
    async fn add_quad(&self, quad: &Quad) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        inner.insert(quad);
        Ok(())
    }

    async fn remove_quad(&self, quad: &Quad) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        inner.remove(quad);
        Ok(())
    }

    async fn apply(&self, tx: Transaction) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        for op in tx.ops() {
            match op {
                TxOp::Add(quad) => inner.insert(quad),
                TxOp::Remove(quad) => inner.remove(quad),
            }
        }
        debug!(ops = tx.len(), "transaction applied");
        Ok(())
    }

    async fn quads_by(
        &self,
        direction: Direction,
        value: &GraphValue,
    ) -> Result<Vec<Quad>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        let result = match inner.index(direction).get(&value.canonical()) {
            Some(keys) => keys
                .iter()
                .filter_map(|k| inner.quads.get(k).cloned())
                .collect(),
            None => Vec::new(),
        };
        Ok(result)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
