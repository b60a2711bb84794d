// SPDX-License-Identifier: MIT
//! Transactional batches.
//!
//! A [`Transaction`] is an ordered batch of quad additions and
//! removals. It is built up by the mutation engine and handed to
//! [`crate::QuadStore::apply`], which commits the whole batch or none
//! of it. Transactions are plain values; nothing happens until they
//! are applied.

use tessera_quad::Quad;

/// A single staged operation within a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TxOp {
    /// Add the quad to the store.
    Add(Quad),
    /// Remove the quad from the store.
    Remove(Quad),
}

/// An ordered, atomic batch of quad additions and removals.
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    ops: Vec<TxOp>,
}

impl Transaction {
    /// Create an empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the addition of `quad`.
    pub fn add_quad(&mut self, quad: Quad) {
        self.ops.push(TxOp::Add(quad));
    }

    /// Stage the removal of `quad`.
    pub fn remove_quad(&mut self, quad: Quad) {
        self.ops.push(TxOp::Remove(quad));
    }

    /// The staged operations, in staging order.
    pub fn ops(&self) -> &[TxOp] {
        &self.ops
    }

    /// Number of staged operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
