// SPDX-License-Identifier: MIT
//! The quad store contract.

use async_trait::async_trait;
use tessera_quad::{Direction, GraphValue, Quad};

use crate::error::StoreError;
use crate::transaction::Transaction;

/// A quad-oriented graph store.
///
/// Implementations must be safe to share across threads and tasks;
/// the process constructs one handle at startup and every engine holds
/// a reference to it.
///
/// Transactions are the unit of atomicity: [`QuadStore::apply`] either
/// commits the whole batch or leaves the store untouched, and no
/// partial application is observable to concurrent readers. No
/// guarantee is made about the iteration order of
/// [`QuadStore::quads_by`] results.
#[async_trait]
pub trait QuadStore: Send + Sync {
    /// Add a single quad. Adding an already-present quad is a no-op.
    async fn add_quad(&self, quad: &Quad) -> Result<(), StoreError>;

    /// Remove a single quad. Removing an absent quad is a no-op.
    async fn remove_quad(&self, quad: &Quad) -> Result<(), StoreError>;

    /// Apply an ordered batch of additions and removals atomically.
    async fn apply(&self, tx: Transaction) -> Result<(), StoreError>;

    /// All quads whose `direction` position equals `value`.
    async fn quads_by(
        &self,
        direction: Direction,
        value: &GraphValue,
    ) -> Result<Vec<Quad>, StoreError>;

    /// A human-readable backend name, used in logging.
    fn name(&self) -> &str;
}
