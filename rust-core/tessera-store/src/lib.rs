// SPDX-License-Identifier: MIT
//! Tessera quad store abstraction
//!
//! The [`QuadStore`] trait is the single seam between the entity layer
//! and physical storage. It exposes quad addition/removal, atomic
//! transactional batches, and directional index scans. The entity
//! layer never talks to network or disk directly; a store handle is
//! constructed once at startup and injected into the engines that need
//! it.
//!
//! # Modules
//!
//! - [`backend`] -- the `QuadStore` trait defining the storage contract.
//! - [`transaction`] -- the ordered add/remove batch applied atomically.
//! - [`memory`] -- a pure-Rust in-memory store with per-direction
//!   indices, used as the default backend and in tests.
//! - [`error`] -- the `StoreError` enum covering backend failure modes.

pub mod backend;
pub mod error;
pub mod memory;
pub mod transaction;

pub use backend::QuadStore;
pub use error::StoreError;
pub use memory::MemoryQuadStore;
pub use transaction::{Transaction, TxOp};
