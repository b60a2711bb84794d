// SPDX-License-Identifier: MIT
//! Tessera entity layer
//!
//! Maps three structured domain entities - [`Node`], [`Relation`] and
//! [`Metadata`] - onto flat quad sets in a [`tessera_store::QuadStore`]
//! and keeps multi-quad entities consistent under mutation.
//!
//! # Architecture
//!
//! - [`codec`] -- the bidirectional encoding between entities and quad
//!   sets, including the synthetic-identifier scheme that gives
//!   relations an addressable id.
//! - [`mutation`] -- the transactional mutation engine: create,
//!   add-or-replace-property, sparse update, and cascading delete, each
//!   a single atomic batch against the store.
//! - [`lookup`] -- directional scans and intersections that recover
//!   the quad set of an entity from the store.
//! - [`model`] -- the entity structs and their flat wire-JSON
//!   representation.
//!
//! A caller constructs or receives an entity, the codec decomposes it
//! into quads, the mutation engine stages and atomically applies them;
//! reads run the other way through the lookup engine and the codec.
//!
//! # Concurrency
//!
//! The store handle is shared process-wide and injected explicitly.
//! Add-or-replace interleavings between concurrent callers resolve as
//! last-writer-wins; there is no optimistic-concurrency detection, and
//! no transaction spans more than one entity operation.

pub mod codec;
pub mod error;
pub mod lookup;
pub mod model;
pub mod mutation;

pub use error::EntityError;
pub use lookup::LookupService;
pub use model::{Metadata, Node, Relation};
pub use mutation::EntityService;
