// SPDX-License-Identifier: MIT
//! Tessera quad data model
//!
//! The atomic fact in a Tessera store is a **quad**: `(subject,
//! predicate, object, label)`. All four positions hold graph values -
//! a closed tagged variant over IRIs, string literals, floats, booleans,
//! and raw (untyped) literals. Quads are immutable values with
//! structural equality; mutation elsewhere in the system is always
//! expressed as "remove old quad, add new quad".
//!
//! This crate also owns the reserved predicates that the entity layer
//! uses internally (`schema:name`, `hasRelationId`, `hasMetaId`). They
//! are process-wide constants and are never valid as user property
//! keys.

mod quad;
mod value;

pub use quad::{Direction, Quad};
pub use value::{CoercionError, GraphValue, Iri};

/// Predicate of the quad carrying a node's display name.
pub const NAME_PREDICATE: &str = "schema:name";

/// Predicate of the synthetic quad binding an opaque id to a relation.
pub const RELATION_ID_PREDICATE: &str = "hasRelationId";

/// Predicate of the synthetic quad binding a metadata bundle to its
/// owning relation.
pub const META_ID_PREDICATE: &str = "hasMetaId";

/// The name predicate as a graph value.
pub fn name_predicate() -> GraphValue {
    GraphValue::Iri(Iri::new(NAME_PREDICATE))
}

/// The relation-identifier predicate as a graph value.
pub fn relation_id_predicate() -> GraphValue {
    GraphValue::Iri(Iri::new(RELATION_ID_PREDICATE))
}

/// The metadata-identifier predicate as a graph value.
pub fn meta_id_predicate() -> GraphValue {
    GraphValue::Iri(Iri::new(META_ID_PREDICATE))
}

/// Return `true` if `key` collides with a reserved predicate and must
/// not be used as a user property key.
pub fn is_reserved_predicate(key: &str) -> bool {
    key == NAME_PREDICATE || key == RELATION_ID_PREDICATE || key == META_ID_PREDICATE
}
