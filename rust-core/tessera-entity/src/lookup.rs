// SPDX-License-Identifier: MIT
//! The lookup/traversal engine.
//!
//! Recovers entity quad sets from the store with directional index
//! scans and intersections. Intersecting "object = X" with
//! "predicate = P" is expressed as one directional scan filtered by
//! predicate equality - same result set, one index walk. Iteration
//! order from the store is not stable and nothing here depends on it
//! beyond the documented first-match-wins lookups.

use std::sync::Arc;

use tessera_quad::{meta_id_predicate, relation_id_predicate, Direction, GraphValue, Iri, Quad};
use tessera_store::QuadStore;
use tracing::debug;

use crate::codec;
use crate::error::EntityError;
use crate::model::Relation;

async fn scan(
    store: &dyn QuadStore,
    direction: Direction,
    value: &GraphValue,
    operation: &'static str,
) -> Result<Vec<Quad>, EntityError> {
    store
        .quads_by(direction, value)
        .await
        .map_err(|source| EntityError::Store { operation, source })
}

/// Union of the quads where `id` occurs as subject or as object -
/// "relationships touching this node".
pub async fn quads_touching(store: &dyn QuadStore, id: &Iri) -> Result<Vec<Quad>, EntityError> {
    let value = GraphValue::Iri(id.clone());
    let mut quads = scan(store, Direction::Subject, &value, "quads touching").await?;
    quads.extend(scan(store, Direction::Object, &value, "quads touching").await?);
    Ok(quads)
}

/// Quads where `id` occurs as subject, used to reconstruct a node or
/// metadata bundle.
pub async fn quads_by_subject(store: &dyn QuadStore, id: &Iri) -> Result<Vec<Quad>, EntityError> {
    scan(
        store,
        Direction::Subject,
        &GraphValue::Iri(id.clone()),
        "quads by subject",
    )
    .await
}

/// The relation with the given opaque id, or `None` when no identifier
/// quad names it.
///
/// Expected unique: the first matching identifier quad wins and
/// duplicates are ignored.
pub async fn relation_by_id(
    store: &dyn QuadStore,
    id: &Iri,
) -> Result<Option<Relation>, EntityError> {
    let candidates = scan(
        store,
        Direction::Object,
        &GraphValue::Iri(id.clone()),
        "relation by id",
    )
    .await?;
    candidates
        .iter()
        .find(|q| q.predicate == relation_id_predicate())
        .map(codec::relation_from_identifier_quad)
        .transpose()
}

/// All metadata quads attached to a relation: the metadata-identifier
/// quads plus the property quads of every bundle they name.
///
/// Multiple bundles per relation are possible; their quads are
/// concatenated into one flat aggregate with no bundle boundaries.
pub async fn metadata_quads_by_relation(
    store: &dyn QuadStore,
    relation_id: &Iri,
) -> Result<Vec<Quad>, EntityError> {
    let identifier_quads: Vec<Quad> = scan(
        store,
        Direction::Subject,
        &GraphValue::Iri(relation_id.clone()),
        "metadata by relation",
    )
    .await?
    .into_iter()
    .filter(|q| q.predicate == meta_id_predicate())
    .collect();

    let mut quads = identifier_quads.clone();
    for identifier in &identifier_quads {
        if let Some(metadata_id) = identifier.object.as_text() {
            quads.extend(quads_by_subject(store, &Iri::new(metadata_id)).await?);
        }
    }
    debug!(relation = %relation_id, quads = quads.len(), "metadata lookup by relation");
    Ok(quads)
}

/// The identifier quad and property quads of one metadata bundle.
pub async fn metadata_quads_by_id(
    store: &dyn QuadStore,
    metadata_id: &Iri,
) -> Result<Vec<Quad>, EntityError> {
    let mut quads: Vec<Quad> = scan(
        store,
        Direction::Object,
        &GraphValue::Iri(metadata_id.clone()),
        "metadata by id",
    )
    .await?
    .into_iter()
    .filter(|q| q.predicate == meta_id_predicate())
    .collect();
    quads.extend(quads_by_subject(store, metadata_id).await?);
    Ok(quads)
}

/// Read-side handle over an injected store.
#[derive(Clone)]
pub struct LookupService {
    store: Arc<dyn QuadStore>,
}

impl LookupService {
    /// Create a lookup engine over the shared store handle.
    pub fn new(store: Arc<dyn QuadStore>) -> Self {
        Self { store }
    }

    /// See [`quads_touching`].
    pub async fn quads_touching(&self, id: &Iri) -> Result<Vec<Quad>, EntityError> {
        quads_touching(self.store.as_ref(), id).await
    }

    /// See [`quads_by_subject`].
    pub async fn quads_by_subject(&self, id: &Iri) -> Result<Vec<Quad>, EntityError> {
        quads_by_subject(self.store.as_ref(), id).await
    }

    /// See [`relation_by_id`].
    pub async fn relation_by_id(&self, id: &Iri) -> Result<Option<Relation>, EntityError> {
        relation_by_id(self.store.as_ref(), id).await
    }

    /// See [`metadata_quads_by_relation`].
    pub async fn metadata_quads_by_relation(
        &self,
        relation_id: &Iri,
    ) -> Result<Vec<Quad>, EntityError> {
        metadata_quads_by_relation(self.store.as_ref(), relation_id).await
    }

    /// See [`metadata_quads_by_id`].
    pub async fn metadata_quads_by_id(
        &self,
        metadata_id: &Iri,
    ) -> Result<Vec<Quad>, EntityError> {
        metadata_quads_by_id(self.store.as_ref(), metadata_id).await
    }
}
