// SPDX-License-Identifier: MIT
//! The transactional mutation engine.
//!
//! Every operation stages its quad additions and removals into one
//! [`Transaction`] and applies it as a single atomic batch; readers
//! never observe a half-written entity. The engine does not retry and
//! does not compensate - the store adapter is atomic per batch, so a
//! failed apply leaves no partial state behind.
//!
//! Concurrent add-or-replace calls against the same subject/predicate
//! can interleave their read-scan and write-stage steps; the engine
//! accepts last-writer-wins for that race rather than detecting it.

use std::sync::Arc;

use tessera_quad::{name_predicate, GraphValue, Iri, Quad};
use tessera_store::{QuadStore, StoreError, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::codec;
use crate::error::EntityError;
use crate::lookup;
use crate::model::{Metadata, Node, Relation};

fn fresh_id() -> Iri {
    Iri::new(Uuid::new_v4().to_string())
}

/// Write-side handle over an injected store.
#[derive(Clone)]
pub struct EntityService {
    store: Arc<dyn QuadStore>,
}

impl EntityService {
    /// Create a mutation engine over the shared store handle.
    pub fn new(store: Arc<dyn QuadStore>) -> Self {
        Self { store }
    }

    async fn apply(
        &self,
        tx: Transaction,
        operation: &'static str,
    ) -> Result<(), EntityError> {
        let ops = tx.len();
        self.store
            .apply(tx)
            .await
            .map_err(|source: StoreError| EntityError::Store { operation, source })?;
        debug!(operation, ops, store = self.store.name(), "batch applied");
        Ok(())
    }

    /// Stage an add-or-replace of `quad`: every existing quad sharing
    /// its subject and predicate is staged for removal before the
    /// addition, so the subject/predicate pair is single-valued once
    /// the transaction commits. Quads under other predicates are left
    /// untouched.
    pub async fn stage_add_or_replace(
        &self,
        tx: &mut Transaction,
        quad: &Quad,
    ) -> Result<(), EntityError> {
        let existing = self
            .store
            .quads_by(tessera_quad::Direction::Subject, &quad.subject)
            .await
            .map_err(|source| EntityError::Store { operation: "replace scan", source })?;
        for found in existing {
            if found.predicate == quad.predicate {
                tx.remove_quad(found);
            }
        }
        tx.add_quad(quad.clone());
        Ok(())
    }

    /// Add-or-replace a single quad as its own transaction.
    pub async fn add_or_replace(&self, quad: &Quad) -> Result<(), EntityError> {
        let mut tx = Transaction::new();
        self.stage_add_or_replace(&mut tx, quad).await?;
        self.apply(tx, "replace quad").await
    }

    /// Create a node under a fresh id and persist its quad set in one
    /// addition-only transaction. Returns the generated quads.
    pub async fn create_node(&self, node: &Node) -> Result<Vec<Quad>, EntityError> {
        let mut node = node.clone();
        node.id = fresh_id();
        let quads = codec::node_quads(&node)?;
        let mut tx = Transaction::new();
        for quad in &quads {
            tx.add_quad(quad.clone());
        }
        self.apply(tx, "create node").await?;
        info!(node = %node.id, quads = quads.len(), "node created");
        Ok(quads)
    }

    /// Sparse node update: add-or-replace each supplied property in
    /// one shared transaction, leaving unsupplied properties intact.
    ///
    /// The name quad is skipped when the supplied name is empty - an
    /// empty name means "no change", not "clear name". Callers re-read
    /// the node for its authoritative post-update state.
    pub async fn update_node(&self, node: &Node) -> Result<Vec<Quad>, EntityError> {
        let quads = codec::node_quads(node)?;
        let mut staged = Vec::with_capacity(quads.len());
        let mut tx = Transaction::new();
        for quad in quads {
            if quad.predicate == name_predicate()
                && quad.object == GraphValue::String(String::new())
            {
                continue;
            }
            self.stage_add_or_replace(&mut tx, &quad).await?;
            staged.push(quad);
        }
        self.apply(tx, "update node").await?;
        Ok(staged)
    }

    /// Remove every quad referencing `id` in any position, in one
    /// transaction.
    pub async fn delete_by_id(&self, id: &Iri) -> Result<(), EntityError> {
        let value = GraphValue::Iri(id.clone());
        let mut tx = Transaction::new();
        for direction in tessera_quad::Direction::ALL {
            let found = self
                .store
                .quads_by(direction, &value)
                .await
                .map_err(|source| EntityError::Store { operation: "delete scan", source })?;
            for quad in found {
                tx.remove_quad(quad);
            }
        }
        self.apply(tx, "delete node").await?;
        info!(node = %id, "node deleted");
        Ok(())
    }

    /// Create a relation. A freshly generated id always overwrites any
    /// caller-supplied one; the relation quad and its identifier quad
    /// are added in one transaction.
    pub async fn create_relation(&self, relation: &Relation) -> Result<Relation, EntityError> {
        let mut relation = relation.clone();
        relation.id = fresh_id();
        let (relation_quad, identifier_quad) = codec::relation_quads(&relation)?;
        let mut tx = Transaction::new();
        tx.add_quad(relation_quad);
        tx.add_quad(identifier_quad);
        self.apply(tx, "create relation").await?;
        info!(relation = %relation.id, "relation created");
        Ok(relation)
    }

    /// Cascade-delete a relation: its identifier quad, the relation
    /// quad recovered from the identifier subject, and every metadata
    /// quad attached to the relation, removed in one transaction.
    pub async fn delete_relation(&self, id: &Iri) -> Result<(), EntityError> {
        let candidates = self
            .store
            .quads_by(tessera_quad::Direction::Object, &GraphValue::Iri(id.clone()))
            .await
            .map_err(|source| EntityError::Store { operation: "delete relation scan", source })?;

        let mut tx = Transaction::new();
        for identifier_quad in candidates
            .into_iter()
            .filter(|q| q.predicate == tessera_quad::relation_id_predicate())
        {
            let encoded = identifier_quad.subject.as_text().unwrap_or_default();
            let wire: codec::RelationQuad =
                serde_json::from_str(encoded).map_err(EntityError::MalformedRelationSubject)?;
            tx.remove_quad(wire.to_quad());
            tx.remove_quad(identifier_quad);
        }
        for quad in lookup::metadata_quads_by_relation(self.store.as_ref(), id).await? {
            tx.remove_quad(quad);
        }
        self.apply(tx, "delete relation").await?;
        info!(relation = %id, "relation deleted");
        Ok(())
    }

    /// Create a metadata bundle under a fresh id, bound to its
    /// relation by the identifier quad, in one transaction.
    pub async fn create_metadata(&self, metadata: &Metadata) -> Result<Metadata, EntityError> {
        let mut metadata = metadata.clone();
        metadata.id = fresh_id();
        let quads = codec::metadata_quads(&metadata)?;
        let mut tx = Transaction::new();
        for quad in quads {
            tx.add_quad(quad);
        }
        self.apply(tx, "create metadata").await?;
        info!(metadata = %metadata.id, relation = %metadata.relation_id, "metadata created");
        Ok(metadata)
    }

    /// Sparse metadata update: add-or-replace each supplied property
    /// in one shared transaction. The identifier quad is untouched.
    pub async fn update_metadata(&self, metadata: &Metadata) -> Result<Vec<Quad>, EntityError> {
        let quads = codec::metadata_property_quads(metadata)?;
        let mut tx = Transaction::new();
        for quad in &quads {
            self.stage_add_or_replace(&mut tx, quad).await?;
        }
        self.apply(tx, "update metadata").await?;
        Ok(quads)
    }

    /// Delete a metadata bundle: its identifier quad and property
    /// quads, removed in one transaction.
    pub async fn delete_metadata(&self, id: &Iri) -> Result<(), EntityError> {
        let quads = lookup::metadata_quads_by_id(self.store.as_ref(), id).await?;
        let mut tx = Transaction::new();
        for quad in quads {
            tx.remove_quad(quad);
        }
        self.apply(tx, "delete metadata").await?;
        info!(metadata = %id, "metadata deleted");
        Ok(())
    }
}
