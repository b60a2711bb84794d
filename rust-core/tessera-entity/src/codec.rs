// SPDX-License-Identifier: MIT
//! The entity codec: entities to quad sets and back.
//!
//! Encoding is all-or-nothing: a single bad property aborts the whole
//! entity with no partial quad list produced. Decoding accepts an
//! unordered quad list presumed to share one subject and fails fast on
//! the first quad that does not.
//!
//! Relations have no identity of their own - the underlying tuple
//! model gives an edge nothing beyond its three fields - so the codec
//! derives a synthetic subject by JSON-serializing the relation quad
//! and attaches the opaque id to it with a reserved predicate. The
//! serialization is a fixed four-field object with stable field order;
//! the identifier quad's subject must decode back to the relation quad
//! byte-for-byte, or the relation becomes unreachable by id.

use serde::{Deserialize, Serialize};
use tessera_quad::{
    is_reserved_predicate, meta_id_predicate, name_predicate, relation_id_predicate, GraphValue,
    Iri, Quad,
};

use crate::error::EntityError;
use crate::model::{Metadata, Node, Relation};

/// Wire form of a relation quad, used as the synthetic subject of the
/// relation identifier quad. Field order is fixed; `label` is omitted
/// when absent so re-encoding reproduces the original bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationQuad {
    /// Source node id, unescaped.
    pub subject: String,
    /// Relationship type, unescaped.
    pub predicate: String,
    /// Target node id, unescaped.
    pub object: String,
    /// Partition tag, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RelationQuad {
    /// Rebuild the physical relation quad this wire form describes.
    pub fn to_quad(&self) -> Quad {
        Quad::new(
            GraphValue::Iri(Iri::new(&self.subject)),
            GraphValue::Iri(Iri::new(&self.predicate)),
            GraphValue::Iri(Iri::new(&self.object)),
            self.label.clone().map(GraphValue::String),
        )
    }
}

fn subject_text(value: &GraphValue) -> String {
    value
        .as_text()
        .map(str::to_string)
        .unwrap_or_else(|| value.canonical())
}

/// Encode a node into its quad set: one quad per property plus the
/// reserved name quad, all labelled with the node label.
pub fn node_quads(node: &Node) -> Result<Vec<Quad>, EntityError> {
    let mut quads = Vec::with_capacity(node.properties.len() + 1);
    for (key, value) in &node.properties {
        if is_reserved_predicate(key) {
            return Err(EntityError::PropertyEncoding(format!(
                "property key '{key}' is reserved"
            )));
        }
        quads.push(Quad::new(
            GraphValue::Iri(node.id.clone()),
            GraphValue::Iri(Iri::new(key)),
            value.clone(),
            node.label.clone(),
        ));
    }
    quads.push(Quad::new(
        GraphValue::Iri(node.id.clone()),
        name_predicate(),
        GraphValue::String(node.name.clone()),
        node.label.clone(),
    ));
    Ok(quads)
}

/// Decode a quad list into a node.
///
/// The first quad's subject seeds the id; any differing subject fails
/// the decode. The label is taken from the first quad carrying one - a
/// multi-label node silently keeps the first seen.
pub fn node_from_quads(quads: &[Quad]) -> Result<Node, EntityError> {
    let mut node = Node::default();
    for quad in quads {
        let subject = subject_text(&quad.subject);
        if node.id.is_empty() {
            node.id = Iri::new(subject);
        } else if node.id.as_str() != subject {
            return Err(EntityError::InconsistentSubject {
                expected: node.id.as_str().to_string(),
                found: subject,
            });
        }
        if node.label.is_none() {
            node.label = quad.label.clone();
        }
        if quad.predicate == name_predicate() {
            node.name = quad.object.as_text().unwrap_or_default().to_string();
        } else {
            let key = quad
                .predicate
                .as_text()
                .map(str::to_string)
                .unwrap_or_else(|| quad.predicate.canonical());
            node.properties.insert(key, quad.object.clone());
        }
    }
    Ok(node)
}

/// Encode a relation into its relation quad and identifier quad.
pub fn relation_quads(relation: &Relation) -> Result<(Quad, Quad), EntityError> {
    let relation_quad = Quad::new(
        GraphValue::Iri(relation.source_id.clone()),
        GraphValue::Iri(relation.rel_type.clone()),
        GraphValue::Iri(relation.target_id.clone()),
        relation.label.clone(),
    );
    let wire = RelationQuad {
        subject: relation.source_id.as_str().to_string(),
        predicate: relation.rel_type.as_str().to_string(),
        object: relation.target_id.as_str().to_string(),
        label: relation
            .label
            .as_ref()
            .and_then(GraphValue::as_text)
            .map(str::to_string),
    };
    let encoded = serde_json::to_string(&wire).map_err(EntityError::MalformedRelationSubject)?;
    let identifier_quad = Quad::new(
        GraphValue::Iri(Iri::new(encoded)),
        relation_id_predicate(),
        GraphValue::Iri(relation.id.clone()),
        None,
    );
    Ok((relation_quad, identifier_quad))
}

/// Decode a relation from its identifier quad: the subject JSON-decodes
/// back into the relation quad, the object carries the opaque id.
pub fn relation_from_identifier_quad(quad: &Quad) -> Result<Relation, EntityError> {
    let encoded = quad.subject.as_text().unwrap_or_default();
    let wire: RelationQuad =
        serde_json::from_str(encoded).map_err(EntityError::MalformedRelationSubject)?;
    Ok(Relation {
        id: Iri::new(quad.object.as_text().unwrap_or_default()),
        source_id: Iri::new(wire.subject),
        rel_type: Iri::new(wire.predicate),
        target_id: Iri::new(wire.object),
        label: wire.label.map(GraphValue::String),
    })
}

/// Scan a quad list for the identifier quad and decode the relation.
/// The first identifier quad wins; `None` when the list has none.
pub fn relation_from_quads(quads: &[Quad]) -> Result<Option<Relation>, EntityError> {
    quads
        .iter()
        .find(|q| q.predicate == relation_id_predicate())
        .map(relation_from_identifier_quad)
        .transpose()
}

/// Encode a metadata bundle: the identifier quad binding it to its
/// relation plus one unlabelled quad per property.
pub fn metadata_quads(metadata: &Metadata) -> Result<Vec<Quad>, EntityError> {
    let mut quads = metadata_property_quads(metadata)?;
    quads.push(Quad::new(
        GraphValue::Iri(metadata.relation_id.clone()),
        meta_id_predicate(),
        GraphValue::Iri(metadata.id.clone()),
        None,
    ));
    Ok(quads)
}

/// Just the property quads of a metadata bundle, used by sparse
/// updates which leave the identifier quad untouched.
pub fn metadata_property_quads(metadata: &Metadata) -> Result<Vec<Quad>, EntityError> {
    let mut quads = Vec::with_capacity(metadata.properties.len());
    for (key, value) in &metadata.properties {
        if is_reserved_predicate(key) {
            return Err(EntityError::PropertyEncoding(format!(
                "property key '{key}' is reserved"
            )));
        }
        quads.push(Quad::new(
            GraphValue::Iri(metadata.id.clone()),
            GraphValue::Iri(Iri::new(key)),
            value.clone(),
            None,
        ));
    }
    Ok(quads)
}

/// Decode a quad list into a metadata bundle.
///
/// The identifier quad supplies the bundle id (first one wins) and the
/// owning relation id; every other quad must share the bundle id as
/// subject.
pub fn metadata_from_quads(quads: &[Quad]) -> Result<Metadata, EntityError> {
    let mut metadata = Metadata::default();
    for quad in quads {
        if quad.predicate == meta_id_predicate() {
            if metadata.id.is_empty() {
                metadata.id = Iri::new(quad.object.as_text().unwrap_or_default());
            }
            metadata.relation_id = Iri::new(subject_text(&quad.subject));
        } else {
            let subject = subject_text(&quad.subject);
            if !metadata.id.is_empty() && metadata.id.as_str() != subject {
                return Err(EntityError::InconsistentSubject {
                    expected: metadata.id.as_str().to_string(),
                    found: subject,
                });
            }
            let key = quad
                .predicate
                .as_text()
                .map(str::to_string)
                .unwrap_or_else(|| quad.predicate.canonical());
            metadata.properties.insert(key, quad.object.clone());
        }
    }
    Ok(metadata)
}
