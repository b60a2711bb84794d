// SPDX-License-Identifier: MIT
//! Entity structs and their flat wire JSON.
//!
//! On the wire an entity is a flat JSON object: the fixed fields
//! (`id`, `name`, `label`, ...) sit next to the user property keys,
//! and the property map is expanded at the top level rather than
//! nested. Deserialization peels off the fixed fields and coerces
//! every remaining key through the total JSON-to-graph-value
//! coercion; unsupported value shapes fail the whole parse.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tessera_quad::{GraphValue, Iri};

/// A node: a named entity with a free-form property map.
///
/// Stored as one quad per property plus a reserved name quad, all
/// sharing the node id as subject and the node label as partition tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    /// Entity id; assigned by the store layer on create.
    pub id: Iri,
    /// Display name, stored under the reserved name predicate.
    pub name: String,
    /// Optional partition tag, stored redundantly on every quad.
    pub label: Option<GraphValue>,
    /// User properties.
    pub properties: BTreeMap<String, GraphValue>,
}

/// A relation: a typed edge between two nodes.
///
/// Stored as exactly one relation quad plus one synthetic identifier
/// quad; the relation quad's own fields carry no unique handle, so the
/// identifier quad attaches the opaque id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relation {
    /// Opaque id; always server-assigned, caller values are ignored.
    pub id: Iri,
    /// Source node id.
    pub source_id: Iri,
    /// Relationship type.
    pub rel_type: Iri,
    /// Target node id.
    pub target_id: Iri,
    /// Optional partition tag.
    pub label: Option<GraphValue>,
}

/// A metadata bundle attached to a relation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Bundle id; assigned by the store layer on create.
    pub id: Iri,
    /// Id of the owning relation.
    pub relation_id: Iri,
    /// User properties.
    pub properties: BTreeMap<String, GraphValue>,
}

fn take_string<E: de::Error>(
    map: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<Option<String>, E> {
    match map.remove(key) {
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Null) | None => Ok(None),
        Some(other) => Err(E::custom(format!("field '{key}' must be a string, got {other}"))),
    }
}

fn take_properties<E: de::Error>(
    map: serde_json::Map<String, serde_json::Value>,
) -> Result<BTreeMap<String, GraphValue>, E> {
    let mut properties = BTreeMap::new();
    for (key, value) in map {
        let coerced = GraphValue::from_json(&value).map_err(E::custom)?;
        properties.insert(key, coerced);
    }
    Ok(properties)
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = serde_json::Map::deserialize(deserializer)?;
        let id = take_string(&mut map, "id")?.map(Iri::new).unwrap_or_default();
        let label = take_string(&mut map, "label")?.map(GraphValue::String);
        let name = take_string(&mut map, "name")?.unwrap_or_default();
        let properties = take_properties(map)?;
        Ok(Node { id, name, label, properties })
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", self.id.as_str())?;
        map.serialize_entry("label", &self.label.as_ref().map(GraphValue::to_json))?;
        map.serialize_entry("name", &self.name)?;
        for (key, value) in &self.properties {
            map.serialize_entry(key, &value.to_json())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Relation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = serde_json::Map::deserialize(deserializer)?;
        let id = take_string(&mut map, "id")?.map(Iri::new).unwrap_or_default();
        let source_id = take_string(&mut map, "sourceId")?.map(Iri::new).unwrap_or_default();
        let rel_type = take_string(&mut map, "type")?.map(Iri::new).unwrap_or_default();
        let target_id = take_string(&mut map, "targetId")?.map(Iri::new).unwrap_or_default();
        let label = take_string(&mut map, "label")?.map(GraphValue::String);
        Ok(Relation { id, source_id, rel_type, target_id, label })
    }
}

impl Serialize for Relation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("id", self.id.as_str())?;
        map.serialize_entry("sourceId", self.source_id.as_str())?;
        map.serialize_entry("type", self.rel_type.as_str())?;
        map.serialize_entry("targetId", self.target_id.as_str())?;
        map.serialize_entry("label", &self.label.as_ref().map(GraphValue::to_json))?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = serde_json::Map::deserialize(deserializer)?;
        let id = take_string(&mut map, "id")?.map(Iri::new).unwrap_or_default();
        let relation_id = take_string(&mut map, "relationId")?.map(Iri::new).unwrap_or_default();
        let properties = take_properties(map)?;
        Ok(Metadata { id, relation_id, properties })
    }
}

impl Serialize for Metadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", self.id.as_str())?;
        map.serialize_entry("relationId", self.relation_id.as_str())?;
        for (key, value) in &self.properties {
            map.serialize_entry(key, &value.to_json())?;
        }
        map.end()
    }
}
