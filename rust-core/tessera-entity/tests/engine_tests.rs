// SPDX-License-Identifier: MIT
//! End-to-end tests for the mutation and lookup engines over the
//! in-memory store.

use std::collections::BTreeMap;
use std::sync::Arc;

use tessera_entity::codec;
use tessera_entity::{EntityService, LookupService, Metadata, Node, Relation};
use tessera_quad::{name_predicate, GraphValue, Iri, Quad};
use tessera_store::{MemoryQuadStore, QuadStore};

fn services() -> (Arc<MemoryQuadStore>, EntityService, LookupService) {
    let store = Arc::new(MemoryQuadStore::new());
    let entities = EntityService::new(store.clone());
    let lookup = LookupService::new(store.clone());
    (store, entities, lookup)
}

fn raw(s: &str) -> GraphValue {
    GraphValue::Raw(s.to_string())
}

#[tokio::test]
async fn create_node_persists_property_and_name_quads() {
    let (store, entities, lookup) = services();

    let node = Node {
        id: Iri::default(),
        name: "node create test".into(),
        label: Some(GraphValue::String("test".into())),
        properties: BTreeMap::from([
            ("type".to_string(), raw("acedfs:process")),
            ("color".to_string(), raw("orange")),
            ("amount".to_string(), GraphValue::Float(11.11)),
        ]),
    };

    let quads = entities.create_node(&node).await.unwrap();
    assert_eq!(quads.len(), 4);
    assert!(quads
        .iter()
        .all(|q| q.label == Some(GraphValue::String("test".into()))));
    assert_eq!(store.len().unwrap(), 4);

    let id = Iri::new(quads[0].subject.as_text().unwrap());
    assert!(!id.is_empty());

    let stored = lookup.quads_by_subject(&id).await.unwrap();
    let decoded = codec::node_from_quads(&stored).unwrap();
    assert_eq!(decoded.name, "node create test");
    assert_eq!(decoded.label, Some(GraphValue::String("test".into())));
    assert_eq!(decoded.properties.get("amount"), Some(&GraphValue::Float(11.11)));
    assert_eq!(decoded.properties.get("color"), Some(&raw("orange")));
    assert_eq!(decoded.properties.get("type"), Some(&raw("acedfs:process")));
}

#[tokio::test]
async fn partial_update_leaves_other_properties_intact() {
    let (_store, entities, lookup) = services();

    let node = Node {
        name: "painting".into(),
        properties: BTreeMap::from([
            ("color".to_string(), raw("yellow")),
            ("style".to_string(), raw("abstract")),
        ]),
        ..Node::default()
    };
    let created = entities.create_node(&node).await.unwrap();
    let id = Iri::new(created[0].subject.as_text().unwrap());

    let patch = Node {
        id: id.clone(),
        name: "painting".into(),
        properties: BTreeMap::from([("year".to_string(), raw("1946"))]),
        ..Node::default()
    };
    entities.update_node(&patch).await.unwrap();

    let decoded = codec::node_from_quads(&lookup.quads_by_subject(&id).await.unwrap()).unwrap();
    assert_eq!(decoded.properties.get("color"), Some(&raw("yellow")));
    assert_eq!(decoded.properties.get("style"), Some(&raw("abstract")));
    assert_eq!(decoded.properties.get("year"), Some(&raw("1946")));
}

#[tokio::test]
async fn add_or_replace_is_single_valued_per_predicate() {
    let (store, entities, _lookup) = services();
    let subject = GraphValue::Iri(Iri::new("n1"));
    let predicate = GraphValue::Iri(Iri::new("color"));

    let first = Quad::new(subject.clone(), predicate.clone(), raw("orange"), None);
    let second = Quad::new(subject.clone(), predicate.clone(), raw("yellow"), None);
    entities.add_or_replace(&first).await.unwrap();
    entities.add_or_replace(&second).await.unwrap();
    entities.add_or_replace(&second).await.unwrap();

    let found = store
        .quads_by(tessera_quad::Direction::Subject, &subject)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].object, raw("yellow"));
}

#[tokio::test]
async fn update_with_empty_name_does_not_clear_name() {
    let (_store, entities, lookup) = services();

    let node = Node {
        name: "keep me".into(),
        properties: BTreeMap::from([("color".to_string(), raw("red"))]),
        ..Node::default()
    };
    let created = entities.create_node(&node).await.unwrap();
    let id = Iri::new(created[0].subject.as_text().unwrap());

    let patch = Node {
        id: id.clone(),
        name: String::new(),
        properties: BTreeMap::from([("color".to_string(), raw("blue"))]),
        ..Node::default()
    };
    let staged = entities.update_node(&patch).await.unwrap();
    assert!(staged.iter().all(|q| q.predicate != name_predicate()));

    let decoded = codec::node_from_quads(&lookup.quads_by_subject(&id).await.unwrap()).unwrap();
    assert_eq!(decoded.name, "keep me");
    assert_eq!(decoded.properties.get("color"), Some(&raw("blue")));
}

#[tokio::test]
async fn relation_create_and_lookup() {
    let (_store, entities, lookup) = services();

    let relation = Relation {
        source_id: Iri::new("123456789"),
        rel_type: Iri::new("pavedthewayfor"),
        target_id: Iri::new("234567890"),
        ..Relation::default()
    };
    let created = entities.create_relation(&relation).await.unwrap();
    assert!(!created.id.is_empty());

    let found = lookup.relation_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(found.source_id.as_str(), "123456789");
    assert_eq!(found.rel_type.as_str(), "pavedthewayfor");
    assert_eq!(found.target_id.as_str(), "234567890");
    assert_eq!(found.id, created.id);

    let missing = lookup.relation_by_id(&Iri::new("nonexistent")).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn caller_supplied_relation_id_is_overwritten() {
    let (_store, entities, _lookup) = services();
    let relation = Relation {
        id: Iri::new("my-chosen-id"),
        source_id: Iri::new("a"),
        rel_type: Iri::new("knows"),
        target_id: Iri::new("b"),
        ..Relation::default()
    };
    let created = entities.create_relation(&relation).await.unwrap();
    assert_ne!(created.id.as_str(), "my-chosen-id");
}

#[tokio::test]
async fn relation_cascade_delete_removes_metadata() {
    let (store, entities, lookup) = services();

    let relation = entities
        .create_relation(&Relation {
            source_id: Iri::new("a"),
            rel_type: Iri::new("knows"),
            target_id: Iri::new("b"),
            ..Relation::default()
        })
        .await
        .unwrap();

    let metadata = entities
        .create_metadata(&Metadata {
            relation_id: relation.id.clone(),
            properties: BTreeMap::from([("reviewed".to_string(), GraphValue::Bool(true))]),
            ..Metadata::default()
        })
        .await
        .unwrap();

    // relation quad + identifier quad + metadata identifier + property
    assert_eq!(store.len().unwrap(), 4);

    entities.delete_relation(&relation.id).await.unwrap();
    assert_eq!(store.len().unwrap(), 0);

    assert!(lookup.relation_by_id(&relation.id).await.unwrap().is_none());
    assert!(lookup
        .metadata_quads_by_id(&metadata.id)
        .await
        .unwrap()
        .is_empty());
    assert!(lookup
        .metadata_quads_by_relation(&relation.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn metadata_create_lookup_and_update() {
    let (_store, entities, lookup) = services();

    let relation = entities
        .create_relation(&Relation {
            source_id: Iri::new("a"),
            rel_type: Iri::new("cites"),
            target_id: Iri::new("b"),
            ..Relation::default()
        })
        .await
        .unwrap();

    let metadata = entities
        .create_metadata(&Metadata {
            relation_id: relation.id.clone(),
            properties: BTreeMap::from([("weight".to_string(), GraphValue::Float(0.5))]),
            ..Metadata::default()
        })
        .await
        .unwrap();

    let quads = lookup.metadata_quads_by_id(&metadata.id).await.unwrap();
    let decoded = codec::metadata_from_quads(&quads).unwrap();
    assert_eq!(decoded.id, metadata.id);
    assert_eq!(decoded.relation_id, relation.id);
    assert_eq!(decoded.properties.get("weight"), Some(&GraphValue::Float(0.5)));

    let patch = Metadata {
        id: metadata.id.clone(),
        relation_id: relation.id.clone(),
        properties: BTreeMap::from([
            ("weight".to_string(), GraphValue::Float(0.7)),
            ("source".to_string(), raw("manual")),
        ]),
    };
    entities.update_metadata(&patch).await.unwrap();

    let decoded = codec::metadata_from_quads(
        &lookup.metadata_quads_by_id(&metadata.id).await.unwrap(),
    )
    .unwrap();
    assert_eq!(decoded.properties.get("weight"), Some(&GraphValue::Float(0.7)));
    assert_eq!(decoded.properties.get("source"), Some(&raw("manual")));
}

#[tokio::test]
async fn multiple_metadata_bundles_aggregate_flat() {
    let (_store, entities, lookup) = services();

    let relation = entities
        .create_relation(&Relation {
            source_id: Iri::new("a"),
            rel_type: Iri::new("cites"),
            target_id: Iri::new("b"),
            ..Relation::default()
        })
        .await
        .unwrap();

    for key in ["first", "second"] {
        entities
            .create_metadata(&Metadata {
                relation_id: relation.id.clone(),
                properties: BTreeMap::from([(key.to_string(), raw("v"))]),
                ..Metadata::default()
            })
            .await
            .unwrap();
    }

    // two identifier quads plus one property quad per bundle
    let quads = lookup
        .metadata_quads_by_relation(&relation.id)
        .await
        .unwrap();
    assert_eq!(quads.len(), 4);
}

#[tokio::test]
async fn delete_by_id_removes_every_reference() {
    let (store, entities, lookup) = services();

    let node = Node {
        name: "target".into(),
        properties: BTreeMap::from([("color".to_string(), raw("green"))]),
        ..Node::default()
    };
    let created = entities.create_node(&node).await.unwrap();
    let id = Iri::new(created[0].subject.as_text().unwrap());

    // an edge pointing at the node from elsewhere
    store
        .add_quad(&Quad::new(
            GraphValue::Iri(Iri::new("other")),
            GraphValue::Iri(Iri::new("references")),
            GraphValue::Iri(id.clone()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(lookup.quads_touching(&id).await.unwrap().len(), 3);

    entities.delete_by_id(&id).await.unwrap();
    assert!(lookup.quads_touching(&id).await.unwrap().is_empty());
    assert!(lookup.quads_by_subject(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_one_relation_leaves_others_alone() {
    let (_store, entities, lookup) = services();

    let keep = entities
        .create_relation(&Relation {
            source_id: Iri::new("a"),
            rel_type: Iri::new("knows"),
            target_id: Iri::new("b"),
            ..Relation::default()
        })
        .await
        .unwrap();
    let drop = entities
        .create_relation(&Relation {
            source_id: Iri::new("c"),
            rel_type: Iri::new("knows"),
            target_id: Iri::new("d"),
            ..Relation::default()
        })
        .await
        .unwrap();

    entities.delete_relation(&drop.id).await.unwrap();

    assert!(lookup.relation_by_id(&drop.id).await.unwrap().is_none());
    let survivor = lookup.relation_by_id(&keep.id).await.unwrap().unwrap();
    assert_eq!(survivor.source_id.as_str(), "a");
}
