//! End-to-end tests for the graph structure surface: element creation,
//! lookup, traversal, properties, and removal.

use colgraph::{
    AttributeValue, Direction, Element, Graph, GraphConfig, GraphError, DEFAULT_VERTEX_LABEL,
};

fn empty_graph() -> Graph {
    Graph::open(GraphConfig::new()).unwrap()
}

#[test]
fn test_add_vertex_with_id_label_and_properties() {
    let graph = empty_graph();
    let vertex = graph
        .add_vertex(&[
            "~id".into(),
            "alice".into(),
            "~label".into(),
            "person".into(),
            "name".into(),
            "Alice".into(),
            "age".into(),
            30i64.into(),
        ])
        .unwrap();

    assert_eq!(vertex.id(), "alice");
    assert_eq!(vertex.label().unwrap(), "person");
    assert_eq!(vertex.value("name").unwrap(), "Alice".into());
    assert_eq!(vertex.value("age").unwrap(), 30i64.into());

    let mut keys = vertex.keys();
    keys.sort();
    assert_eq!(keys, vec!["age".to_string(), "name".to_string()]);
}

#[test]
fn test_add_vertex_defaults() {
    let graph = empty_graph();
    let vertex = graph.add_vertex(&[]).unwrap();
    assert_eq!(vertex.label().unwrap(), DEFAULT_VERTEX_LABEL);
    assert!(!vertex.id().is_empty());
    assert!(vertex.keys().is_empty());
}

#[test]
fn test_add_vertex_duplicate_id_fails_without_side_effects() {
    let graph = empty_graph();
    graph.add_vertex(&["~id".into(), "a".into()]).unwrap();
    let err = graph.add_vertex(&["~id".into(), "a".into()]);
    assert!(matches!(err, Err(GraphError::DuplicateVertexId(id)) if id == "a"));
    assert_eq!(graph.vertex_count(), 1);
}

#[test]
fn test_add_vertex_rejects_non_string_ids() {
    let graph = empty_graph();
    let err = graph.add_vertex(&["~id".into(), 42i64.into()]);
    assert!(matches!(err, Err(GraphError::IdTypeNotSupported { .. })));
}

#[test]
fn test_add_vertex_rejects_malformed_key_values() {
    let graph = empty_graph();
    assert!(matches!(
        graph.add_vertex(&["name".into()]),
        Err(GraphError::InvalidProperty(_))
    ));
    assert!(matches!(
        graph.add_vertex(&[1i64.into(), "x".into()]),
        Err(GraphError::InvalidProperty(_))
    ));
}

#[test]
fn test_vertex_lookup_modes() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["~id".into(), "a".into()]).unwrap();
    graph.add_vertex(&["~id".into(), "b".into()]).unwrap();

    assert_eq!(graph.vertices(&[]).unwrap().len(), 2);

    let by_id = graph.vertices(&["a".into()]).unwrap();
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].id(), "a");

    let by_element = graph.vertices(&[a.clone().into()]).unwrap();
    assert_eq!(by_element.len(), 1);
    assert_eq!(by_element[0].id(), "a");

    // Unknown ids are dropped, not errors.
    let missing = graph.vertices(&["nope".into()]).unwrap();
    assert!(missing.is_empty());
}

#[test]
fn test_lookup_rejects_mixed_arguments() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["~id".into(), "a".into()]).unwrap();

    let mixed = graph.vertices(&[a.into(), "b".into()]);
    assert!(matches!(mixed, Err(GraphError::MixedIdArguments)));

    let mixed_types = graph.vertices(&["a".into(), AttributeValue::Integer(1).into()]);
    assert!(matches!(mixed_types, Err(GraphError::MixedIdArguments)));
}

#[test]
fn test_add_edge_carries_default_weight() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["~id".into(), "a".into()]).unwrap();
    let b = graph.add_vertex(&["~id".into(), "b".into()]).unwrap();

    let edge = a.add_edge("knows", &b, &["since".into(), 2020i64.into()]).unwrap();
    assert_eq!(edge.label().unwrap(), "knows");
    assert_eq!(edge.value("weight").unwrap(), 1.0f64.into());
    assert_eq!(edge.value("since").unwrap(), 2020i64.into());

    let mut keys = edge.keys();
    keys.sort();
    assert_eq!(keys, vec!["since".to_string(), "weight".to_string()]);
}

#[test]
fn test_add_edge_explicit_and_duplicate_ids() {
    let graph = empty_graph();
    let a = graph.add_vertex(&[]).unwrap();
    let b = graph.add_vertex(&[]).unwrap();

    let edge = a.add_edge("knows", &b, &["~id".into(), "e1".into()]).unwrap();
    assert_eq!(edge.id(), "e1");

    let dup = a.add_edge("knows", &b, &["~id".into(), "e1".into()]);
    assert!(matches!(dup, Err(GraphError::DuplicateEdgeId(id)) if id == "e1"));

    let bad = a.add_edge("knows", &b, &["~id".into(), 7i64.into()]);
    assert!(matches!(bad, Err(GraphError::IdTypeNotSupported { .. })));

    let empty = a.add_edge("", &b, &[]);
    assert!(matches!(empty, Err(GraphError::InvalidProperty(_))));
}

#[test]
fn test_edge_lookup_modes() {
    let graph = empty_graph();
    let a = graph.add_vertex(&[]).unwrap();
    let b = graph.add_vertex(&[]).unwrap();
    let e = a.add_edge("knows", &b, &["~id".into(), "e1".into()]).unwrap();
    a.add_edge("likes", &b, &[]).unwrap();

    assert_eq!(graph.edges(&[]).unwrap().len(), 2);
    assert_eq!(graph.edges(&["e1".into()]).unwrap().len(), 1);
    assert_eq!(graph.edges(&[e.into()]).unwrap().len(), 1);
    assert!(graph.edges(&["nope".into()]).unwrap().is_empty());
}

#[test]
fn test_traversal_by_direction_and_label() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["~id".into(), "a".into()]).unwrap();
    let b = graph.add_vertex(&["~id".into(), "b".into()]).unwrap();
    let c = graph.add_vertex(&["~id".into(), "c".into()]).unwrap();

    a.add_edge("knows", &b, &[]).unwrap();
    a.add_edge("likes", &c, &[]).unwrap();
    c.add_edge("knows", &a, &[]).unwrap();

    assert_eq!(a.edges(Direction::Out, &[]).len(), 2);
    assert_eq!(a.edges(Direction::In, &[]).len(), 1);
    assert_eq!(a.edges(Direction::Both, &[]).len(), 3);
    assert_eq!(a.edges(Direction::Out, &["knows"]).len(), 1);

    // A label no edge ever used resolves to nothing rather than failing.
    assert!(a.edges(Direction::Out, &["hates"]).is_empty());

    let out_neighbors: Vec<String> = a
        .vertices(Direction::Out, &[])
        .into_iter()
        .map(|v| v.id().to_string())
        .collect();
    assert!(out_neighbors.contains(&"b".to_string()));
    assert!(out_neighbors.contains(&"c".to_string()));

    let in_neighbors = a.vertices(Direction::In, &["knows"]);
    assert_eq!(in_neighbors.len(), 1);
    assert_eq!(in_neighbors[0].id(), "c");
}

#[test]
fn test_self_loop_counts_once_in_both() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["~id".into(), "a".into()]).unwrap();
    a.add_edge("self", &a, &[]).unwrap();

    assert_eq!(a.edges(Direction::Out, &[]).len(), 1);
    assert_eq!(a.edges(Direction::In, &[]).len(), 1);
    assert_eq!(a.edges(Direction::Both, &[]).len(), 1);

    let neighbors = a.vertices(Direction::Both, &[]);
    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0].id(), "a");
}

#[test]
fn test_edge_endpoints() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["~id".into(), "a".into()]).unwrap();
    let b = graph.add_vertex(&["~id".into(), "b".into()]).unwrap();
    let e = a.add_edge("knows", &b, &[]).unwrap();

    assert_eq!(e.out_vertex().unwrap().id(), "a");
    assert_eq!(e.in_vertex().unwrap().id(), "b");
    let both: Vec<String> = e
        .vertices(Direction::Both)
        .unwrap()
        .into_iter()
        .map(|v| v.id().to_string())
        .collect();
    assert_eq!(both, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_remove_vertex_cascades_to_incident_edges() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["~id".into(), "a".into()]).unwrap();
    let b = graph.add_vertex(&["~id".into(), "b".into()]).unwrap();
    let e = a.add_edge("knows", &b, &[]).unwrap();

    b.remove().unwrap();
    assert_eq!(graph.vertex_count(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert!(!e.is_valid());
    assert!(a.edges(Direction::Out, &[]).is_empty());

    // The removed handle still prints its id and reports the removal.
    assert_eq!(b.id(), "b");
    assert!(matches!(b.label(), Err(GraphError::ElementRemoved { .. })));
    assert!(matches!(b.remove(), Err(GraphError::ElementRemoved { .. })));
    assert!(matches!(
        b.set_property_value("name", "x".into()),
        Err(GraphError::ElementRemoved { .. })
    ));
}

#[test]
fn test_stale_handle_does_not_alias_reused_slot() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["~id".into(), "a".into()]).unwrap();
    a.remove().unwrap();

    // Freed slots are reused for new vertices; the old handle must not
    // see the newcomer's state.
    let b = graph.add_vertex(&["~id".into(), "b".into()]).unwrap();
    b.set_property_value("name", "B".into()).unwrap();

    assert!(!a.is_valid());
    assert!(b.is_valid());
    assert!(matches!(
        a.value("name"),
        Err(GraphError::PropertyNotFound { .. })
    ));
}

#[test]
fn test_columns_survive_element_removal() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["name".into(), "A".into()]).unwrap();
    let b = graph.add_vertex(&[]).unwrap();
    a.remove().unwrap();

    // The column outlives its only writer and accepts new values.
    b.set_property_value("name", "B".into()).unwrap();
    assert_eq!(b.value("name").unwrap(), "B".into());
}

#[test]
fn test_column_type_fixed_by_first_value() {
    let graph = empty_graph();
    let a = graph.add_vertex(&[]).unwrap();
    a.set_property_value("age", 30i64.into()).unwrap();
    let err = a.set_property_value("age", "thirty".into());
    assert!(matches!(err, Err(GraphError::InvalidProperty(_))));
    assert_eq!(a.value("age").unwrap(), 30i64.into());
}

#[test]
fn test_vertex_property_views_and_meta_properties() {
    let graph = empty_graph();
    let a = graph.add_vertex(&[]).unwrap();

    let vp = a
        .set_vertex_property("name", "Alice".into(), &["source".into(), "census".into()])
        .unwrap();
    assert_eq!(vp.key(), "name");
    assert_eq!(vp.value().unwrap(), "Alice".into());
    assert_eq!(vp.keys(), vec!["source".to_string()]);

    let nested = vp.property("source").unwrap();
    assert_eq!(nested.value().unwrap(), "census".into());

    vp.set_property("confidence", 0.9f64.into()).unwrap();
    assert_eq!(
        vp.keys(),
        vec!["confidence".to_string(), "source".to_string()]
    );

    nested.remove().unwrap();
    assert!(vp.property("source").is_none());
    assert_eq!(vp.keys(), vec!["confidence".to_string()]);

    // The shadow bookkeeping never shows up as a vertex property.
    assert_eq!(a.keys(), vec!["name".to_string()]);
    assert!(a.property("name_properties").is_none());

    // Removing the property clears the value and its nested map together.
    vp.remove();
    assert!(a.property("name").is_none());
    assert!(a.keys().is_empty());
}

#[test]
fn test_shadow_column_not_addressable_as_property() {
    let graph = empty_graph();
    let a = graph.add_vertex(&[]).unwrap();
    a.set_vertex_property("name", "Alice".into(), &["source".into(), "census".into()])
        .unwrap();

    // The shadow cell now holds the nested map, but it is bookkeeping,
    // not a vertex property.
    assert!(a.property("name_properties").is_none());
    assert!(matches!(
        a.value("name_properties"),
        Err(GraphError::PropertyNotFound { .. })
    ));
    assert_eq!(a.keys(), vec!["name".to_string()]);
    assert_eq!(a.properties(&[]).len(), 1);
}

#[test]
fn test_vertex_property_ids_are_stable_per_key_and_vertex() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["~id".into(), "a".into()]).unwrap();
    let b = graph.add_vertex(&["~id".into(), "b".into()]).unwrap();

    let ap = a.set_vertex_property("name", "A".into(), &[]).unwrap();
    let bp = b.set_vertex_property("name", "B".into(), &[]).unwrap();
    assert_eq!(ap.id(), a.property("name").unwrap().id());
    assert_ne!(ap.id(), bp.id());
}

#[test]
fn test_vertex_property_rejects_user_supplied_ids() {
    let graph = empty_graph();
    let a = graph.add_vertex(&[]).unwrap();
    let err = a.set_vertex_property("name", "A".into(), &["~id".into(), "p1".into()]);
    assert!(matches!(err, Err(GraphError::Unsupported(_))));
}

#[test]
fn test_edge_property_view_follows_cell_state() {
    let graph = empty_graph();
    let a = graph.add_vertex(&[]).unwrap();
    let b = graph.add_vertex(&[]).unwrap();
    let e = a.add_edge("knows", &b, &[]).unwrap();

    let weight = e.property("weight").unwrap();
    assert!(weight.is_present());
    assert_eq!(weight.value().unwrap(), 1.0f64.into());

    e.set_property("weight", 2.5f64.into()).unwrap();
    assert_eq!(weight.value().unwrap(), 2.5f64.into());

    weight.remove();
    assert!(!weight.is_present());
    assert!(matches!(
        weight.value(),
        Err(GraphError::PropertyNotFound { .. })
    ));

    // The column still exists, so the view is still obtainable.
    assert!(e.property("weight").is_some());
    assert!(e.property("missing").is_none());
}

#[test]
fn test_property_validation() {
    let graph = empty_graph();
    let a = graph.add_vertex(&[]).unwrap();
    assert!(matches!(
        a.set_property_value("", "x".into()),
        Err(GraphError::InvalidProperty(_))
    ));
    assert!(matches!(
        a.set_property_value("k", AttributeValue::Null),
        Err(GraphError::InvalidProperty(_))
    ));
}

#[test]
fn test_graph_variables() {
    let graph = empty_graph();
    let vars = graph.variables();
    vars.set("creator", "tests".into()).unwrap();
    assert_eq!(vars.get("creator"), Some("tests".into()));
    assert_eq!(vars.keys(), vec!["creator".to_string()]);
    vars.remove("creator");
    assert!(vars.keys().is_empty());
}

#[test]
fn test_features_and_unsupported_operations() {
    let graph = empty_graph();
    assert!(graph.features().vertex.will_allow_id(&"ok".into()));
    assert!(!graph.features().vertex.will_allow_id(&1i64.into()));
    assert!(!graph.features().graph.supports_transactions());

    assert!(matches!(graph.tx(), Err(GraphError::Unsupported(_))));
    assert!(matches!(graph.compute(), Err(GraphError::Unsupported(_))));
}

#[test]
fn test_display_formats() {
    let graph = empty_graph();
    let a = graph.add_vertex(&["~id".into(), "a".into()]).unwrap();
    let b = graph.add_vertex(&["~id".into(), "b".into()]).unwrap();
    let e = a.add_edge("knows", &b, &["~id".into(), "e1".into()]).unwrap();

    assert_eq!(a.to_string(), "v[a]");
    assert_eq!(e.to_string(), "e[e1][a-knows->b]");
    assert_eq!(graph.to_string(), "colgraph[vertices:2,edges:1]");

    let vp = a.set_vertex_property("name", "A".into(), &[]).unwrap();
    assert_eq!(vp.to_string(), "vp[name->A]");

    let weight = e.property("weight").unwrap();
    assert_eq!(weight.to_string(), "p[weight->1]");
}
