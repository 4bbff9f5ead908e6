//! The vertex adapter.

use std::fmt;

use crate::error::{GraphError, GraphResult};
use crate::store::{AttributeValue, EntityKind, StoreId};

use super::element::{
    element_is_valid, element_keys, element_label, element_set_property, element_value,
    parse_key_values, require_string_id, validate_property, visible_column, Direction, Element,
};
use super::{Edge, SharedStore, VertexProperty};

/// A vertex handle. Cheap to clone; all state lives in the shared store.
///
/// The element id is cached at construction so it stays printable (and
/// usable in error messages) after the vertex is removed.
#[derive(Clone)]
pub struct Vertex {
    store: SharedStore,
    sid: StoreId,
    element_id: String,
}

impl Vertex {
    pub(crate) fn new(store: SharedStore, sid: StoreId, element_id: String) -> Self {
        Self {
            store,
            sid,
            element_id,
        }
    }

    /// Creates an outgoing edge to `target` with the given label.
    ///
    /// The key/value list may carry a `~id` entry (string ids only); the
    /// remaining pairs become edge properties. A duplicate explicit id
    /// fails before anything is written.
    pub fn add_edge(
        &self,
        label: &str,
        target: &Vertex,
        key_values: &[AttributeValue],
    ) -> GraphResult<Edge> {
        if label.is_empty() {
            return Err(GraphError::InvalidProperty(
                "edge label can not be empty".to_string(),
            ));
        }
        let parsed = parse_key_values(key_values)?;
        if parsed.label.is_some() {
            return Err(GraphError::InvalidProperty(
                "~label is not a valid key when adding an edge".to_string(),
            ));
        }
        let id = parsed
            .id
            .map(|value| require_string_id(EntityKind::Edge, &value))
            .transpose()?;
        for (key, value) in &parsed.properties {
            validate_property(key, value)?;
        }

        let (sid, element_id) = {
            let mut store = self.store.lock().unwrap();
            let edge_type = store.ensure_edge_type(label);
            let sid = store.add_edge(id, self.sid, target.sid, edge_type, label.to_string())?;
            let element_id = store
                .element_id(EntityKind::Edge, sid)
                .expect("freshly created edge is valid");
            (sid, element_id)
        };

        let edge = Edge::new(self.store.clone(), sid, element_id);
        for (key, value) in parsed.properties {
            edge.set_property_value(&key, value)?;
        }
        Ok(edge)
    }

    /// Incident edges in `direction`, optionally restricted by label.
    /// Labels with no edge type yet are skipped.
    pub fn edges(&self, direction: Direction, labels: &[&str]) -> Vec<Edge> {
        let handles = {
            let store = self.store.lock().unwrap();
            let mut sids = Vec::new();
            if labels.is_empty() {
                sids.extend(self.adjacent(&store, direction, None));
            } else {
                for label in labels {
                    if let Some(edge_type) = store.edge_type(label) {
                        sids.extend(self.adjacent(&store, direction, Some(edge_type)));
                    }
                }
            }
            sids.into_iter()
                .filter_map(|sid| {
                    store
                        .element_id(EntityKind::Edge, sid)
                        .map(|id| (sid, id))
                })
                .collect::<Vec<_>>()
        };
        handles
            .into_iter()
            .map(|(sid, id)| Edge::new(self.store.clone(), sid, id))
            .collect()
    }

    /// Neighbor vertices reached over `edges(direction, labels)`. The
    /// opposite endpoint is reported; for a self-loop that is this vertex.
    pub fn vertices(&self, direction: Direction, labels: &[&str]) -> Vec<Vertex> {
        let handles = {
            let store = self.store.lock().unwrap();
            let mut sids = Vec::new();
            if labels.is_empty() {
                sids.extend(self.adjacent(&store, direction, None));
            } else {
                for label in labels {
                    if let Some(edge_type) = store.edge_type(label) {
                        sids.extend(self.adjacent(&store, direction, Some(edge_type)));
                    }
                }
            }
            sids.into_iter()
                .filter_map(|sid| store.edge_endpoints(sid))
                .map(|(source, target)| if source == self.sid { target } else { source })
                .filter_map(|sid| {
                    store
                        .element_id(EntityKind::Vertex, sid)
                        .map(|id| (sid, id))
                })
                .collect::<Vec<_>>()
        };
        handles
            .into_iter()
            .map(|(sid, id)| Vertex::new(self.store.clone(), sid, id))
            .collect()
    }

    fn adjacent(
        &self,
        store: &crate::store::AttributeStore,
        direction: Direction,
        edge_type: Option<u32>,
    ) -> Vec<StoreId> {
        match direction {
            Direction::Out => store.out_edges(self.sid, edge_type),
            Direction::In => store.in_edges(self.sid, edge_type),
            Direction::Both => store.incident_edges(self.sid, edge_type),
        }
    }

    /// A view over the visible property under `key`, if its cell holds a
    /// value. Shadow bookkeeping columns are not addressable here.
    pub fn property(&self, key: &str) -> Option<VertexProperty> {
        {
            let store = self.store.lock().unwrap();
            let column = store.table(EntityKind::Vertex).column(key)?;
            if !visible_column(EntityKind::Vertex, key, column.origin()) {
                return None;
            }
            store.get_attribute(EntityKind::Vertex, self.sid, key)?;
        }
        Some(VertexProperty::new(
            self.store.clone(),
            self.sid,
            self.element_id.clone(),
            key.to_string(),
        ))
    }

    /// Visible properties with a value, optionally filtered by key.
    pub fn properties(&self, keys: &[&str]) -> Vec<VertexProperty> {
        let present = {
            let store = self.store.lock().unwrap();
            store
                .column_metadata(EntityKind::Vertex)
                .into_iter()
                .filter(|(id, origin)| visible_column(EntityKind::Vertex, id, *origin))
                .filter(|(id, _)| keys.is_empty() || keys.contains(&id.as_str()))
                .filter(|(id, _)| {
                    store
                        .get_attribute(EntityKind::Vertex, self.sid, id)
                        .is_some()
                })
                .map(|(id, _)| id)
                .collect::<Vec<_>>()
        };
        present
            .into_iter()
            .map(|key| {
                VertexProperty::new(
                    self.store.clone(),
                    self.sid,
                    self.element_id.clone(),
                    key,
                )
            })
            .collect()
    }

    /// Writes a vertex property, creating the primary column and its
    /// shadow column together on first use. The key/value list becomes
    /// nested properties on the new view; user-supplied property ids are
    /// not supported.
    pub fn set_vertex_property(
        &self,
        key: &str,
        value: AttributeValue,
        key_values: &[AttributeValue],
    ) -> GraphResult<VertexProperty> {
        let parsed = parse_key_values(key_values)?;
        if parsed.id.is_some() {
            return Err(GraphError::Unsupported(
                "user-supplied ids for vertex properties",
            ));
        }
        if parsed.label.is_some() {
            return Err(GraphError::InvalidProperty(
                "~label is not a valid key when adding a vertex property".to_string(),
            ));
        }
        element_set_property(
            &self.store,
            EntityKind::Vertex,
            self.sid,
            &self.element_id,
            key,
            value,
        )?;
        let property = VertexProperty::new(
            self.store.clone(),
            self.sid,
            self.element_id.clone(),
            key.to_string(),
        );
        for (nested_key, nested_value) in parsed.properties {
            property.set_property(&nested_key, nested_value)?;
        }
        Ok(property)
    }
}

impl Element for Vertex {
    fn id(&self) -> &str {
        &self.element_id
    }

    fn label(&self) -> GraphResult<String> {
        element_label(&self.store, EntityKind::Vertex, self.sid, &self.element_id)
    }

    fn is_valid(&self) -> bool {
        element_is_valid(&self.store, EntityKind::Vertex, self.sid)
    }

    fn keys(&self) -> Vec<String> {
        element_keys(&self.store, EntityKind::Vertex, self.sid)
    }

    fn value(&self, key: &str) -> GraphResult<AttributeValue> {
        element_value(
            &self.store,
            EntityKind::Vertex,
            self.sid,
            &self.element_id,
            key,
        )
    }

    fn set_property_value(&self, key: &str, value: AttributeValue) -> GraphResult<()> {
        self.set_vertex_property(key, value, &[]).map(|_| ())
    }

    fn remove(&self) -> GraphResult<()> {
        let mut store = self.store.lock().unwrap();
        if !store.is_valid(EntityKind::Vertex, self.sid) {
            return Err(GraphError::ElementRemoved {
                kind: EntityKind::Vertex.noun(),
                id: self.element_id.clone(),
            });
        }
        store.remove_node(self.sid)
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.sid == other.sid && self.element_id == other.element_id
    }
}

impl fmt::Debug for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vertex").field("id", &self.element_id).finish()
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v[{}]", self.element_id)
    }
}
