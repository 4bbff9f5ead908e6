//! The edge adapter.

use std::fmt;

use crate::error::{GraphError, GraphResult};
use crate::store::{AttributeValue, EntityKind, StoreId};

use super::element::{
    element_is_valid, element_keys, element_label, element_set_property, element_value,
    visible_column, Direction, Element,
};
use super::{Property, SharedStore, Vertex};

/// A directed edge handle. Cheap to clone; all state lives in the shared
/// store.
#[derive(Clone)]
pub struct Edge {
    store: SharedStore,
    sid: StoreId,
    element_id: String,
}

impl Edge {
    pub(crate) fn new(store: SharedStore, sid: StoreId, element_id: String) -> Self {
        Self {
            store,
            sid,
            element_id,
        }
    }

    /// The tail (source) vertex.
    pub fn out_vertex(&self) -> GraphResult<Vertex> {
        self.endpoint(true)
    }

    /// The head (target) vertex.
    pub fn in_vertex(&self) -> GraphResult<Vertex> {
        self.endpoint(false)
    }

    fn endpoint(&self, out: bool) -> GraphResult<Vertex> {
        let (sid, id) = {
            let store = self.store.lock().unwrap();
            let (source, target) =
                store
                    .edge_endpoints(self.sid)
                    .ok_or_else(|| GraphError::ElementRemoved {
                        kind: EntityKind::Edge.noun(),
                        id: self.element_id.clone(),
                    })?;
            let sid = if out { source } else { target };
            let id = store
                .element_id(EntityKind::Vertex, sid)
                .expect("endpoints of a live edge are live");
            (sid, id)
        };
        Ok(Vertex::new(self.store.clone(), sid, id))
    }

    /// Endpoint vertices: `Out` yields the source, `In` the target, and
    /// `Both` the pair in source, target order.
    pub fn vertices(&self, direction: Direction) -> GraphResult<Vec<Vertex>> {
        match direction {
            Direction::Out => Ok(vec![self.out_vertex()?]),
            Direction::In => Ok(vec![self.in_vertex()?]),
            Direction::Both => Ok(vec![self.out_vertex()?, self.in_vertex()?]),
        }
    }

    /// A view over the property under `key`. The view exists as soon as
    /// the column does, even if this edge's cell is empty.
    pub fn property(&self, key: &str) -> Option<Property> {
        {
            let store = self.store.lock().unwrap();
            if !store.table(EntityKind::Edge).contains_column(key) {
                return None;
            }
        }
        Some(Property::new(
            self.store.clone(),
            EntityKind::Edge,
            self.sid,
            self.element_id.clone(),
            key.to_string(),
        ))
    }

    /// Visible properties with a value, optionally filtered by key.
    pub fn properties(&self, keys: &[&str]) -> Vec<Property> {
        let present = {
            let store = self.store.lock().unwrap();
            store
                .column_metadata(EntityKind::Edge)
                .into_iter()
                .filter(|(id, origin)| visible_column(EntityKind::Edge, id, *origin))
                .filter(|(id, _)| keys.is_empty() || keys.contains(&id.as_str()))
                .filter(|(id, _)| {
                    store
                        .get_attribute(EntityKind::Edge, self.sid, id)
                        .is_some()
                })
                .map(|(id, _)| id)
                .collect::<Vec<_>>()
        };
        present
            .into_iter()
            .map(|key| {
                Property::new(
                    self.store.clone(),
                    EntityKind::Edge,
                    self.sid,
                    self.element_id.clone(),
                    key,
                )
            })
            .collect()
    }

    /// Writes a property and returns a view over it.
    pub fn set_property(&self, key: &str, value: AttributeValue) -> GraphResult<Property> {
        element_set_property(
            &self.store,
            EntityKind::Edge,
            self.sid,
            &self.element_id,
            key,
            value,
        )?;
        Ok(Property::new(
            self.store.clone(),
            EntityKind::Edge,
            self.sid,
            self.element_id.clone(),
            key.to_string(),
        ))
    }
}

impl Element for Edge {
    fn id(&self) -> &str {
        &self.element_id
    }

    fn label(&self) -> GraphResult<String> {
        element_label(&self.store, EntityKind::Edge, self.sid, &self.element_id)
    }

    fn is_valid(&self) -> bool {
        element_is_valid(&self.store, EntityKind::Edge, self.sid)
    }

    fn keys(&self) -> Vec<String> {
        element_keys(&self.store, EntityKind::Edge, self.sid)
    }

    fn value(&self, key: &str) -> GraphResult<AttributeValue> {
        element_value(
            &self.store,
            EntityKind::Edge,
            self.sid,
            &self.element_id,
            key,
        )
    }

    fn set_property_value(&self, key: &str, value: AttributeValue) -> GraphResult<()> {
        self.set_property(key, value).map(|_| ())
    }

    fn remove(&self) -> GraphResult<()> {
        let mut store = self.store.lock().unwrap();
        if !store.is_valid(EntityKind::Edge, self.sid) {
            return Err(GraphError::ElementRemoved {
                kind: EntityKind::Edge.noun(),
                id: self.element_id.clone(),
            });
        }
        store.remove_edge(self.sid)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.sid == other.sid && self.element_id == other.element_id
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge").field("id", &self.element_id).finish()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.lock().unwrap();
        let label = store
            .label(EntityKind::Edge, self.sid)
            .unwrap_or_default();
        let endpoints = store.edge_endpoints(self.sid).and_then(|(source, target)| {
            let source = store.element_id(EntityKind::Vertex, source)?;
            let target = store.element_id(EntityKind::Vertex, target)?;
            Some((source, target))
        });
        match endpoints {
            Some((source, target)) => write!(
                f,
                "e[{}][{}-{}->{}]",
                self.element_id, source, label, target
            ),
            None => write!(f, "e[{}][removed]", self.element_id),
        }
    }
}
