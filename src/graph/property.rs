//! Live property views.
//!
//! None of these types copy the value they expose. Each holds a handle to
//! the shared store plus enough addressing (entity handle and column id)
//! to read the current cell on every call, so a view observes later
//! writes and removals.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{GraphError, GraphResult};
use crate::store::{AttributeValue, ColumnOrigin, EntityKind, StoreId, ValueType};

use super::element::{validate_property, PROPERTY_SUFFIX};
use super::{SharedStore, Vertex};

/// A single-valued property on an edge (and the value facet of vertex
/// properties uses the same shape through [`ValueProperty`]).
#[derive(Clone)]
pub struct Property {
    store: SharedStore,
    kind: EntityKind,
    owner: StoreId,
    owner_id: String,
    key: String,
}

impl Property {
    pub(crate) fn new(
        store: SharedStore,
        kind: EntityKind,
        owner: StoreId,
        owner_id: String,
        key: String,
    ) -> Self {
        Self {
            store,
            kind,
            owner,
            owner_id,
            key,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Id of the owning element.
    pub fn element_id(&self) -> &str {
        &self.owner_id
    }

    /// The current cell value. A cleared cell reads as absent.
    pub fn value(&self) -> GraphResult<AttributeValue> {
        self.store
            .lock()
            .unwrap()
            .get_attribute(self.kind, self.owner, &self.key)
            .ok_or_else(|| GraphError::PropertyNotFound {
                kind: self.kind.noun(),
                element: self.owner_id.clone(),
                key: self.key.clone(),
            })
    }

    pub fn is_present(&self) -> bool {
        self.store
            .lock()
            .unwrap()
            .get_attribute(self.kind, self.owner, &self.key)
            .is_some()
    }

    /// Clears the cell. The column itself stays.
    pub fn remove(&self) {
        self.store
            .lock()
            .unwrap()
            .remove_attribute(self.kind, self.owner, &self.key);
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.owner == other.owner && self.key == other.key
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("kind", &self.kind)
            .field("element", &self.owner_id)
            .field("key", &self.key)
            .finish()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self
            .store
            .lock()
            .unwrap()
            .get_attribute(self.kind, self.owner, &self.key)
        {
            Some(value) => write!(f, "p[{}->{}]", self.key, value),
            None => write!(f, "p[empty]"),
        }
    }
}

/// A vertex property: the value lives in the primary column under `key`,
/// and nested properties live in the paired map-valued shadow column.
#[derive(Clone)]
pub struct VertexProperty {
    store: SharedStore,
    vertex: StoreId,
    vertex_id: String,
    key: String,
}

impl VertexProperty {
    pub(crate) fn new(
        store: SharedStore,
        vertex: StoreId,
        vertex_id: String,
        key: String,
    ) -> Self {
        Self {
            store,
            vertex,
            vertex_id,
            key,
        }
    }

    fn shadow_key(&self) -> String {
        format!("{}{}", self.key, PROPERTY_SUFFIX)
    }

    fn shadow_map(&self) -> Option<HashMap<String, AttributeValue>> {
        let store = self.store.lock().unwrap();
        match store.get_attribute(EntityKind::Vertex, self.vertex, &self.shadow_key()) {
            Some(AttributeValue::Map(map)) => Some(map),
            _ => None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Derived, stable id: the column identity hashed together with the
    /// owning vertex id.
    pub fn id(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.key.hash(&mut hasher);
        self.vertex_id.hash(&mut hasher);
        hasher.finish()
    }

    pub fn value(&self) -> GraphResult<AttributeValue> {
        self.store
            .lock()
            .unwrap()
            .get_attribute(EntityKind::Vertex, self.vertex, &self.key)
            .ok_or_else(|| GraphError::PropertyNotFound {
                kind: EntityKind::Vertex.noun(),
                element: self.vertex_id.clone(),
                key: self.key.clone(),
            })
    }

    pub fn is_present(&self) -> bool {
        self.store
            .lock()
            .unwrap()
            .get_attribute(EntityKind::Vertex, self.vertex, &self.key)
            .is_some()
    }

    /// The owning vertex.
    pub fn element(&self) -> Vertex {
        Vertex::new(self.store.clone(), self.vertex, self.vertex_id.clone())
    }

    /// Keys of the nested properties stored in the shadow map.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .shadow_map()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// A view over one nested property, if set.
    pub fn property(&self, key: &str) -> Option<ValueProperty> {
        let map = self.shadow_map()?;
        if !map.contains_key(key) {
            return None;
        }
        Some(ValueProperty {
            store: self.store.clone(),
            vertex: self.vertex,
            vertex_id: self.vertex_id.clone(),
            column: self.shadow_key(),
            key: key.to_string(),
        })
    }

    /// All nested properties, optionally filtered by key.
    pub fn properties(&self, keys: &[&str]) -> Vec<ValueProperty> {
        self.keys()
            .into_iter()
            .filter(|key| keys.is_empty() || keys.contains(&key.as_str()))
            .map(|key| ValueProperty {
                store: self.store.clone(),
                vertex: self.vertex,
                vertex_id: self.vertex_id.clone(),
                column: self.shadow_key(),
                key,
            })
            .collect()
    }

    /// Writes a nested property by re-persisting the whole shadow map.
    pub fn set_property(&self, key: &str, value: AttributeValue) -> GraphResult<ValueProperty> {
        validate_property(key, &value)?;
        {
            let mut store = self.store.lock().unwrap();
            if !store.is_valid(EntityKind::Vertex, self.vertex) {
                return Err(GraphError::ElementRemoved {
                    kind: EntityKind::Vertex.noun(),
                    id: self.vertex_id.clone(),
                });
            }
            let shadow = self.shadow_key();
            store.ensure_column(
                EntityKind::Vertex,
                &shadow,
                ValueType::Map,
                ColumnOrigin::Property,
            );
            let mut map = match store.get_attribute(EntityKind::Vertex, self.vertex, &shadow) {
                Some(AttributeValue::Map(map)) => map,
                _ => HashMap::new(),
            };
            map.insert(key.to_string(), value);
            store.set_attribute(
                EntityKind::Vertex,
                self.vertex,
                &shadow,
                AttributeValue::Map(map),
            )?;
        }
        Ok(ValueProperty {
            store: self.store.clone(),
            vertex: self.vertex,
            vertex_id: self.vertex_id.clone(),
            column: self.shadow_key(),
            key: key.to_string(),
        })
    }

    /// Clears the value cell and its shadow map together.
    pub fn remove(&self) {
        let mut store = self.store.lock().unwrap();
        store.remove_attribute(EntityKind::Vertex, self.vertex, &self.key);
        let shadow = self.shadow_key();
        store.remove_attribute(EntityKind::Vertex, self.vertex, &shadow);
    }
}

impl PartialEq for VertexProperty {
    fn eq(&self, other: &Self) -> bool {
        self.vertex == other.vertex && self.key == other.key
    }
}

impl fmt::Debug for VertexProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexProperty")
            .field("vertex", &self.vertex_id)
            .field("key", &self.key)
            .finish()
    }
}

impl fmt::Display for VertexProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self
            .store
            .lock()
            .unwrap()
            .get_attribute(EntityKind::Vertex, self.vertex, &self.key)
        {
            Some(value) => write!(f, "vp[{}->{}]", self.key, value),
            None => write!(f, "vp[empty]"),
        }
    }
}

/// A nested property inside a vertex property's shadow map.
#[derive(Clone)]
pub struct ValueProperty {
    store: SharedStore,
    vertex: StoreId,
    vertex_id: String,
    column: String,
    key: String,
}

impl ValueProperty {
    fn map(&self) -> Option<HashMap<String, AttributeValue>> {
        let store = self.store.lock().unwrap();
        match store.get_attribute(EntityKind::Vertex, self.vertex, &self.column) {
            Some(AttributeValue::Map(map)) => Some(map),
            _ => None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> GraphResult<AttributeValue> {
        self.map()
            .and_then(|mut map| map.remove(&self.key))
            .ok_or_else(|| GraphError::PropertyNotFound {
                kind: EntityKind::Vertex.noun(),
                element: self.vertex_id.clone(),
                key: self.key.clone(),
            })
    }

    pub fn is_present(&self) -> bool {
        self.map()
            .map(|map| map.contains_key(&self.key))
            .unwrap_or(false)
    }

    /// Removes this entry and re-persists the remaining map.
    pub fn remove(&self) -> GraphResult<()> {
        let mut store = self.store.lock().unwrap();
        let mut map = match store.get_attribute(EntityKind::Vertex, self.vertex, &self.column) {
            Some(AttributeValue::Map(map)) => map,
            _ => return Ok(()),
        };
        if map.remove(&self.key).is_none() {
            return Ok(());
        }
        store.set_attribute(
            EntityKind::Vertex,
            self.vertex,
            &self.column,
            AttributeValue::Map(map),
        )
    }
}

impl PartialEq for ValueProperty {
    fn eq(&self, other: &Self) -> bool {
        self.vertex == other.vertex && self.column == other.column && self.key == other.key
    }
}

impl fmt::Debug for ValueProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueProperty")
            .field("vertex", &self.vertex_id)
            .field("column", &self.column)
            .field("key", &self.key)
            .finish()
    }
}

impl fmt::Display for ValueProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.map().and_then(|mut map| map.remove(&self.key)) {
            Some(value) => write!(f, "p[{}->{}]", self.key, value),
            None => write!(f, "p[empty]"),
        }
    }
}
