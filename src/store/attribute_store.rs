//! The columnar attribute store.
//!
//! Entities live in generation-tagged arena slots; a [`StoreId`] handed to an
//! adapter stays bound to the entity it was created for, so a stale adapter
//! can never alias a recycled slot. Attributes live in per-table columns
//! ([`super::table`]), adjacency in per-node edge-index vectors filtered by
//! the numeric edge type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, GraphResult};

use super::table::{ColumnOrigin, Table, EDGE_WEIGHT_COLUMN};
use super::value::{AttributeValue, ValueType};

/// The two entity kinds, each owning one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Vertex,
    Edge,
}

impl EntityKind {
    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::Vertex => "vertex",
            EntityKind::Edge => "edge",
        }
    }
}

/// Store-assigned handle to one entity slot. The generation is bumped when a
/// slot is reclaimed, invalidating every handle issued before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeRecord {
    id: String,
    label: String,
    out_edges: Vec<u32>,
    in_edges: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeRecord {
    id: String,
    label: String,
    edge_type: u32,
    source: u32,
    target: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    generation: u32,
    record: Option<T>,
}

/// Stable bidirectional mapping from edge label to internal numeric type.
/// A label resolves to the same type for the lifetime of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeTypeRegistry {
    by_label: HashMap<String, u32>,
    labels: Vec<String>,
}

impl EdgeTypeRegistry {
    pub fn get(&self, label: &str) -> Option<u32> {
        self.by_label.get(label).copied()
    }

    pub fn ensure(&mut self, label: &str) -> u32 {
        if let Some(edge_type) = self.by_label.get(label) {
            return *edge_type;
        }
        let edge_type = self.labels.len() as u32;
        self.labels.push(label.to_string());
        self.by_label.insert(label.to_string(), edge_type);
        edge_type
    }

    pub fn label(&self, edge_type: u32) -> Option<&str> {
        self.labels.get(edge_type as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// In-memory columnar graph store: typed tables per entity kind, directed
/// adjacency, edge type registry, and a graph-scoped attribute map. The
/// whole store serializes losslessly through serde.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeStore {
    nodes: Vec<Slot<NodeRecord>>,
    edges: Vec<Slot<EdgeRecord>>,
    node_ids: HashMap<String, u32>,
    edge_ids: HashMap<String, u32>,
    free_nodes: Vec<u32>,
    free_edges: Vec<u32>,
    node_table: Table,
    edge_table: Table,
    edge_types: EdgeTypeRegistry,
    graph_attributes: HashMap<String, AttributeValue>,
    next_element_id: u64,
}

impl AttributeStore {
    pub fn new() -> Self {
        AttributeStore {
            nodes: Vec::new(),
            edges: Vec::new(),
            node_ids: HashMap::new(),
            edge_ids: HashMap::new(),
            free_nodes: Vec::new(),
            free_edges: Vec::new(),
            node_table: Table::new(),
            edge_table: Table::with_weight_column(),
            edge_types: EdgeTypeRegistry::default(),
            graph_attributes: HashMap::new(),
            next_element_id: 0,
        }
    }

    pub fn add_node(&mut self, id: Option<String>, label: String) -> GraphResult<StoreId> {
        let id = match id {
            Some(id) => {
                if self.node_ids.contains_key(&id) {
                    return Err(GraphError::DuplicateVertexId(id));
                }
                id
            }
            None => self.generate_element_id(),
        };

        let record = NodeRecord {
            id: id.clone(),
            label,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        };
        let sid = Self::allocate(&mut self.nodes, &mut self.free_nodes, record);
        self.node_ids.insert(id, sid.index);
        Ok(sid)
    }

    pub fn node_by_id(&self, id: &str) -> Option<StoreId> {
        let index = *self.node_ids.get(id)?;
        let slot = &self.nodes[index as usize];
        Some(StoreId {
            index,
            generation: slot.generation,
        })
    }

    pub fn contains_node_id(&self, id: &str) -> bool {
        self.node_ids.contains_key(id)
    }

    /// Removes the node and every incident edge, clearing their attribute
    /// rows and invalidating all outstanding handles.
    pub fn remove_node(&mut self, sid: StoreId) -> GraphResult<()> {
        let record = self
            .node(sid)
            .ok_or_else(|| Self::removed(EntityKind::Vertex, sid))?;

        let mut incident: Vec<u32> = record.out_edges.clone();
        for edge_index in &record.in_edges {
            if !incident.contains(edge_index) {
                incident.push(*edge_index);
            }
        }
        let element_id = record.id.clone();

        for edge_index in incident {
            let generation = self.edges[edge_index as usize].generation;
            self.remove_edge(StoreId {
                index: edge_index,
                generation,
            })?;
        }

        debug!(id = %element_id, "removing node");
        self.node_table.clear_row(sid.index as usize);
        self.node_ids.remove(&element_id);
        let slot = &mut self.nodes[sid.index as usize];
        slot.record = None;
        slot.generation += 1;
        self.free_nodes.push(sid.index);
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.record.is_some()).count()
    }

    pub fn all_nodes(&self) -> Vec<StoreId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.record.is_some())
            .map(|(index, slot)| StoreId {
                index: index as u32,
                generation: slot.generation,
            })
            .collect()
    }

    /// Inserts a directed edge of a registered numeric type. The reserved
    /// weight column cell is set to the default weight 1.0.
    pub fn add_edge(
        &mut self,
        id: Option<String>,
        source: StoreId,
        target: StoreId,
        edge_type: u32,
        label: String,
    ) -> GraphResult<StoreId> {
        if self.node(source).is_none() {
            return Err(Self::removed(EntityKind::Vertex, source));
        }
        if self.node(target).is_none() {
            return Err(Self::removed(EntityKind::Vertex, target));
        }

        let id = match id {
            Some(id) => {
                if self.edge_ids.contains_key(&id) {
                    return Err(GraphError::DuplicateEdgeId(id));
                }
                id
            }
            None => self.generate_element_id(),
        };

        let record = EdgeRecord {
            id: id.clone(),
            label,
            edge_type,
            source: source.index,
            target: target.index,
        };
        let sid = Self::allocate(&mut self.edges, &mut self.free_edges, record);
        self.edge_ids.insert(id, sid.index);

        if let Some(node) = self.node_record_mut(source.index) {
            node.out_edges.push(sid.index);
        }
        if let Some(node) = self.node_record_mut(target.index) {
            node.in_edges.push(sid.index);
        }

        self.edge_table
            .column_mut(EDGE_WEIGHT_COLUMN)
            .expect("edge table always carries the weight column")
            .set(sid.index as usize, AttributeValue::Float(1.0))?;
        Ok(sid)
    }

    pub fn edge_by_id(&self, id: &str) -> Option<StoreId> {
        let index = *self.edge_ids.get(id)?;
        let slot = &self.edges[index as usize];
        Some(StoreId {
            index,
            generation: slot.generation,
        })
    }

    pub fn contains_edge_id(&self, id: &str) -> bool {
        self.edge_ids.contains_key(id)
    }

    pub fn remove_edge(&mut self, sid: StoreId) -> GraphResult<()> {
        let record = self
            .edge(sid)
            .ok_or_else(|| Self::removed(EntityKind::Edge, sid))?;
        let element_id = record.id.clone();
        let (source, target) = (record.source, record.target);

        if let Some(node) = self.node_record_mut(source) {
            node.out_edges.retain(|&index| index != sid.index);
        }
        if let Some(node) = self.node_record_mut(target) {
            node.in_edges.retain(|&index| index != sid.index);
        }

        debug!(id = %element_id, "removing edge");
        self.edge_table.clear_row(sid.index as usize);
        self.edge_ids.remove(&element_id);
        let slot = &mut self.edges[sid.index as usize];
        slot.record = None;
        slot.generation += 1;
        self.free_edges.push(sid.index);
        Ok(())
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|slot| slot.record.is_some()).count()
    }

    pub fn all_edges(&self) -> Vec<StoreId> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.record.is_some())
            .map(|(index, slot)| StoreId {
                index: index as u32,
                generation: slot.generation,
            })
            .collect()
    }

    /// Source and target of a live edge, as live node handles.
    pub fn edge_endpoints(&self, sid: StoreId) -> Option<(StoreId, StoreId)> {
        let record = self.edge(sid)?;
        Some((
            self.node_handle(record.source),
            self.node_handle(record.target),
        ))
    }

    pub fn out_edges(&self, node: StoreId, edge_type: Option<u32>) -> Vec<StoreId> {
        self.adjacent(node, edge_type, |record| &record.out_edges)
    }

    pub fn in_edges(&self, node: StoreId, edge_type: Option<u32>) -> Vec<StoreId> {
        self.adjacent(node, edge_type, |record| &record.in_edges)
    }

    /// All incident edges (outgoing then incoming); a self-loop contributes
    /// one entry.
    pub fn incident_edges(&self, node: StoreId, edge_type: Option<u32>) -> Vec<StoreId> {
        let mut result = self.out_edges(node, edge_type);
        for sid in self.in_edges(node, edge_type) {
            if !result.contains(&sid) {
                result.push(sid);
            }
        }
        result
    }

    pub fn is_valid(&self, kind: EntityKind, sid: StoreId) -> bool {
        match kind {
            EntityKind::Vertex => self.node(sid).is_some(),
            EntityKind::Edge => self.edge(sid).is_some(),
        }
    }

    pub fn element_id(&self, kind: EntityKind, sid: StoreId) -> Option<String> {
        match kind {
            EntityKind::Vertex => self.node(sid).map(|record| record.id.clone()),
            EntityKind::Edge => self.edge(sid).map(|record| record.id.clone()),
        }
    }

    pub fn label(&self, kind: EntityKind, sid: StoreId) -> Option<String> {
        match kind {
            EntityKind::Vertex => self.node(sid).map(|record| record.label.clone()),
            EntityKind::Edge => self.edge(sid).map(|record| record.label.clone()),
        }
    }

    pub fn table(&self, kind: EntityKind) -> &Table {
        match kind {
            EntityKind::Vertex => &self.node_table,
            EntityKind::Edge => &self.edge_table,
        }
    }

    pub fn ensure_column(
        &mut self,
        kind: EntityKind,
        id: &str,
        value_type: ValueType,
        origin: ColumnOrigin,
    ) {
        self.table_mut(kind).ensure_column(id, value_type, origin);
    }

    pub fn get_attribute(
        &self,
        kind: EntityKind,
        sid: StoreId,
        key: &str,
    ) -> Option<AttributeValue> {
        if !self.is_valid(kind, sid) {
            return None;
        }
        self.table(kind)
            .column(key)
            .and_then(|column| column.get(sid.index as usize))
            .cloned()
    }

    /// Writes into an existing column. Column creation is the adapter
    /// layer's call, through [`AttributeStore::ensure_column`].
    pub fn set_attribute(
        &mut self,
        kind: EntityKind,
        sid: StoreId,
        key: &str,
        value: AttributeValue,
    ) -> GraphResult<()> {
        if !self.is_valid(kind, sid) {
            return Err(Self::removed(kind, sid));
        }
        let column = self.table_mut(kind).column_mut(key).ok_or_else(|| {
            GraphError::InvalidProperty(format!("no column {} to write into", key))
        })?;
        column.set(sid.index as usize, value)
    }

    pub fn remove_attribute(&mut self, kind: EntityKind, sid: StoreId, key: &str) {
        if !self.is_valid(kind, sid) {
            return;
        }
        if let Some(column) = self.table_mut(kind).column_mut(key) {
            column.clear(sid.index as usize);
        }
    }

    /// Column ids with their origin, in creation order.
    pub fn column_metadata(&self, kind: EntityKind) -> Vec<(String, ColumnOrigin)> {
        self.table(kind)
            .columns()
            .map(|column| (column.id().to_string(), column.origin()))
            .collect()
    }

    pub fn graph_attribute_keys(&self) -> Vec<String> {
        self.graph_attributes.keys().cloned().collect()
    }

    pub fn graph_attribute(&self, key: &str) -> Option<AttributeValue> {
        self.graph_attributes.get(key).cloned()
    }

    pub fn set_graph_attribute(&mut self, key: String, value: AttributeValue) {
        self.graph_attributes.insert(key, value);
    }

    pub fn remove_graph_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.graph_attributes.remove(key)
    }

    pub fn edge_type(&self, label: &str) -> Option<u32> {
        self.edge_types.get(label)
    }

    pub fn ensure_edge_type(&mut self, label: &str) -> u32 {
        self.edge_types.ensure(label)
    }

    pub fn edge_type_label(&self, edge_type: u32) -> Option<&str> {
        self.edge_types.label(edge_type)
    }

    fn table_mut(&mut self, kind: EntityKind) -> &mut Table {
        match kind {
            EntityKind::Vertex => &mut self.node_table,
            EntityKind::Edge => &mut self.edge_table,
        }
    }

    fn node(&self, sid: StoreId) -> Option<&NodeRecord> {
        let slot = self.nodes.get(sid.index as usize)?;
        if slot.generation != sid.generation {
            return None;
        }
        slot.record.as_ref()
    }

    fn edge(&self, sid: StoreId) -> Option<&EdgeRecord> {
        let slot = self.edges.get(sid.index as usize)?;
        if slot.generation != sid.generation {
            return None;
        }
        slot.record.as_ref()
    }

    fn node_record_mut(&mut self, index: u32) -> Option<&mut NodeRecord> {
        self.nodes
            .get_mut(index as usize)
            .and_then(|slot| slot.record.as_mut())
    }

    fn node_handle(&self, index: u32) -> StoreId {
        StoreId {
            index,
            generation: self.nodes[index as usize].generation,
        }
    }

    fn adjacent(
        &self,
        node: StoreId,
        edge_type: Option<u32>,
        list: impl Fn(&NodeRecord) -> &Vec<u32>,
    ) -> Vec<StoreId> {
        let Some(record) = self.node(node) else {
            return Vec::new();
        };
        list(record)
            .iter()
            .filter(|&&index| match edge_type {
                Some(wanted) => self.edges[index as usize]
                    .record
                    .as_ref()
                    .is_some_and(|edge| edge.edge_type == wanted),
                None => true,
            })
            .map(|&index| StoreId {
                index,
                generation: self.edges[index as usize].generation,
            })
            .collect()
    }

    fn allocate<T>(slots: &mut Vec<Slot<T>>, free: &mut Vec<u32>, record: T) -> StoreId {
        if let Some(index) = free.pop() {
            let slot = &mut slots[index as usize];
            slot.record = Some(record);
            StoreId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = slots.len() as u32;
            slots.push(Slot {
                generation: 0,
                record: Some(record),
            });
            StoreId {
                index,
                generation: 0,
            }
        }
    }

    fn generate_element_id(&mut self) -> String {
        loop {
            let candidate = self.next_element_id.to_string();
            self.next_element_id += 1;
            if !self.node_ids.contains_key(&candidate) && !self.edge_ids.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    fn removed(kind: EntityKind, sid: StoreId) -> GraphError {
        GraphError::ElementRemoved {
            kind: kind.noun(),
            id: format!("#{}", sid.index),
        }
    }
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new()
    }
}
