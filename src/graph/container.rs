//! The graph container: entry point for element creation, lookup, and
//! lifecycle.

use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::config::{GraphConfig, GraphFormat};
use crate::error::{GraphError, GraphResult};
use crate::io::{load_store, save_store, GraphIo};
use crate::store::{AttributeStore, AttributeValue, EntityKind};

use super::element::{
    parse_key_values, require_string_id, validate_property, Element, DEFAULT_VERTEX_LABEL,
};
use super::{Edge, Features, SharedStore, Variables, Vertex};

/// A vertex lookup argument: either a handle from this graph or an id
/// value.
#[derive(Debug, Clone)]
pub enum VertexSelector {
    Element(Vertex),
    Id(AttributeValue),
}

impl From<Vertex> for VertexSelector {
    fn from(vertex: Vertex) -> Self {
        VertexSelector::Element(vertex)
    }
}

impl From<&str> for VertexSelector {
    fn from(id: &str) -> Self {
        VertexSelector::Id(id.into())
    }
}

impl From<String> for VertexSelector {
    fn from(id: String) -> Self {
        VertexSelector::Id(id.into())
    }
}

impl From<AttributeValue> for VertexSelector {
    fn from(id: AttributeValue) -> Self {
        VertexSelector::Id(id)
    }
}

/// An edge lookup argument, mirroring [`VertexSelector`].
#[derive(Debug, Clone)]
pub enum EdgeSelector {
    Element(Edge),
    Id(AttributeValue),
}

impl From<Edge> for EdgeSelector {
    fn from(edge: Edge) -> Self {
        EdgeSelector::Element(edge)
    }
}

impl From<&str> for EdgeSelector {
    fn from(id: &str) -> Self {
        EdgeSelector::Id(id.into())
    }
}

impl From<String> for EdgeSelector {
    fn from(id: String) -> Self {
        EdgeSelector::Id(id.into())
    }
}

impl From<AttributeValue> for EdgeSelector {
    fn from(id: AttributeValue) -> Self {
        EdgeSelector::Id(id)
    }
}

/// A property graph over a columnar attribute store.
///
/// The store is behind an `Arc<Mutex<_>>`, so element handles stay usable
/// while the graph itself moves around. Dropping the graph without
/// calling [`Graph::close`] discards unsaved changes.
pub struct Graph {
    store: SharedStore,
    config: GraphConfig,
    features: Features,
}

impl Graph {
    /// Opens a graph. With persistence configured and an existing file at
    /// the location, the stored snapshot is loaded; otherwise the graph
    /// starts empty.
    pub fn open(config: GraphConfig) -> GraphResult<Self> {
        let store = match config.persistence()? {
            Some((path, format)) if path.is_file() => {
                let store = load_store(path, format)?;
                info!(
                    path = %path.display(),
                    %format,
                    vertices = store.node_count(),
                    edges = store.edge_count(),
                    "loaded graph"
                );
                store
            }
            _ => AttributeStore::new(),
        };
        Ok(Self::from_store(store, config))
    }

    pub(crate) fn from_store(store: AttributeStore, config: GraphConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config,
            features: Features::new(),
        }
    }

    pub(crate) fn shared_store(&self) -> &SharedStore {
        &self.store
    }

    /// Creates a vertex from a flat key/value list. `~id` must be a
    /// string and free; `~label` defaults to `vertex`; the remaining
    /// pairs become properties. A duplicate id fails before any state
    /// changes.
    pub fn add_vertex(&self, key_values: &[AttributeValue]) -> GraphResult<Vertex> {
        let parsed = parse_key_values(key_values)?;
        let id = parsed
            .id
            .map(|value| require_string_id(EntityKind::Vertex, &value))
            .transpose()?;
        let label = parsed
            .label
            .unwrap_or_else(|| DEFAULT_VERTEX_LABEL.to_string());
        for (key, value) in &parsed.properties {
            validate_property(key, value)?;
        }

        let (sid, element_id) = {
            let mut store = self.store.lock().unwrap();
            let sid = store.add_node(id, label)?;
            let element_id = store
                .element_id(EntityKind::Vertex, sid)
                .expect("freshly created vertex is valid");
            (sid, element_id)
        };

        let vertex = Vertex::new(self.store.clone(), sid, element_id);
        for (key, value) in parsed.properties {
            vertex.set_vertex_property(&key, value, &[])?;
        }
        Ok(vertex)
    }

    /// Looks up vertices. No arguments yields every vertex; otherwise the
    /// arguments must be homogeneous (all handles, or all ids of one
    /// type). Ids with no match are silently dropped.
    pub fn vertices(&self, selectors: &[VertexSelector]) -> GraphResult<Vec<Vertex>> {
        if selectors.is_empty() {
            let handles = {
                let store = self.store.lock().unwrap();
                store
                    .all_nodes()
                    .into_iter()
                    .filter_map(|sid| {
                        store
                            .element_id(EntityKind::Vertex, sid)
                            .map(|id| (sid, id))
                    })
                    .collect::<Vec<_>>()
            };
            return Ok(handles
                .into_iter()
                .map(|(sid, id)| Vertex::new(self.store.clone(), sid, id))
                .collect());
        }

        let ids = Self::selector_ids(selectors, |selector| match selector {
            VertexSelector::Element(vertex) => Ok(vertex.id().to_string()),
            VertexSelector::Id(_) => Err(()),
        })?;

        let store = self.store.lock().unwrap();
        Ok(ids
            .into_iter()
            .filter_map(|id| store.node_by_id(&id).map(|sid| (sid, id)))
            .map(|(sid, id)| Vertex::new(self.store.clone(), sid, id))
            .collect())
    }

    /// Looks up edges, with the same argument rules as
    /// [`Graph::vertices`].
    pub fn edges(&self, selectors: &[EdgeSelector]) -> GraphResult<Vec<Edge>> {
        if selectors.is_empty() {
            let handles = {
                let store = self.store.lock().unwrap();
                store
                    .all_edges()
                    .into_iter()
                    .filter_map(|sid| {
                        store.element_id(EntityKind::Edge, sid).map(|id| (sid, id))
                    })
                    .collect::<Vec<_>>()
            };
            return Ok(handles
                .into_iter()
                .map(|(sid, id)| Edge::new(self.store.clone(), sid, id))
                .collect());
        }

        let ids = Self::selector_ids(selectors, |selector| match selector {
            EdgeSelector::Element(edge) => Ok(edge.id().to_string()),
            EdgeSelector::Id(_) => Err(()),
        })?;

        let store = self.store.lock().unwrap();
        Ok(ids
            .into_iter()
            .filter_map(|id| store.edge_by_id(&id).map(|sid| (sid, id)))
            .map(|(sid, id)| Edge::new(self.store.clone(), sid, id))
            .collect())
    }

    /// Enforces argument homogeneity and extracts lookup ids. `element`
    /// maps a handle argument to its id, or signals that the argument is
    /// an id value instead.
    fn selector_ids<S>(
        selectors: &[S],
        element: impl Fn(&S) -> Result<String, ()>,
    ) -> GraphResult<Vec<String>>
    where
        S: SelectorValue,
    {
        let elements = element(&selectors[0]).is_ok();
        let mut ids = Vec::with_capacity(selectors.len());
        let mut first_value: Option<mem::Discriminant<AttributeValue>> = None;
        for selector in selectors {
            match element(selector) {
                Ok(id) => {
                    if !elements {
                        return Err(GraphError::MixedIdArguments);
                    }
                    ids.push(id);
                }
                Err(()) => {
                    if elements {
                        return Err(GraphError::MixedIdArguments);
                    }
                    let value = selector
                        .id_value()
                        .expect("non-element selector carries an id value");
                    let discriminant = mem::discriminant(value);
                    match first_value {
                        Some(first) if first != discriminant => {
                            return Err(GraphError::MixedIdArguments)
                        }
                        Some(_) => {}
                        None => first_value = Some(discriminant),
                    }
                    // Only string ids can match anything in the store.
                    if let Some(id) = value.as_string() {
                        ids.push(id.to_string());
                    }
                }
            }
        }
        Ok(ids)
    }

    pub fn vertex_count(&self) -> usize {
        self.store.lock().unwrap().node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.store.lock().unwrap().edge_count()
    }

    /// Graph-scoped variables.
    pub fn variables(&self) -> Variables {
        Variables::new(self.store.clone())
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Serialization entry point for the given format.
    pub fn io(&self, format: GraphFormat) -> GraphIo {
        GraphIo::new(self.store.clone(), format)
    }

    /// Graph computations are not provided.
    pub fn compute(&self) -> GraphResult<()> {
        Err(GraphError::Unsupported("graph computer"))
    }

    /// Transactions are not provided; every mutation applies immediately.
    pub fn tx(&self) -> GraphResult<()> {
        Err(GraphError::Unsupported("transactions"))
    }

    /// Closes the graph, saving a snapshot when persistence is
    /// configured. Without a configured location this is a no-op.
    pub fn close(self) -> GraphResult<()> {
        if let Some((path, format)) = self.config.persistence()? {
            let store = self.store.lock().unwrap();
            save_store(&store, path, format)?;
            info!(
                path = %path.display(),
                %format,
                vertices = store.node_count(),
                edges = store.edge_count(),
                "saved graph"
            );
        }
        Ok(())
    }
}

/// Internal hook letting [`Graph::selector_ids`] read the id value out of
/// either selector enum.
trait SelectorValue {
    fn id_value(&self) -> Option<&AttributeValue>;
}

impl SelectorValue for VertexSelector {
    fn id_value(&self) -> Option<&AttributeValue> {
        match self {
            VertexSelector::Element(_) => None,
            VertexSelector::Id(value) => Some(value),
        }
    }
}

impl SelectorValue for EdgeSelector {
    fn id_value(&self) -> Option<&AttributeValue> {
        match self {
            EdgeSelector::Element(_) => None,
            EdgeSelector::Id(value) => Some(value),
        }
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.lock().unwrap();
        write!(
            f,
            "colgraph[vertices:{},edges:{}]",
            store.node_count(),
            store.edge_count()
        )
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.lock().unwrap();
        f.debug_struct("Graph")
            .field("vertices", &store.node_count())
            .field("edges", &store.edge_count())
            .field("config", &self.config)
            .finish()
    }
}
