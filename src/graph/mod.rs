//! The property-graph surface over the columnar store.
//!
//! Everything here is an adapter: vertices, edges, and property views
//! hold a shared handle plus a store id, and translate graph operations
//! into table reads and writes. State lives only in
//! [`crate::store::AttributeStore`].

use std::sync::{Arc, Mutex};

use crate::store::AttributeStore;

mod container;
mod edge;
mod element;
mod features;
mod property;
mod variables;
mod vertex;

pub use container::{EdgeSelector, Graph, VertexSelector};
pub use edge::Edge;
pub use element::{Direction, Element, DEFAULT_VERTEX_LABEL, ID_TOKEN, LABEL_TOKEN};
pub use features::{
    EdgeFeatures, Features, GraphFeatures, PropertyFeatures, VariableFeatures, VertexFeatures,
};
pub use property::{Property, ValueProperty, VertexProperty};
pub use variables::Variables;
pub use vertex::Vertex;

/// One store shared by a graph and all element adapters derived from it.
pub(crate) type SharedStore = Arc<Mutex<AttributeStore>>;
