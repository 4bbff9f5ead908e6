//! colgraph: a property-graph API over a columnar attribute store.
//!
//! Vertices and edges are rows; their properties are cells in lazily
//! created, per-kind typed columns. The graph surface follows the usual
//! structure contract (vertices, edges, properties, graph variables,
//! feature probing, serialization), while the storage keeps the columnar
//! shape: columns are created on first write, typed by their first
//! value, and survive element removal.
//!
//! # Example
//!
//! ```
//! use colgraph::{Element, Graph, GraphConfig};
//!
//! # fn main() -> colgraph::GraphResult<()> {
//! let graph = Graph::open(GraphConfig::new())?;
//! let alice = graph.add_vertex(&["~id".into(), "alice".into()])?;
//! let bob = graph.add_vertex(&["~id".into(), "bob".into()])?;
//! let knows = alice.add_edge("knows", &bob, &[])?;
//! assert_eq!(knows.value("weight")?, 1.0f64.into());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod io;
pub mod store;

pub use config::{GraphConfig, GraphFormat};
pub use error::{GraphError, GraphResult};
pub use graph::{
    Direction, Edge, EdgeSelector, Element, Features, Graph, Property, ValueProperty, Variables,
    Vertex, VertexProperty, VertexSelector, DEFAULT_VERTEX_LABEL,
};
pub use io::{GraphIo, SerializationBridge};
pub use store::{AttributeStore, AttributeValue, ValueType};

/// Library version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
