//! The columnar attribute store underneath the structure API.
//!
//! Entities (vertices and edges) live in typed tables whose columns are
//! created on demand; each cell holds one entity's value for that column.
//! The adapter layer in [`crate::graph`] never touches records directly,
//! only the operations exposed here.

mod attribute_store;
mod table;
mod value;

pub use attribute_store::{AttributeStore, EdgeTypeRegistry, EntityKind, StoreId};
pub use table::{Column, ColumnOrigin, Table, EDGE_WEIGHT_COLUMN};
pub use value::{AttributeValue, ValueType};
