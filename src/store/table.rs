//! Tables and columns.
//!
//! Each entity kind owns one [`Table`]: an insertion-ordered set of columns
//! keyed by unique string id. Columns are created lazily on first write and
//! never destroyed; removing an entity only clears its cells. A column's
//! value type is fixed at creation from the first written value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

use super::value::{AttributeValue, ValueType};

/// Column id reserved in the edge table for the edge weight.
pub const EDGE_WEIGHT_COLUMN: &str = "weight";

/// Whether a column is a plain attribute column or internal property
/// bookkeeping (shadow columns, the reserved weight column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnOrigin {
    Data,
    Property,
}

/// One named, typed attribute slot holding a cell per entity index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    id: String,
    origin: ColumnOrigin,
    value_type: ValueType,
    cells: Vec<Option<AttributeValue>>,
}

impl Column {
    fn new(id: String, value_type: ValueType, origin: ColumnOrigin) -> Self {
        Column {
            id,
            origin,
            value_type,
            cells: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> ColumnOrigin {
        self.origin
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_property(&self) -> bool {
        self.origin == ColumnOrigin::Property
    }

    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.cells.get(index).and_then(|cell| cell.as_ref())
    }

    pub fn set(&mut self, index: usize, value: AttributeValue) -> GraphResult<()> {
        match value.value_type() {
            Some(value_type) if value_type == self.value_type => {}
            Some(_) => {
                return Err(GraphError::InvalidProperty(format!(
                    "column {} holds {:?} values, not {}",
                    self.id,
                    self.value_type,
                    value.type_name()
                )))
            }
            None => {
                return Err(GraphError::InvalidProperty(format!(
                    "column {} can not hold a null value",
                    self.id
                )))
            }
        }
        if index >= self.cells.len() {
            self.cells.resize(index + 1, None);
        }
        self.cells[index] = Some(value);
        Ok(())
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = None;
        }
    }
}

/// The ordered column set for one entity kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    columns: IndexMap<String, Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edge tables carry the reserved weight column from the start.
    pub fn with_weight_column() -> Self {
        let mut table = Table::new();
        table.ensure_column(EDGE_WEIGHT_COLUMN, ValueType::Float, ColumnOrigin::Property);
        table
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.get(id)
    }

    pub fn column_mut(&mut self, id: &str) -> Option<&mut Column> {
        self.columns.get_mut(id)
    }

    /// Looks up or lazily creates a column. The type and origin of an
    /// existing column are left untouched.
    pub fn ensure_column(
        &mut self,
        id: &str,
        value_type: ValueType,
        origin: ColumnOrigin,
    ) -> &mut Column {
        self.columns
            .entry(id.to_string())
            .or_insert_with(|| Column::new(id.to_string(), value_type, origin))
    }

    pub fn contains_column(&self, id: &str) -> bool {
        self.columns.contains_key(id)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Clears every cell of one entity. Called on entity removal so a
    /// recycled slot never leaks stale attributes.
    pub fn clear_row(&mut self, index: usize) {
        for column in self.columns.values_mut() {
            column.clear(index);
        }
    }
}
