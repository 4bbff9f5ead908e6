//! Behavior shared by the vertex and edge adapters.
//!
//! There is no base type: the common logic lives in free functions
//! parameterized by [`EntityKind`], which decides the table and which
//! columns count as visible properties for that kind.

use crate::error::{GraphError, GraphResult};
use crate::store::{AttributeValue, ColumnOrigin, EntityKind, StoreId, EDGE_WEIGHT_COLUMN};

use super::SharedStore;

/// Traversal direction relative to a vertex, or endpoint selection on an
/// edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Out,
    In,
    Both,
}

/// Reserved key selecting the element id in a key/value list.
pub const ID_TOKEN: &str = "~id";
/// Reserved key selecting the element label in a key/value list.
pub const LABEL_TOKEN: &str = "~label";
/// Label applied to vertices created without an explicit one.
pub const DEFAULT_VERTEX_LABEL: &str = "vertex";
/// Suffix pairing a vertex property column with its shadow column.
pub(crate) const PROPERTY_SUFFIX: &str = "_properties";

/// Property access shared by [`super::Vertex`] and [`super::Edge`].
pub trait Element {
    /// The user-visible element id. Stays readable after removal.
    fn id(&self) -> &str;

    /// The element label, read from the store.
    fn label(&self) -> GraphResult<String>;

    /// False once the underlying entity was removed.
    fn is_valid(&self) -> bool;

    /// Ids of visible columns holding a non-null value for this element.
    fn keys(&self) -> Vec<String>;

    /// The value under `key`; absent column or null cell is an error.
    fn value(&self, key: &str) -> GraphResult<AttributeValue>;

    /// Writes `key = value`, creating the column on first use.
    fn set_property_value(&self, key: &str, value: AttributeValue) -> GraphResult<()>;

    /// Deletes the entity from the store.
    fn remove(&self) -> GraphResult<()>;
}

/// Key/value list split into its reserved tokens and plain properties.
#[derive(Debug, Default)]
pub(crate) struct ParsedKeyValues {
    pub id: Option<AttributeValue>,
    pub label: Option<String>,
    pub properties: Vec<(String, AttributeValue)>,
}

/// Validates the flat key/value list: even arity, string keys, reserved
/// token extraction.
pub(crate) fn parse_key_values(key_values: &[AttributeValue]) -> GraphResult<ParsedKeyValues> {
    if key_values.len() % 2 != 0 {
        return Err(GraphError::InvalidProperty(
            "key/value pairs must come in an even number of arguments".to_string(),
        ));
    }
    let mut parsed = ParsedKeyValues::default();
    for pair in key_values.chunks_exact(2) {
        let key = pair[0].as_string().ok_or_else(|| {
            GraphError::InvalidProperty(format!(
                "property key must be a string, found {}",
                pair[0].type_name()
            ))
        })?;
        let value = pair[1].clone();
        match key {
            ID_TOKEN => parsed.id = Some(value),
            LABEL_TOKEN => {
                let label = value.as_string().ok_or_else(|| {
                    GraphError::InvalidProperty(format!(
                        "label must be a string, found {}",
                        value.type_name()
                    ))
                })?;
                parsed.label = Some(label.to_string());
            }
            _ => parsed.properties.push((key.to_string(), value)),
        }
    }
    Ok(parsed)
}

/// Ids are user-suppliable only as strings; everything else is rejected.
pub(crate) fn require_string_id(kind: EntityKind, value: &AttributeValue) -> GraphResult<String> {
    match value {
        AttributeValue::String(id) => Ok(id.clone()),
        other => Err(GraphError::IdTypeNotSupported {
            kind: kind.noun(),
            type_name: other.type_name(),
        }),
    }
}

/// Shared legality rules for property keys and values.
pub(crate) fn validate_property(key: &str, value: &AttributeValue) -> GraphResult<()> {
    if key.is_empty() {
        return Err(GraphError::InvalidProperty(
            "property key can not be empty".to_string(),
        ));
    }
    if value.is_null() {
        return Err(GraphError::InvalidProperty(format!(
            "property value for key {} can not be null",
            key
        )));
    }
    Ok(())
}

/// Whether a column is a visible property for the given entity kind.
/// Vertices hide property-bookkeeping (shadow) columns; edges additionally
/// expose the reserved weight column.
pub(crate) fn visible_column(kind: EntityKind, id: &str, origin: ColumnOrigin) -> bool {
    match kind {
        EntityKind::Vertex => origin == ColumnOrigin::Data,
        EntityKind::Edge => origin == ColumnOrigin::Data || id == EDGE_WEIGHT_COLUMN,
    }
}

pub(crate) fn element_keys(store: &SharedStore, kind: EntityKind, sid: StoreId) -> Vec<String> {
    let store = store.lock().unwrap();
    store
        .column_metadata(kind)
        .into_iter()
        .filter(|(id, origin)| visible_column(kind, id, *origin))
        .filter(|(id, _)| store.get_attribute(kind, sid, id).is_some())
        .map(|(id, _)| id)
        .collect()
}

pub(crate) fn element_value(
    store: &SharedStore,
    kind: EntityKind,
    sid: StoreId,
    element_id: &str,
    key: &str,
) -> GraphResult<AttributeValue> {
    let store = store.lock().unwrap();
    store
        .table(kind)
        .column(key)
        .filter(|column| visible_column(kind, key, column.origin()))
        .and_then(|_| store.get_attribute(kind, sid, key))
        .ok_or_else(|| GraphError::PropertyNotFound {
            kind: kind.noun(),
            element: element_id.to_string(),
            key: key.to_string(),
        })
}

/// Writes a property, creating its column (and for vertices the paired
/// shadow column) lazily on first use.
pub(crate) fn element_set_property(
    store: &SharedStore,
    kind: EntityKind,
    sid: StoreId,
    element_id: &str,
    key: &str,
    value: AttributeValue,
) -> GraphResult<()> {
    validate_property(key, &value)?;
    let value_type = value
        .value_type()
        .expect("null values rejected by validate_property");

    let mut store = store.lock().unwrap();
    if !store.is_valid(kind, sid) {
        return Err(GraphError::ElementRemoved {
            kind: kind.noun(),
            id: element_id.to_string(),
        });
    }
    store.ensure_column(kind, key, value_type, ColumnOrigin::Data);
    if kind == EntityKind::Vertex {
        let shadow = format!("{}{}", key, PROPERTY_SUFFIX);
        store.ensure_column(
            kind,
            &shadow,
            crate::store::ValueType::Map,
            ColumnOrigin::Property,
        );
    }
    store.set_attribute(kind, sid, key, value)
}

pub(crate) fn element_label(
    store: &SharedStore,
    kind: EntityKind,
    sid: StoreId,
    element_id: &str,
) -> GraphResult<String> {
    store
        .lock()
        .unwrap()
        .label(kind, sid)
        .ok_or_else(|| GraphError::ElementRemoved {
            kind: kind.noun(),
            id: element_id.to_string(),
        })
}

pub(crate) fn element_is_valid(store: &SharedStore, kind: EntityKind, sid: StoreId) -> bool {
    store.lock().unwrap().is_valid(kind, sid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_values_extracts_tokens() {
        let parsed = parse_key_values(&[
            ID_TOKEN.into(),
            "a".into(),
            LABEL_TOKEN.into(),
            "person".into(),
            "name".into(),
            "alice".into(),
        ])
        .unwrap();
        assert_eq!(parsed.id, Some("a".into()));
        assert_eq!(parsed.label.as_deref(), Some("person"));
        assert_eq!(parsed.properties, vec![("name".to_string(), "alice".into())]);
    }

    #[test]
    fn test_parse_key_values_odd_arity() {
        let err = parse_key_values(&["name".into()]);
        assert!(matches!(err, Err(GraphError::InvalidProperty(_))));
    }

    #[test]
    fn test_parse_key_values_non_string_key() {
        let err = parse_key_values(&[42i64.into(), "x".into()]);
        assert!(matches!(err, Err(GraphError::InvalidProperty(_))));
    }

    #[test]
    fn test_require_string_id() {
        assert_eq!(
            require_string_id(EntityKind::Vertex, &"a".into()).unwrap(),
            "a"
        );
        let err = require_string_id(EntityKind::Vertex, &42i64.into());
        assert!(matches!(err, Err(GraphError::IdTypeNotSupported { .. })));
    }

    #[test]
    fn test_validate_property() {
        assert!(validate_property("name", &"alice".into()).is_ok());
        assert!(validate_property("", &"alice".into()).is_err());
        assert!(validate_property("name", &AttributeValue::Null).is_err());
    }

    #[test]
    fn test_visible_column_per_kind() {
        assert!(visible_column(EntityKind::Vertex, "name", ColumnOrigin::Data));
        assert!(!visible_column(
            EntityKind::Vertex,
            "name_properties",
            ColumnOrigin::Property
        ));
        assert!(visible_column(
            EntityKind::Edge,
            EDGE_WEIGHT_COLUMN,
            ColumnOrigin::Property
        ));
        assert!(!visible_column(
            EntityKind::Edge,
            "name_properties",
            ColumnOrigin::Property
        ));
    }
}
