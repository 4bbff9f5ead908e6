//! Graph-scoped variables, stored next to the element tables.

use crate::error::{GraphError, GraphResult};
use crate::store::AttributeValue;

use super::SharedStore;

/// Key/value pairs attached to the graph as a whole.
#[derive(Clone)]
pub struct Variables {
    store: SharedStore,
}

impl Variables {
    pub(crate) fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All variable keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.store.lock().unwrap().graph_attribute_keys();
        keys.sort();
        keys
    }

    pub fn get(&self, key: &str) -> Option<AttributeValue> {
        self.store.lock().unwrap().graph_attribute(key)
    }

    /// Sets a variable. Null values and mixed-type lists are rejected.
    pub fn set(&self, key: &str, value: AttributeValue) -> GraphResult<()> {
        if key.is_empty() {
            return Err(GraphError::InvalidProperty(
                "variable key can not be empty".to_string(),
            ));
        }
        Self::check_value(&value)?;
        self.store
            .lock()
            .unwrap()
            .set_graph_attribute(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&self, key: &str) {
        self.store.lock().unwrap().remove_graph_attribute(key);
    }

    fn check_value(value: &AttributeValue) -> GraphResult<()> {
        match value {
            AttributeValue::Null => Err(GraphError::UnsupportedVariableType(
                value.type_name().to_string(),
            )),
            AttributeValue::List(items) => {
                let mut types = items.iter().map(AttributeValue::value_type);
                let first = match types.next() {
                    Some(first) => first,
                    None => return Ok(()),
                };
                if first.is_none() || types.any(|item| item != first) {
                    return Err(GraphError::UnsupportedVariableType(
                        "list with mixed or null element types".to_string(),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AttributeStore;
    use std::sync::{Arc, Mutex};

    fn variables() -> Variables {
        Variables::new(Arc::new(Mutex::new(AttributeStore::new())))
    }

    #[test]
    fn test_set_get_remove() {
        let vars = variables();
        vars.set("answer", 42i64.into()).unwrap();
        vars.set("name", "graph".into()).unwrap();
        assert_eq!(vars.get("answer"), Some(42i64.into()));
        assert_eq!(vars.keys(), vec!["answer".to_string(), "name".to_string()]);

        vars.remove("answer");
        assert_eq!(vars.get("answer"), None);
        assert_eq!(vars.keys(), vec!["name".to_string()]);
    }

    #[test]
    fn test_rejects_empty_key() {
        let vars = variables();
        assert!(matches!(
            vars.set("", 1i64.into()),
            Err(GraphError::InvalidProperty(_))
        ));
    }

    #[test]
    fn test_rejects_null_and_mixed_lists() {
        let vars = variables();
        assert!(matches!(
            vars.set("x", AttributeValue::Null),
            Err(GraphError::UnsupportedVariableType(_))
        ));
        assert!(matches!(
            vars.set("x", AttributeValue::List(vec![1i64.into(), "a".into()])),
            Err(GraphError::UnsupportedVariableType(_))
        ));
        vars.set("x", AttributeValue::List(vec![1i64.into(), 2i64.into()]))
            .unwrap();
        vars.set("y", AttributeValue::List(Vec::new())).unwrap();
    }
}
