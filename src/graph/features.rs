//! Capability advertisement.
//!
//! The report mirrors what the graph actually does: element creation,
//! removal, properties, variables, and persistence are in; transactions,
//! graph computation, concurrent access, non-string ids, multi-properties,
//! arbitrary serializable values, and mixed-type list values are out.

use crate::store::AttributeValue;

/// Feature answers for the whole graph instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Features {
    pub graph: GraphFeatures,
    pub vertex: VertexFeatures,
    pub edge: EdgeFeatures,
}

impl Features {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphFeatures {
    pub variables: VariableFeatures,
}

impl GraphFeatures {
    pub fn supports_computer(&self) -> bool {
        false
    }

    pub fn supports_transactions(&self) -> bool {
        false
    }

    pub fn supports_threaded_transactions(&self) -> bool {
        false
    }

    pub fn supports_persistence(&self) -> bool {
        true
    }

    pub fn supports_concurrent_access(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VariableFeatures {
    _priv: (),
}

impl VariableFeatures {
    pub fn supports_variables(&self) -> bool {
        true
    }

    pub fn supports_serializable_values(&self) -> bool {
        false
    }

    pub fn supports_mixed_list_values(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VertexFeatures {
    pub properties: PropertyFeatures,
}

impl VertexFeatures {
    pub fn supports_add_vertices(&self) -> bool {
        true
    }

    pub fn supports_remove_vertices(&self) -> bool {
        true
    }

    pub fn supports_multi_properties(&self) -> bool {
        false
    }

    pub fn supports_meta_properties(&self) -> bool {
        true
    }

    pub fn supports_user_supplied_ids(&self) -> bool {
        true
    }

    pub fn supports_string_ids(&self) -> bool {
        true
    }

    pub fn supports_numeric_ids(&self) -> bool {
        false
    }

    pub fn supports_uuid_ids(&self) -> bool {
        false
    }

    pub fn supports_custom_ids(&self) -> bool {
        false
    }

    pub fn supports_any_ids(&self) -> bool {
        false
    }

    /// Whether a candidate id value would be accepted at creation.
    pub fn will_allow_id(&self, id: &AttributeValue) -> bool {
        matches!(id, AttributeValue::String(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeFeatures {
    pub properties: PropertyFeatures,
}

impl EdgeFeatures {
    pub fn supports_add_edges(&self) -> bool {
        true
    }

    pub fn supports_remove_edges(&self) -> bool {
        true
    }

    pub fn supports_user_supplied_ids(&self) -> bool {
        true
    }

    pub fn supports_string_ids(&self) -> bool {
        true
    }

    pub fn supports_numeric_ids(&self) -> bool {
        false
    }

    pub fn supports_uuid_ids(&self) -> bool {
        false
    }

    pub fn supports_custom_ids(&self) -> bool {
        false
    }

    pub fn supports_any_ids(&self) -> bool {
        false
    }

    pub fn will_allow_id(&self, id: &AttributeValue) -> bool {
        matches!(id, AttributeValue::String(_))
    }
}

/// Answers shared by vertex properties and edge properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyFeatures {
    _priv: (),
}

impl PropertyFeatures {
    pub fn supports_properties(&self) -> bool {
        true
    }

    /// Vertex property ids are always store-derived.
    pub fn supports_user_supplied_ids(&self) -> bool {
        false
    }

    pub fn supports_custom_ids(&self) -> bool {
        false
    }

    pub fn supports_any_ids(&self) -> bool {
        false
    }

    pub fn supports_serializable_values(&self) -> bool {
        false
    }

    pub fn supports_mixed_list_values(&self) -> bool {
        false
    }
}
