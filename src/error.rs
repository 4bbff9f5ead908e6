//! Error types shared across the crate.

use thiserror::Error;

use crate::config::GraphFormat;

/// Errors that can occur during graph operations
#[derive(Error, Debug)]
pub enum GraphError {
    /// Persistence location and format were not supplied as a pair
    #[error("the graph location and graph format must both be specified if either is present")]
    Configuration,

    /// Element ids are only suppliable as strings
    #[error("{kind} does not support user supplied ids of type {type_name}")]
    IdTypeNotSupported {
        kind: &'static str,
        type_name: &'static str,
    },

    /// An explicit id is already taken by a live entity
    #[error("vertex with id {0} already exists")]
    DuplicateVertexId(String),

    /// An explicit id is already taken by a live entity
    #[error("edge with id {0} already exists")]
    DuplicateEdgeId(String),

    /// Bulk lookup arguments mixed adapters with raw ids, or raw ids of
    /// differing runtime types
    #[error("id arguments must be either elements of the matching kind or ids of one consistent type")]
    MixedIdArguments,

    /// Property lookup against an absent column or a null cell
    #[error("property {key} does not exist on {kind} {element}")]
    PropertyNotFound {
        kind: &'static str,
        element: String,
        key: String,
    },

    /// Operation against an entity whose slot was reclaimed
    #[error("{kind} with id {id} was removed")]
    ElementRemoved { kind: &'static str, id: String },

    /// Operations the structure contract declares but this graph rejects
    #[error("{0} is not supported")]
    Unsupported(&'static str),

    /// Graph variable value of a type the store will not hold
    #[error("graph variable value of type {0} is not supported")]
    UnsupportedVariableType(String),

    /// Malformed property key/value pair, arity error, or column type clash
    #[error("invalid property: {0}")]
    InvalidProperty(String),

    /// Load/save failure wrapped with its location and format
    #[error("could not {action} graph at {path} with {format}: {source}")]
    Persistence {
        action: &'static str,
        path: String,
        format: GraphFormat,
        source: Box<GraphError>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("binary codec error: {0}")]
    Binary(#[from] bincode::Error),

    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml codec error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Transport frame shorter than its declared payload
    #[error("truncated serialization frame: expected {expected} payload bytes, found {found}")]
    TruncatedFrame { expected: usize, found: usize },
}

pub type GraphResult<T> = Result<T, GraphError>;
