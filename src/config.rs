//! Graph construction configuration.
//!
//! A graph is either ephemeral (no persistence keys) or persistent (both a
//! location and a format). Supplying exactly one of the pair is a
//! configuration error, surfaced at [`crate::Graph::open`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// On-disk representation used for load-on-open / save-on-close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphFormat {
    /// Whole-store bincode snapshot, same payload the serialization bridge
    /// frames for transport
    Binary,
    /// Whole-store JSON snapshot
    Json,
    /// Whole-store YAML snapshot
    Yaml,
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphFormat::Binary => "binary",
            GraphFormat::Json => "json",
            GraphFormat::Yaml => "yaml",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for GraphFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> GraphResult<Self> {
        match s {
            "binary" => Ok(GraphFormat::Binary),
            "json" => Ok(GraphFormat::Json),
            "yaml" => Ok(GraphFormat::Yaml),
            other => Err(GraphError::InvalidProperty(format!(
                "unknown graph format: {}",
                other
            ))),
        }
    }
}

/// Configuration handed to [`crate::Graph::open`].
#[derive(Debug, Clone, Default)]
pub struct GraphConfig {
    location: Option<PathBuf>,
    format: Option<GraphFormat>,
}

impl GraphConfig {
    /// Ephemeral graph: no load on open, no save on close.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persistent graph: load `location` on open when it exists, save back
    /// on close.
    pub fn with_persistence(location: impl Into<PathBuf>, format: GraphFormat) -> Self {
        GraphConfig {
            location: Some(location.into()),
            format: Some(format),
        }
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn format(&self) -> Option<GraphFormat> {
        self.format
    }

    /// Returns the persistence pair, or `None` for an ephemeral graph.
    /// A half-specified pair is a configuration error.
    pub(crate) fn persistence(&self) -> GraphResult<Option<(&Path, GraphFormat)>> {
        match (self.location.as_deref(), self.format) {
            (Some(location), Some(format)) => Ok(Some((location, format))),
            (None, None) => Ok(None),
            _ => Err(GraphError::Configuration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_round_trip() {
        for format in [GraphFormat::Binary, GraphFormat::Json, GraphFormat::Yaml] {
            let parsed: GraphFormat = format.to_string().parse().unwrap();
            assert_eq!(parsed, format);
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!("graphml".parse::<GraphFormat>().is_err());
    }

    #[test]
    fn test_persistence_pair_rule() {
        assert!(GraphConfig::new().persistence().unwrap().is_none());

        let full = GraphConfig::with_persistence("/tmp/g.bin", GraphFormat::Binary);
        assert!(full.persistence().unwrap().is_some());

        let half = GraphConfig {
            location: Some(PathBuf::from("/tmp/g.bin")),
            format: None,
        };
        assert!(matches!(
            half.persistence(),
            Err(GraphError::Configuration)
        ));

        let other_half = GraphConfig {
            location: None,
            format: Some(GraphFormat::Json),
        };
        assert!(matches!(
            other_half.persistence(),
            Err(GraphError::Configuration)
        ));
    }
}
