//! Snapshot serialization: whole-store codecs, file persistence, and the
//! framed transport bridge.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::GraphFormat;
use crate::error::{GraphError, GraphResult};
use crate::graph::SharedStore;
use crate::store::AttributeStore;

mod bridge;

pub use bridge::SerializationBridge;

/// Encodes the whole store in the given format.
pub(crate) fn encode_store(store: &AttributeStore, format: GraphFormat) -> GraphResult<Vec<u8>> {
    let bytes = match format {
        GraphFormat::Binary => bincode::serialize(store)?,
        GraphFormat::Json => serde_json::to_vec(store)?,
        GraphFormat::Yaml => serde_yaml::to_string(store)?.into_bytes(),
    };
    Ok(bytes)
}

/// Decodes a whole store from the given format.
pub(crate) fn decode_store(bytes: &[u8], format: GraphFormat) -> GraphResult<AttributeStore> {
    let store = match format {
        GraphFormat::Binary => bincode::deserialize(bytes)?,
        GraphFormat::Json => serde_json::from_slice(bytes)?,
        GraphFormat::Yaml => serde_yaml::from_slice(bytes)?,
    };
    Ok(store)
}

/// Saves a snapshot to `path`. An existing file is replaced; a missing
/// parent directory is created first.
pub(crate) fn save_store(
    store: &AttributeStore,
    path: &Path,
    format: GraphFormat,
) -> GraphResult<()> {
    write_snapshot(store, path, format).map_err(|source| GraphError::Persistence {
        action: "save",
        path: path.display().to_string(),
        format,
        source: Box::new(source),
    })
}

fn write_snapshot(store: &AttributeStore, path: &Path, format: GraphFormat) -> GraphResult<()> {
    if path.exists() {
        fs::remove_file(path)?;
    } else if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let bytes = encode_store(store, format)?;
    fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote graph snapshot");
    Ok(())
}

/// Loads a snapshot from `path`.
pub(crate) fn load_store(path: &Path, format: GraphFormat) -> GraphResult<AttributeStore> {
    read_snapshot(path, format).map_err(|source| GraphError::Persistence {
        action: "load",
        path: path.display().to_string(),
        format,
        source: Box::new(source),
    })
}

fn read_snapshot(path: &Path, format: GraphFormat) -> GraphResult<AttributeStore> {
    let bytes = fs::read(path)?;
    decode_store(&bytes, format)
}

/// Reads and writes the graph a [`crate::Graph`] wraps, in one fixed
/// format chosen at construction.
pub struct GraphIo {
    store: SharedStore,
    format: GraphFormat,
    bridge: SerializationBridge,
}

impl GraphIo {
    pub(crate) fn new(store: SharedStore, format: GraphFormat) -> Self {
        Self {
            store,
            format,
            bridge: SerializationBridge::new(),
        }
    }

    pub fn format(&self) -> GraphFormat {
        self.format
    }

    /// The framed binary transport codec, independent of this instance's
    /// file format.
    pub fn bridge(&self) -> &SerializationBridge {
        &self.bridge
    }

    /// Writes the current graph to `path` in this instance's format.
    pub fn write_graph(&self, path: impl AsRef<Path>) -> GraphResult<()> {
        let store = self.store.lock().unwrap();
        save_store(&store, path.as_ref(), self.format)
    }

    /// Replaces the current graph contents with the snapshot at `path`.
    /// Existing element handles keep pointing at the old contents' slots
    /// and should be discarded.
    pub fn read_graph(&self, path: impl AsRef<Path>) -> GraphResult<()> {
        let loaded = load_store(path.as_ref(), self.format)?;
        *self.store.lock().unwrap() = loaded;
        Ok(())
    }
}
