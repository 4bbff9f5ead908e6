//! Framed binary transport for whole graphs.

use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

/// Encodes a graph as a length-prefixed binary frame and back.
///
/// The frame is a 4-byte big-endian payload length followed by the
/// binary store snapshot. Each bridge is a plain value owned by its
/// [`crate::io::GraphIo`]; nothing is registered globally.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerializationBridge {
    _priv: (),
}

impl SerializationBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the graph into one frame.
    pub fn write(&self, graph: &Graph) -> GraphResult<Vec<u8>> {
        let payload = {
            let store = graph.shared_store().lock().unwrap();
            bincode::serialize(&*store)?
        };
        let declared = u32::try_from(payload.len())
            .map_err(|_| GraphError::Unsupported("graphs over 4 GiB in one frame"))?;
        let mut frame = Vec::with_capacity(4 + payload.len());
        frame.extend_from_slice(&declared.to_be_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Rebuilds a graph from one frame. The result carries a default,
    /// ephemeral configuration.
    pub fn read(&self, frame: &[u8]) -> GraphResult<Graph> {
        if frame.len() < 4 {
            return Err(GraphError::TruncatedFrame {
                expected: 4,
                found: frame.len(),
            });
        }
        let mut length = [0u8; 4];
        length.copy_from_slice(&frame[..4]);
        let declared = u32::from_be_bytes(length) as usize;
        let payload = &frame[4..];
        if payload.len() < declared {
            return Err(GraphError::TruncatedFrame {
                expected: declared,
                found: payload.len(),
            });
        }
        let store = bincode::deserialize(&payload[..declared])?;
        Ok(Graph::from_store(store, GraphConfig::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Element;

    #[test]
    fn test_frame_round_trip() {
        let graph = Graph::open(GraphConfig::new()).unwrap();
        graph
            .add_vertex(&["~id".into(), "a".into(), "name".into(), "alice".into()])
            .unwrap();
        graph.add_vertex(&["~id".into(), "b".into()]).unwrap();

        let bridge = SerializationBridge::new();
        let frame = bridge.write(&graph).unwrap();
        assert_eq!(
            u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize,
            frame.len() - 4
        );

        let restored = bridge.read(&frame).unwrap();
        assert_eq!(restored.vertex_count(), 2);
        let found = restored.vertices(&["a".into()]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value("name").unwrap(), "alice".into());
    }

    #[test]
    fn test_truncated_frames_rejected() {
        let bridge = SerializationBridge::new();
        assert!(matches!(
            bridge.read(&[0, 0]),
            Err(GraphError::TruncatedFrame { .. })
        ));

        let graph = Graph::open(GraphConfig::new()).unwrap();
        let frame = bridge.write(&graph).unwrap();
        assert!(matches!(
            bridge.read(&frame[..frame.len() - 1]),
            Err(GraphError::TruncatedFrame { .. })
        ));
    }
}
