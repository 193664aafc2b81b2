use super::definition::{SceneDefinition, SerializedConnection, SerializedNode};
use crate::error::SceneError;
use crate::graph::{FlowGraph, NodeKind};
use std::fs;
use std::path::Path;
use tracing::debug;

impl SceneDefinition {
    /// Parses a save file body. Blank lines are skipped; errors carry the
    /// 1-based line number.
    pub fn from_json_lines(contents: &str) -> Result<Self, SceneError> {
        let nodes = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str::<SerializedNode>(line).map_err(|e| SceneError::Json {
                    line: i + 1,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(nodes = nodes.len(), "parsed scene");
        Ok(Self { nodes })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            SceneError::Io(format!("Could not read '{}': {}", path.display(), e))
        })?;
        Self::from_json_lines(&contents)
    }

    pub fn to_json_lines(&self) -> Result<String, SceneError> {
        let mut out = String::new();
        for (i, node) in self.nodes.iter().enumerate() {
            let line = serde_json::to_string(node).map_err(|e| SceneError::Json {
                line: i + 1,
                message: e.to_string(),
            })?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let path = path.as_ref();
        fs::write(path, self.to_json_lines()?).map_err(|e| {
            SceneError::Io(format!("Could not write '{}': {}", path.display(), e))
        })
    }

    /// Captures a graph in save form. Nested scopes become `internals`.
    pub fn from_graph(graph: &FlowGraph) -> Self {
        Self {
            nodes: serialize_nodes(graph),
        }
    }
}

fn serialize_nodes(graph: &FlowGraph) -> Vec<SerializedNode> {
    graph
        .nodes()
        .iter()
        .map(|node| {
            let connections = graph
                .outgoing(node.id)
                .map(|edge| SerializedConnection {
                    start_pos: edge.source_port.to_string(),
                    conn_node_id: edge.target.0,
                    end_pos: edge.target_port.to_string(),
                })
                .collect();

            let mut serialized = SerializedNode {
                node_id: node.id.0,
                node_type: node.kind.type_name().to_string(),
                node_name: node.name.clone(),
                connections,
                ..SerializedNode::default()
            };
            match node.kind {
                NodeKind::Probability { percent } => serialized.probability = Some(percent),
                NodeKind::Decision { paths_taken } => serialized.paths_taken = Some(paths_taken),
                NodeKind::Loop { iterations } => serialized.loop_count = Some(iterations),
                NodeKind::Interactive => {
                    serialized.internals = graph
                        .scope(node.id)
                        .map(serialize_nodes)
                        .unwrap_or_default();
                }
                NodeKind::AndGate | NodeKind::Midpoint => {}
            }
            serialized
        })
        .collect()
}
