use super::definition::{SceneDefinition, SerializedNode};
use crate::error::SceneError;
use crate::graph::{Edge, FlowGraph, Node, NodeId, NodeKind};

/// A trait for data models that can be converted into an evoflow `FlowGraph`.
///
/// This is the seam between the compiler and whatever produced the flowchart.
/// The editor save format implements it through `SceneDefinition`; other
/// formats only need a conversion of their own.
///
/// # Example
///
/// ```rust,no_run
/// use evoflow::prelude::*;
///
/// struct Pipeline { steps: Vec<String> }
///
/// impl IntoFlow for Pipeline {
///     fn into_flow(self) -> Result<FlowGraph, SceneError> {
///         let mut graph = FlowGraph::new();
///         for (i, step) in self.steps.iter().enumerate() {
///             graph.add_node(Node::new(i as u32, step.as_str(), NodeKind::decision()))?;
///             if i > 0 {
///                 graph.connect(Edge::simple(i as u32 - 1, i as u32))?;
///             }
///         }
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a flow graph.
    fn into_flow(self) -> Result<FlowGraph, SceneError>;
}

impl IntoFlow for FlowGraph {
    fn into_flow(self) -> Result<FlowGraph, SceneError> {
        Ok(self)
    }
}

impl IntoFlow for SceneDefinition {
    fn into_flow(self) -> Result<FlowGraph, SceneError> {
        build_scope(self.nodes)
    }
}

/// Adds every node first and connects afterwards, so connections may name
/// nodes saved on later lines.
///
/// Connections go through `connect_loaded`, which trusts the output limits
/// the editor already enforced when they were drawn.
fn build_scope(nodes: Vec<SerializedNode>) -> Result<FlowGraph, SceneError> {
    let mut graph = FlowGraph::new();
    let mut pending = Vec::with_capacity(nodes.len());

    for serialized in nodes {
        let kind = node_kind(&serialized)?;
        let id = graph.add_node(Node::new(serialized.node_id, serialized.node_name, kind))?;
        if !serialized.internals.is_empty() {
            let scope = build_scope(serialized.internals)?;
            graph.add_scope(id, scope)?;
        }
        pending.push((id, serialized.connections));
    }

    for (source, connections) in pending {
        for conn in connections {
            let edge = Edge::new(
                source,
                conn.start_pos.parse()?,
                NodeId(conn.conn_node_id),
                conn.end_pos.parse()?,
            );
            graph.connect_loaded(edge)?;
        }
    }
    Ok(graph)
}

fn node_kind(node: &SerializedNode) -> Result<NodeKind, SceneError> {
    let normalized: String = node
        .node_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    let base = normalized.strip_suffix("node").unwrap_or(&normalized);

    let kind = match base {
        "interactive" => NodeKind::Interactive,
        "decision" => NodeKind::Decision {
            paths_taken: node.paths_taken.unwrap_or(1),
        },
        "probability" => NodeKind::Probability {
            percent: probability_of(node)?,
        },
        "loop" => NodeKind::Loop {
            iterations: node.loop_count.unwrap_or(0),
        },
        "andgate" => NodeKind::AndGate,
        "midpoint" => NodeKind::Midpoint,
        _ => {
            return Err(SceneError::UnknownNodeType {
                node: node.node_id,
                type_name: node.node_type.clone(),
            });
        }
    };
    Ok(kind)
}

/// The explicit `probability` field, else the node name read as a percentage.
fn probability_of(node: &SerializedNode) -> Result<u8, SceneError> {
    if let Some(percent) = node.probability {
        return Ok(percent);
    }
    node.node_name
        .replace('%', "")
        .trim()
        .parse()
        .map_err(|_| SceneError::MissingParameter {
            node: node.node_id,
            parameter: "probability".to_string(),
        })
}
