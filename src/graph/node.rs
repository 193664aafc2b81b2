use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a node within its scope.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        NodeId(id)
    }
}

/// The closed set of node variants together with their type-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Runs its own nested flowchart scope, then continues with its successors.
    Interactive,
    /// Takes `paths_taken` of its outgoing paths at random.
    Decision { paths_taken: u32 },
    /// Continues with all successors with a chance of `percent` in 100.
    Probability { percent: u8 },
    /// Repeats its body `iterations` times before taking its exits.
    Loop { iterations: u32 },
    /// Propagates once a second path has arrived.
    AndGate,
    /// Routing waypoint, transparent to compilation.
    Midpoint,
}

impl NodeKind {
    /// A decision with the default of one path taken.
    pub fn decision() -> Self {
        NodeKind::Decision { paths_taken: 1 }
    }

    /// Maximum number of effective outputs, `None` for midpoints which inherit
    /// the limit of the nodes feeding them. A loop needs one output for its body
    /// and one for its exit.
    pub fn output_limit(&self) -> Option<usize> {
        match self {
            NodeKind::Midpoint => None,
            NodeKind::Decision { .. } | NodeKind::Loop { .. } => Some(2),
            _ => Some(1),
        }
    }

    pub fn is_midpoint(&self) -> bool {
        matches!(self, NodeKind::Midpoint)
    }

    /// The editor's name for this node type.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Interactive => "Interactive Node",
            NodeKind::Decision { .. } => "Decision Node",
            NodeKind::Probability { .. } => "Probability Node",
            NodeKind::Loop { .. } => "Loop Node",
            NodeKind::AndGate => "AND Gate Node",
            NodeKind::Midpoint => "Midpoint",
        }
    }
}

/// A typed unit of the authored flowchart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Checks the type-specific parameters are in range.
    pub fn validate(&self) -> Result<(), GraphError> {
        match self.kind {
            NodeKind::Probability { percent } if percent > 100 => {
                Err(GraphError::InvalidParameter {
                    node: self.id,
                    message: format!("probability {}% is outside 0..=100", percent),
                })
            }
            NodeKind::Decision { paths_taken: 0 } => Err(GraphError::InvalidParameter {
                node: self.id,
                message: "a decision must take at least one path".to_string(),
            }),
            _ => Ok(()),
        }
    }
}
