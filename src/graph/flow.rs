use super::{Edge, Node, NodeId, NodeKind};
use crate::error::GraphError;
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;
use tracing::warn;

/// The nodes and edges of one scope, plus the nested scopes owned by its
/// interactive nodes.
///
/// Nodes live in an arena in insertion order and are addressed by their
/// `NodeId`. Edges are kept in insertion order, which is the order every
/// traversal follows.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    nodes: Vec<Node>,
    index: AHashMap<NodeId, usize>,
    edges: Vec<Edge>,
    scopes: BTreeMap<NodeId, FlowGraph>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node after checking its parameters and that its id is unused.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        node.validate()?;
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id;
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
        Ok(id)
    }

    /// Forms a connection, enforcing the editor's connection rules.
    ///
    /// Rejects self connections (including ones routed through midpoints),
    /// duplicate connections and connections that push any real node feeding
    /// the source past its output limit.
    pub fn connect(&mut self, edge: Edge) -> Result<(), GraphError> {
        self.check_endpoints(&edge)?;
        let source = edge.source;
        self.edges.push(edge);
        if let Err(e) = self.check_new_connection(source) {
            self.edges.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Forms a connection read back from a save file.
    ///
    /// Saved connections were checked when they were drawn, so output limits
    /// are not enforced again; exceeding one is only logged. Unknown nodes,
    /// self connections and duplicates are still rejected.
    pub fn connect_loaded(&mut self, edge: Edge) -> Result<(), GraphError> {
        self.check_endpoints(&edge)?;
        let source = edge.source;
        self.edges.push(edge);
        if let Err(e) = self.check_new_connection(source) {
            if !matches!(e, GraphError::OutputLimitExceeded { .. }) {
                self.edges.pop();
                return Err(e);
            }
            warn!(node = %source, error = %e, "saved connection exceeds the output limit");
        }
        Ok(())
    }

    fn check_endpoints(&self, edge: &Edge) -> Result<(), GraphError> {
        let context = format!("a connection from {}", edge.source);
        self.require(edge.source, &context)?;
        self.require(edge.target, &context)?;

        if edge.source == edge.target {
            return Err(GraphError::SelfConnection { node: edge.source });
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == edge.source && e.target == edge.target)
        {
            return Err(GraphError::DuplicateConnection {
                source_node: edge.source,
                target_node: edge.target,
            });
        }
        Ok(())
    }

    fn check_new_connection(&self, source: NodeId) -> Result<(), GraphError> {
        let owners = if self.is_midpoint(source) {
            if self.midpoint_cycle(source) {
                return Err(GraphError::SelfConnection { node: source });
            }
            self.resolved_predecessors(source)
        } else {
            vec![source]
        };

        for owner in owners {
            if self.resolved_successors(owner).contains(&owner) {
                return Err(GraphError::SelfConnection { node: owner });
            }
            let Some(limit) = self.node(owner).and_then(|n| n.kind.output_limit()) else {
                continue;
            };
            if self.fan_out(owner, &mut AHashSet::new()) > limit {
                return Err(GraphError::OutputLimitExceeded { node: owner, limit });
            }
        }
        Ok(())
    }

    /// Attaches the nested scope of an interactive node.
    pub fn add_scope(&mut self, owner: NodeId, scope: FlowGraph) -> Result<(), GraphError> {
        let node = self.require(owner, "a nested scope")?;
        if node.kind != NodeKind::Interactive {
            return Err(GraphError::NotInteractive(owner));
        }
        self.scopes.insert(owner, scope);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn require(&self, id: NodeId, context: &str) -> Result<&Node, GraphError> {
        self.node(id).ok_or_else(|| GraphError::NodeNotFound {
            missing: id,
            context: context.to_string(),
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn scope(&self, owner: NodeId) -> Option<&FlowGraph> {
        self.scopes.get(&owner)
    }

    pub fn scopes(&self) -> impl Iterator<Item = (NodeId, &FlowGraph)> {
        self.scopes.iter().map(|(id, g)| (*id, g))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.target == id)
    }

    pub fn is_midpoint(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.kind.is_midpoint())
    }

    /// Real nodes reached from `id`, with midpoint chains spliced out.
    pub fn resolved_successors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.resolve(id, true, &mut AHashSet::new(), &mut out);
        out
    }

    /// Real nodes feeding `id`, with midpoint chains spliced out.
    pub fn resolved_predecessors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.resolve(id, false, &mut AHashSet::new(), &mut out);
        out
    }

    fn resolve(
        &self,
        id: NodeId,
        forward: bool,
        seen: &mut AHashSet<NodeId>,
        out: &mut Vec<NodeId>,
    ) {
        let neighbours: Vec<NodeId> = if forward {
            self.outgoing(id).map(|e| e.target).collect()
        } else {
            self.incoming(id).map(|e| e.source).collect()
        };

        for next in neighbours {
            if self.is_midpoint(next) {
                if seen.insert(next) {
                    self.resolve(next, forward, seen, out);
                }
            } else if !out.contains(&next) {
                out.push(next);
            }
        }
    }

    /// Effective output count: an edge into a midpoint counts as that midpoint's
    /// own fan-out, and at least one.
    fn fan_out(&self, id: NodeId, seen: &mut AHashSet<NodeId>) -> usize {
        let targets: Vec<NodeId> = self.outgoing(id).map(|e| e.target).collect();
        targets
            .into_iter()
            .map(|target| {
                if !self.is_midpoint(target) {
                    1
                } else if seen.insert(target) {
                    self.fan_out(target, seen).max(1)
                } else {
                    0
                }
            })
            .sum()
    }

    /// Whether a chain made only of midpoints leads from `start` back to itself.
    fn midpoint_cycle(&self, start: NodeId) -> bool {
        let mut stack = vec![start];
        let mut seen = AHashSet::new();
        while let Some(current) = stack.pop() {
            for edge in self.outgoing(current) {
                if edge.target == start {
                    return true;
                }
                if self.is_midpoint(edge.target) && seen.insert(edge.target) {
                    stack.push(edge.target);
                }
            }
        }
        false
    }
}
