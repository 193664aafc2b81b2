use crate::error::GraphError;
use crate::graph::{FlowGraph, Node, NodeId, NodeKind};
use ahash::{AHashMap, AHashSet};

mod validate;

pub use validate::validate;

/// The resolved body of a loop node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopBody {
    /// Nodes strictly inside the loop, each once, in the order one pass runs
    /// them. The first is the entry and the last is the terminal node, which
    /// connects back to the loop.
    pub nodes: Vec<NodeId>,
    /// Successors of the loop node that are not part of its body.
    pub exits: Vec<NodeId>,
}

impl LoopBody {
    pub fn entry(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn terminal(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }
}

/// Read-only traversal over one scope of a `FlowGraph`.
pub struct GraphWalker<'a> {
    graph: &'a FlowGraph,
}

impl<'a> GraphWalker<'a> {
    pub fn new(graph: &'a FlowGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'a FlowGraph {
        self.graph
    }

    /// Nodes without any incoming connection, in insertion order. Midpoints are
    /// never start nodes.
    pub fn find_start_nodes(&self) -> Vec<NodeId> {
        self.graph
            .nodes()
            .iter()
            .filter(|n| !n.kind.is_midpoint())
            .filter(|n| self.graph.incoming(n.id).next().is_none())
            .map(|n| n.id)
            .collect()
    }

    /// The real nodes this node leads to, midpoints spliced out.
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.graph.resolved_successors(id)
    }

    /// The real nodes leading into this node, midpoints spliced out.
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.graph.resolved_predecessors(id)
    }

    /// Every node reachable from `start`, each visited exactly once, in
    /// depth-first order.
    pub fn extract_path(&self, start: NodeId) -> Vec<NodeId> {
        let mut visited = AHashSet::new();
        let mut order = Vec::new();
        self.extract_path_into(start, &mut visited, &mut order);
        order
    }

    /// Like `extract_path`, but shares the visited set between several walks so
    /// converging paths from different start nodes are only visited once.
    pub fn extract_path_into(
        &self,
        node: NodeId,
        visited: &mut AHashSet<NodeId>,
        order: &mut Vec<NodeId>,
    ) {
        if !visited.insert(node) {
            return;
        }
        order.push(node);
        for next in self.successors(node) {
            self.extract_path_into(next, visited, order);
        }
    }

    /// All nodes reachable from any start node, in visit order.
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut visited = AHashSet::new();
        let mut order = Vec::new();
        for start in self.find_start_nodes() {
            self.extract_path_into(start, &mut visited, &mut order);
        }
        order
    }

    /// The body nodes reachable from `start`, in pass order. Returns `None` if
    /// no path from `start` leads back to `loop_node`.
    pub fn find_loop_body(&self, loop_node: NodeId, start: NodeId) -> Option<Vec<NodeId>> {
        let closing = self.reaches(loop_node);
        if !closing.contains(&start) {
            return None;
        }
        Some(self.pass_order(loop_node, &[start], &closing))
    }

    /// Every node with a path to `target` that does not pass through `target`
    /// again. Each node is expanded once.
    fn reaches(&self, target: NodeId) -> AHashSet<NodeId> {
        let mut found = AHashSet::new();
        let mut pending = self.predecessors(target);
        while let Some(id) = pending.pop() {
            if id == target || !found.insert(id) {
                continue;
            }
            pending.extend(self.predecessors(id));
        }
        found
    }

    /// Reverse postorder over `members`, starting from `starts`. A node comes
    /// after every member that leads into it, and siblings keep edge order.
    fn pass_order(
        &self,
        loop_node: NodeId,
        starts: &[NodeId],
        members: &AHashSet<NodeId>,
    ) -> Vec<NodeId> {
        let mut visited = AHashSet::new();
        let mut postorder = Vec::new();
        for &start in starts.iter().rev() {
            self.postorder_into(loop_node, start, members, &mut visited, &mut postorder);
        }
        postorder.reverse();
        postorder
    }

    fn postorder_into(
        &self,
        loop_node: NodeId,
        current: NodeId,
        members: &AHashSet<NodeId>,
        visited: &mut AHashSet<NodeId>,
        postorder: &mut Vec<NodeId>,
    ) {
        if current == loop_node || !members.contains(&current) || !visited.insert(current) {
            return;
        }
        for next in self.successors(current).into_iter().rev() {
            self.postorder_into(loop_node, next, members, visited, postorder);
        }
        postorder.push(current);
    }

    /// Resolves the body and exits of a loop node.
    ///
    /// The terminal node, the last one of a pass, always connects straight back
    /// to the loop node.
    pub fn loop_body(&self, loop_node: NodeId) -> Result<LoopBody, GraphError> {
        let successors = self.successors(loop_node);
        let closing = self.reaches(loop_node);
        let mut nodes = self.pass_order(loop_node, &successors, &closing);

        let terminal = nodes
            .iter()
            .rposition(|&id| self.successors(id).contains(&loop_node))
            .ok_or(GraphError::LoopNeverCloses { node: loop_node })?;
        let last = nodes.remove(terminal);
        nodes.push(last);

        let exits = successors
            .into_iter()
            .filter(|id| !nodes.contains(id))
            .collect();
        Ok(LoopBody { nodes, exits })
    }

    /// The body of every loop node in this scope.
    pub fn loop_bodies(&self) -> Result<AHashMap<NodeId, LoopBody>, GraphError> {
        self.loop_nodes()
            .map(|n| self.loop_body(n.id).map(|body| (n.id, body)))
            .collect()
    }

    /// Loop nodes of this scope in insertion order.
    pub fn loop_nodes(&self) -> impl Iterator<Item = &'a Node> {
        self.graph
            .nodes()
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Loop { .. }))
    }
}
