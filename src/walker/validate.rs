use super::GraphWalker;
use crate::error::GraphError;
use crate::graph::{FlowGraph, NodeId, NodeKind};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::iter;
use tracing::warn;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Checks a graph and all of its nested scopes before compilation.
///
/// Rejects loops that never close, cycles that bypass every loop node and AND
/// gates with more than two converging paths.
pub fn validate(graph: &FlowGraph) -> Result<(), GraphError> {
    let walker = GraphWalker::new(graph);

    walker.loop_bodies()?;

    let mut marks = AHashMap::new();
    let mut stack = Vec::new();
    for node in graph.nodes().iter().filter(|n| !n.kind.is_midpoint()) {
        visit(&walker, node.id, &mut marks, &mut stack)?;
    }

    for node in graph.nodes() {
        if node.kind != NodeKind::AndGate {
            continue;
        }
        let predecessors = walker.predecessors(node.id).len();
        if predecessors > 2 {
            return Err(GraphError::AndGateArity {
                node: node.id,
                predecessors,
            });
        }
        if predecessors < 2 {
            warn!(node = %node.id, name = %node.name, "AND gate has fewer than two inputs and can never fire");
        }
    }

    let reachable: AHashSet<NodeId> = walker.reachable().into_iter().collect();
    for node in graph.nodes() {
        if !node.kind.is_midpoint() && !reachable.contains(&node.id) {
            warn!(node = %node.id, name = %node.name, "node is not reachable from any start node");
        }
    }

    for (_, scope) in graph.scopes() {
        validate(scope)?;
    }
    Ok(())
}

/// Depth-first colouring that does not continue past loop nodes, so any cycle
/// it finds is one no loop node anchors.
fn visit(
    walker: &GraphWalker<'_>,
    node: NodeId,
    marks: &mut AHashMap<NodeId, Mark>,
    stack: &mut Vec<NodeId>,
) -> Result<(), GraphError> {
    match marks.get(&node) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|n| *n == node).unwrap_or(0);
            let path = stack[start..].iter().chain(iter::once(&node)).join(" -> ");
            return Err(GraphError::UnanchoredCycle { path });
        }
        None => {}
    }

    marks.insert(node, Mark::Visiting);
    stack.push(node);
    let is_loop = walker
        .graph()
        .node(node)
        .is_some_and(|n| matches!(n.kind, NodeKind::Loop { .. }));
    if !is_loop {
        for next in walker.successors(node) {
            visit(walker, next, marks, stack)?;
        }
    }
    stack.pop();
    marks.insert(node, Mark::Done);
    Ok(())
}
