//! Common test utilities for building flow graphs and runtimes.
use evoflow::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[allow(dead_code)]
pub fn interactive(id: u32, name: &str) -> Node {
    Node::new(id, name, NodeKind::Interactive)
}

#[allow(dead_code)]
pub fn midpoint(id: u32) -> Node {
    Node::new(id, "", NodeKind::Midpoint)
}

/// Adds the nodes, then connects each `(source, target)` pair with index ports.
#[allow(dead_code)]
pub fn build_graph(nodes: Vec<Node>, edges: &[(u32, u32)]) -> FlowGraph {
    let mut graph = FlowGraph::new();
    for node in nodes {
        graph.add_node(node).expect("Failed to add node");
    }
    for &(source, target) in edges {
        graph
            .connect(Edge::simple(source, target))
            .expect("Failed to connect nodes");
    }
    graph
}

/// `Start -> Repeat`, a loop whose body is `Select -> Mutate -> Repeat`, and
/// `Repeat -> Finish` as its exit.
#[allow(dead_code)]
pub fn create_loop_graph(iterations: u32) -> FlowGraph {
    build_graph(
        vec![
            interactive(1, "Start"),
            Node::new(2, "Repeat", NodeKind::Loop { iterations }),
            interactive(3, "Select"),
            interactive(4, "Mutate"),
            interactive(5, "Finish"),
        ],
        &[(1, 2), (2, 3), (3, 4), (4, 2), (2, 5)],
    )
}

/// `Start -> Repeat`, a loop whose body splits at a decision and rejoins at an
/// AND gate before closing, and `Repeat -> Finish` as its exit.
#[allow(dead_code)]
pub fn create_diamond_loop_graph(iterations: u32) -> FlowGraph {
    build_graph(
        vec![
            interactive(1, "Start"),
            Node::new(2, "Repeat", NodeKind::Loop { iterations }),
            Node::new(3, "Split", NodeKind::Decision { paths_taken: 2 }),
            interactive(4, "Left"),
            interactive(5, "Right"),
            Node::new(6, "Join", NodeKind::AndGate),
            interactive(7, "Finish"),
        ],
        &[(1, 2), (2, 3), (3, 4), (3, 5), (4, 6), (5, 6), (6, 2), (2, 7)],
    )
}

/// `Start -> Repeat`, a loop whose body is `diamonds` decision diamonds chained
/// one after another.
#[allow(dead_code)]
pub fn create_chained_diamond_loop(diamonds: u32) -> FlowGraph {
    let mut nodes = vec![
        interactive(1000, "Start"),
        Node::new(1, "Repeat", NodeKind::Loop { iterations: 1 }),
    ];
    let mut edges = vec![(1000, 1)];
    let mut previous = 1;
    for d in 0..diamonds {
        let base = 2 + d * 4;
        nodes.push(Node::new(base, format!("Split {}", d), NodeKind::decision()));
        nodes.push(interactive(base + 1, &format!("Left {}", d)));
        nodes.push(interactive(base + 2, &format!("Right {}", d)));
        nodes.push(interactive(base + 3, &format!("Merge {}", d)));
        edges.extend([
            (previous, base),
            (base, base + 1),
            (base, base + 2),
            (base + 1, base + 3),
            (base + 2, base + 3),
        ]);
        previous = base + 3;
    }
    edges.push((previous, 1));
    build_graph(nodes, &edges)
}

/// A decision taking both of its paths, which meet again at an AND gate.
#[allow(dead_code)]
pub fn create_and_gate_graph() -> FlowGraph {
    build_graph(
        vec![
            Node::new(1, "Start", NodeKind::Decision { paths_taken: 2 }),
            interactive(2, "Left"),
            interactive(3, "Right"),
            Node::new(4, "Join", NodeKind::AndGate),
            interactive(5, "Done"),
        ],
        &[(1, 2), (1, 3), (2, 4), (3, 4), (4, 5)],
    )
}

/// `Start (50%) -> A, B`, connected the way a loaded save file would be.
#[allow(dead_code)]
pub fn create_probability_graph(percent: u8) -> FlowGraph {
    let mut graph = build_graph(
        vec![
            Node::new(1, "Start", NodeKind::Probability { percent }),
            interactive(2, "A"),
            interactive(3, "B"),
        ],
        &[],
    );
    graph
        .connect_loaded(Edge::simple(1, 2))
        .expect("Failed to connect nodes");
    graph
        .connect_loaded(Edge::simple(1, 3))
        .expect("Failed to connect nodes");
    graph
}

#[allow(dead_code)]
pub fn compile(graph: &FlowGraph) -> CompiledProgram {
    Compiler::builder(graph)
        .build()
        .compile()
        .expect("Failed to compile")
}

#[allow(dead_code)]
pub fn seeded(seed: u64) -> NodeImplementation<StdRng> {
    NodeImplementation::with_rng(StdRng::seed_from_u64(seed))
}

/// A save file exercising aliases, layout fields and parameters read from names.
#[allow(dead_code)]
pub const SAMPLE_SCENE: &str = r#"{"nodeId":1,"nodeType":"Interactive Node","nodeName":"Initialise","position":{"x":0.0,"y":1.5,"z":0.0},"colour":{"r":1.0,"g":1.0,"b":1.0,"a":1.0},"Connections":[{"startPos":"0","connNodeId":2,"endPos":"0"}]}
{"nodeId":2,"nodeType":"Probability Node","nodeName":"30%","connections":[{"startPos":"0","connNodeId":7,"endPos":"LeftConn"}]}
{"nodeId":7,"nodeType":"Midpoint","nodeName":"","connections":[{"startPos":"RightConn","connNodeId":3,"endPos":"0"}]}
{"nodeId":3,"nodeType":"Decision Node","nodeName":"Choose Parents","pathsTaken":1,"connections":[{"startPos":"0","connNodeId":4,"endPos":"0"},{"startPos":"1","connNodeId":5,"endPos":"0"}]}

{"nodeId":4,"nodeType":"Interactive Node","nodeName":"Crossover","connections":[]}
{"nodeId":5,"nodeType":"Interactive Node","nodeName":"Mutate","connections":[]}
"#;
