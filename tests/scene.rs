//! Tests for loading editor save files into flow graphs.
mod common;
use common::*;
use evoflow::prelude::*;

fn node<'a>(graph: &'a FlowGraph, id: u32) -> &'a Node {
    graph.node(NodeId(id)).expect("Node missing")
}

#[test]
fn test_sample_scene_loads() {
    let scene = SceneDefinition::from_json_lines(SAMPLE_SCENE).expect("Failed to parse scene");
    assert_eq!(scene.nodes.len(), 6);
    // The capitalised `Connections` key is read like the camelCase one.
    assert_eq!(scene.nodes[0].connections.len(), 1);

    let graph = scene.into_flow().expect("Failed to convert scene");
    assert_eq!(node(&graph, 2).kind, NodeKind::Probability { percent: 30 });
    assert_eq!(node(&graph, 3).kind, NodeKind::Decision { paths_taken: 1 });
    assert!(graph.is_midpoint(NodeId(7)));
    assert_eq!(graph.resolved_successors(NodeId(2)), vec![NodeId(3)]);
    assert_eq!(
        graph.edges()[1].target_port,
        Port::Compass(Compass::Left)
    );
}

#[test]
fn test_sample_scene_compiles() {
    let graph = SceneDefinition::from_json_lines(SAMPLE_SCENE)
        .unwrap()
        .into_flow()
        .unwrap();
    let program = compile(&graph);
    let main = program.main().unwrap();

    let methods: Vec<&str> = main.units.iter().map(|u| u.method.as_str()).collect();
    assert_eq!(
        methods,
        vec!["Initialise", "N30", "ChooseParents", "Crossover", "Mutate"]
    );
    assert_eq!(
        main.unit("N30").unwrap().body,
        UnitBody::Probability {
            percent: 30,
            successors: vec!["ChooseParents".to_string()],
        }
    );
}

#[test]
fn test_node_type_spellings() {
    for (type_name, expected) in [
        ("Interactive Node", NodeKind::Interactive),
        ("interactive", NodeKind::Interactive),
        ("AND Gate Node", NodeKind::AndGate),
        ("AndGate", NodeKind::AndGate),
        ("Loop Node", NodeKind::Loop { iterations: 0 }),
        ("Midpoint", NodeKind::Midpoint),
    ] {
        let line = format!(r#"{{"nodeId":1,"nodeType":"{}","nodeName":"X"}}"#, type_name);
        let graph = SceneDefinition::from_json_lines(&line)
            .unwrap()
            .into_flow()
            .unwrap();
        assert_eq!(node(&graph, 1).kind, expected, "type '{}'", type_name);
    }
}

#[test]
fn test_unknown_node_type() {
    let line = r#"{"nodeId":9,"nodeType":"Teleport Node","nodeName":"X"}"#;
    let result = SceneDefinition::from_json_lines(line).unwrap().into_flow();
    match result {
        Err(SceneError::UnknownNodeType { node, type_name }) => {
            assert_eq!(node, 9);
            assert_eq!(type_name, "Teleport Node");
        }
        other => panic!("Expected UnknownNodeType, got {:?}", other),
    }
}

#[test]
fn test_probability_requires_a_percentage() {
    let line = r#"{"nodeId":4,"nodeType":"Probability Node","nodeName":"often"}"#;
    let result = SceneDefinition::from_json_lines(line).unwrap().into_flow();
    assert!(matches!(
        result,
        Err(SceneError::MissingParameter { node: 4, .. })
    ));

    let line = r#"{"nodeId":4,"nodeType":"Probability Node","nodeName":"often","probability":65}"#;
    let graph = SceneDefinition::from_json_lines(line).unwrap().into_flow().unwrap();
    assert_eq!(node(&graph, 4).kind, NodeKind::Probability { percent: 65 });
}

#[test]
fn test_json_errors_report_their_line() {
    let contents = "{\"nodeId\":1,\"nodeType\":\"Interactive Node\"}\n\n{\"nodeId\":2,";
    match SceneDefinition::from_json_lines(contents) {
        Err(SceneError::Json { line, .. }) => assert_eq!(line, 3),
        other => panic!("Expected Json error, got {:?}", other),
    }
}

#[test]
fn test_invalid_port_is_rejected() {
    let contents = concat!(
        r#"{"nodeId":1,"nodeType":"Interactive Node","connections":[{"startPos":"Sideways","connNodeId":2,"endPos":"0"}]}"#,
        "\n",
        r#"{"nodeId":2,"nodeType":"Interactive Node"}"#,
    );
    let result = SceneDefinition::from_json_lines(contents).unwrap().into_flow();
    assert!(matches!(result, Err(SceneError::InvalidPort(_))));
}

#[test]
fn test_dangling_connection_is_rejected() {
    let line = r#"{"nodeId":1,"nodeType":"Interactive Node","connections":[{"startPos":"0","connNodeId":42,"endPos":"0"}]}"#;
    let result = SceneDefinition::from_json_lines(line).unwrap().into_flow();
    assert!(matches!(
        result,
        Err(SceneError::Graph(GraphError::NodeNotFound { .. }))
    ));
}

#[test]
fn test_internals_become_nested_scopes() {
    let line = r#"{"nodeId":1,"nodeType":"Interactive Node","nodeName":"Breed","internals":[{"nodeId":1,"nodeType":"Interactive Node","nodeName":"Pick","connections":[{"startPos":"0","connNodeId":2,"endPos":"0"}]},{"nodeId":2,"nodeType":"Interactive Node","nodeName":"Cross"}]}"#;
    let graph = SceneDefinition::from_json_lines(line)
        .unwrap()
        .into_flow()
        .unwrap();

    let inner = graph.scope(NodeId(1)).expect("Nested scope missing");
    assert_eq!(inner.len(), 2);
    assert_eq!(inner.resolved_successors(NodeId(1)), vec![NodeId(2)]);

    let program = compile(&graph);
    assert_eq!(program.scope("Breed").unwrap().starts, vec!["Pick".to_string()]);
}

#[test]
fn test_graph_survives_a_save_and_reload() {
    let mut graph = create_loop_graph(3);
    let inner = build_graph(
        vec![interactive(1, "Pick Parents"), interactive(2, "Cross Over")],
        &[(1, 2)],
    );
    graph.add_scope(NodeId(3), inner).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("breeding.jsonl");
    SceneDefinition::from_graph(&graph).save(&path).unwrap();

    let reloaded = SceneDefinition::from_file(&path).unwrap().into_flow().unwrap();
    assert_eq!(reloaded.len(), graph.len());
    assert_eq!(compile(&reloaded), compile(&graph));
}

#[test]
fn test_missing_scene_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        SceneDefinition::from_file(dir.path().join("absent.jsonl")),
        Err(SceneError::Io(_))
    ));
}

#[test]
fn test_flow_graph_converts_to_itself() {
    let graph = create_and_gate_graph();
    let converted = graph.clone().into_flow().unwrap();
    assert_eq!(compile(&converted), compile(&graph));
}
