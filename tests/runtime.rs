//! Tests for the runtime primitives and the in-process executor.
mod common;
use common::*;
use evoflow::prelude::*;
use evoflow::runtime::{CALL_STACK_SOURCE, NODE_IMPLEMENTATION_SOURCE, loop_unroll};

#[test]
fn test_decision_choose_returns_distinct_subset() {
    let mut rt = seeded(7);
    let candidates = vec!["A", "B", "C", "D", "E"];

    for _ in 0..100 {
        let chosen = rt.decision_choose(2, candidates.clone());
        assert_eq!(chosen.len(), 2);
        assert_ne!(chosen[0], chosen[1]);
        assert!(chosen.iter().all(|c| candidates.contains(c)));
    }

    assert_eq!(rt.decision_choose(5, candidates.clone()), candidates);
    assert_eq!(rt.decision_choose(9, vec!["A", "B"]), vec!["A", "B"]);
}

#[test]
fn test_decision_choose_reaches_every_candidate() {
    let mut rt = seeded(11);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.extend(rt.decision_choose(1, vec!["A", "B", "C"]));
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_and_gate_rendezvous() {
    let mut rt = NodeImplementation::new();
    assert!(!rt.and_gate_arrive("Main::Join"));
    assert!(rt.and_gate_arrive("Main::Join"));

    // The gate is cleared when it fires, so the next pair starts over.
    assert!(!rt.and_gate_arrive("Main::Join"));
    assert!(!rt.and_gate_arrive("Main::Other"));
    assert!(rt.and_gate_arrive("Main::Join"));

    assert_eq!(rt.and_gate("Gate", vec!["Next"]), Vec::<&str>::new());
    assert_eq!(rt.and_gate("Gate", vec!["Next"]), vec!["Next"]);
}

#[test]
fn test_reset_clears_pending_gates_and_last_call() {
    let mut rt = NodeImplementation::new();
    rt.and_gate_arrive("Gate");
    rt.record_call("Mutate");
    rt.reset();

    assert_eq!(rt.last_call(), None);
    assert!(!rt.and_gate_arrive("Gate"));
}

#[test]
fn test_loop_unroll_repeats_body_then_exits() {
    let body = ["A", "B", "C"];
    let unrolled = loop_unroll(2, &body, vec!["D"], Some("Start"));
    assert_eq!(unrolled, vec!["A", "B", "C", "A", "B", "C", "D"]);

    assert_eq!(loop_unroll(0, &body, vec!["D"], None), vec!["D"]);

    // The body's entry node is never repeated as an exit.
    assert_eq!(loop_unroll(1, &body, vec!["A", "D"], None), vec!["A", "B", "C", "D"]);
}

#[test]
fn test_loop_unroll_is_empty_after_terminal_node() {
    let body = ["A", "B", "C"];
    assert!(loop_unroll(3, &body, vec!["D"], Some("C")).is_empty());

    let mut rt = NodeImplementation::new();
    rt.record_call("C");
    assert!(rt.loop_unroll(3, &body, vec!["D"]).is_empty());
    rt.record_call("B");
    assert_eq!(rt.loop_unroll(1, &body, vec!["D"]).len(), 4);
}

#[test]
fn test_probability_roll_bounds() {
    let mut rt = NodeImplementation::new();
    assert!((0..1000).all(|_| !rt.probability_roll(0)));
    assert!((0..1000).all(|_| rt.probability_roll(100)));

    let mut rt = seeded(3);
    let hits = (0..1000).filter(|_| rt.probability_roll(50)).count();
    assert!(hits > 350 && hits < 650, "50% rolled {} hits out of 1000", hits);
}

#[test]
fn test_call_stack_runs_depth_first_in_list_order() {
    let mut stack = CallStack::new();
    stack.add_to_stack(vec![1, 2]);

    let mut order = Vec::new();
    stack.call_stack(|&call| {
        order.push(call);
        match call {
            1 => vec![10, 11],
            10 => vec![100],
            _ => Vec::new(),
        }
    });

    assert_eq!(order, vec![1, 10, 100, 11, 2]);
    assert!(stack.is_empty());
}

#[test]
fn test_embedded_support_sources_are_self_contained() {
    assert!(NODE_IMPLEMENTATION_SOURCE.contains("pub struct NodeImplementation"));
    assert!(CALL_STACK_SOURCE.contains("pub struct CallStack"));
    assert!(!NODE_IMPLEMENTATION_SOURCE.contains("crate::"));
    assert!(!CALL_STACK_SOURCE.contains("crate::"));
}

#[test]
fn test_executor_runs_loop_body_exactly_n_times() {
    let program = compile(&create_loop_graph(3));
    let mut rt = seeded(1);
    let trace = Executor::new(&program).run(&mut rt).unwrap();

    assert_eq!(trace.calls_to("Start"), 1);
    assert_eq!(trace.calls_to("Select"), 3);
    assert_eq!(trace.calls_to("Mutate"), 3);
    assert_eq!(trace.calls_to("Finish"), 1);
    // Once to unroll, then once after every pass.
    assert_eq!(trace.calls_to("Repeat"), 4);
    assert_eq!(trace.methods().last(), Some(&"Finish"));
}

#[test]
fn test_executor_zero_iteration_loop_takes_exit() {
    let program = compile(&create_loop_graph(0));
    let trace = Executor::new(&program).run(&mut seeded(1)).unwrap();
    assert_eq!(trace.methods(), vec!["Start", "Repeat", "Finish"]);
}

#[test]
fn test_executor_fires_and_gate_once_both_paths_arrive() {
    let program = compile(&create_and_gate_graph());
    let trace = Executor::new(&program).run(&mut seeded(5)).unwrap();

    assert_eq!(
        trace.methods(),
        vec!["Start", "Left", "Join", "Right", "Join", "Done"]
    );
    let joins: Vec<&TraceEntry> = trace.entries.iter().filter(|e| e.method == "Join").collect();
    assert!(joins[0].next.is_empty());
    assert_eq!(joins[1].next, vec!["Done".to_string()]);
}

#[test]
fn test_executor_runs_nested_scopes() {
    let mut graph = build_graph(
        vec![interactive(1, "Breed"), interactive(2, "Evaluate")],
        &[(1, 2)],
    );
    let inner = build_graph(
        vec![interactive(1, "Pick Parents"), interactive(2, "Cross Over")],
        &[(1, 2)],
    );
    graph.add_scope(NodeId(1), inner).unwrap();

    let program = compile(&graph);
    let trace = Executor::new(&program).run(&mut seeded(2)).unwrap();

    assert_eq!(
        trace.methods(),
        vec!["PickParents", "CrossOver", "Breed", "Evaluate"]
    );
    assert_eq!(trace.entries[0].scope, "Breed");
    assert_eq!(trace.entries[2].scope, "Main");
}

#[test]
fn test_executor_step_limit() {
    let program = compile(&create_loop_graph(1000));
    let result = Executor::new(&program)
        .with_max_steps(50)
        .run(&mut seeded(4));
    assert_eq!(result, Err(RuntimeError::StepLimitExceeded(50)));
}

#[test]
fn test_executor_reports_unknown_method() {
    let mut program = compile(&create_and_gate_graph());
    program.scopes[0].starts = vec!["Ghost".to_string()];

    let result = Executor::new(&program).run(&mut seeded(6));
    assert_eq!(
        result,
        Err(RuntimeError::UnknownMethod {
            scope: "Main".to_string(),
            method: "Ghost".to_string(),
        })
    );
}

#[test]
fn test_executor_probability_outcomes() {
    let program = compile(&create_probability_graph(50));
    let executor = Executor::new(&program);
    let mut rt = seeded(9);

    let mut fired = 0;
    for _ in 0..200 {
        rt.reset();
        let trace = executor.run(&mut rt).unwrap();
        match trace.len() {
            1 => assert_eq!(trace.methods(), vec!["Start"]),
            3 => {
                assert_eq!(trace.methods(), vec!["Start", "A", "B"]);
                fired += 1;
            }
            n => panic!("unexpected trace length {}", n),
        }
    }
    assert!(fired > 0 && fired < 200);

    let always = compile(&create_probability_graph(100));
    let trace = Executor::new(&always).run(&mut seeded(9)).unwrap();
    assert_eq!(trace.len(), 3);
}

#[test]
fn test_executor_runs_diamond_inside_loop() {
    let program = compile(&create_diamond_loop_graph(2));
    let trace = Executor::new(&program).run(&mut seeded(8)).unwrap();

    let pass = ["Split", "Left", "Right", "Join", "Join", "Repeat"];
    let mut expected = vec!["Start", "Repeat"];
    expected.extend(pass);
    expected.extend(pass);
    expected.push("Finish");
    assert_eq!(trace.methods(), expected);

    // The join fires once per pass, after both branches.
    let fired: Vec<&TraceEntry> = trace
        .entries
        .iter()
        .filter(|e| e.method == "Join" && !e.next.is_empty())
        .collect();
    assert_eq!(fired.len(), 2);
    assert!(fired.iter().all(|e| e.next == vec!["Repeat".to_string()]));
}
