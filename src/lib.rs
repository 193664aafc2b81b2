//! # evoflow - Flowchart Compiler for Evolutionary Algorithms
//!
//! **evoflow** turns flowcharts of typed nodes (decisions, probabilities, loops,
//! AND gates, interactive sub-flows and midpoints) into generated Rust source.
//! The generated code calls into two small runtime modules that are exported
//! alongside it, so the result builds on its own with only `rand` as a dependency.
//!
//! ## Core Workflow
//!
//! 1.  **Build or Load a Graph**: Construct a `FlowGraph` directly, or load an editor
//!     save file with `SceneDefinition::from_file` and convert it with `IntoFlow`.
//! 2.  **Compile**: `Compiler::builder(&graph)` validates the graph and produces a
//!     `CompiledProgram` with one unit per reachable node, grouped into scopes.
//! 3.  **Export or Run**: `ExportDriver` writes one source file per scope plus the
//!     runtime support files. `Executor` runs the compiled program in-process with the
//!     same semantics, which is handy for testing a flowchart before exporting it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use evoflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut graph = FlowGraph::new();
//!     graph.add_node(Node::new(1, "50%", NodeKind::Probability { percent: 50 }))?;
//!     graph.add_node(Node::new(2, "Mutate", NodeKind::decision()))?;
//!     graph.connect(Edge::simple(1, 2))?;
//!
//!     let program = Compiler::builder(&graph).build().compile()?;
//!
//!     let mut rt = NodeImplementation::new();
//!     let trace = Executor::new(&program).run(&mut rt)?;
//!     println!("{}", trace);
//!
//!     let summary = ExportDriver::new(ExportConfig::default()).export(&graph)?;
//!     println!("Exported to {}", summary.folder.display());
//!     Ok(())
//! }
//! ```

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod prelude;
pub mod runtime;
pub mod scene;
pub mod walker;
