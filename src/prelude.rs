//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the evoflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use evoflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = SceneDefinition::from_file("saves/breeding.jsonl")?.into_flow()?;
//! let config = FlowConfig::from_file("evoflow.toml")?;
//!
//! let summary = ExportDriver::new(config.export).export(&graph)?;
//! println!("Wrote {} files", summary.files.len());
//! # Ok(())
//! # }
//! ```

// Graph model and traversal
pub use crate::graph::{Compass, Edge, FlowGraph, Node, NodeId, NodeKind, Port};
pub use crate::walker::{GraphWalker, LoopBody, validate};

// Compilation
pub use crate::compiler::{
    CollisionPolicy, CompiledProgram, CompiledScope, CompiledUnit, Compiler, UnitBody,
};

// Execution and export
pub use crate::export::{ExportDriver, ExportSummary};
pub use crate::runtime::{CallStack, ExecutionTrace, Executor, NodeImplementation, TraceEntry};

// Scene loading
pub use crate::scene::{IntoFlow, SceneDefinition, SerializedConnection, SerializedNode};

// Configuration
pub use crate::config::{ExportConfig, FlowConfig, RunConfig};

// Error types
pub use crate::error::{
    CompileError, ConfigError, ExportError, GraphError, RuntimeError, SceneError,
};

// Result type alias for convenience
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
