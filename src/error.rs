use crate::graph::NodeId;
use thiserror::Error;

/// Errors raised while building or validating a flow graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {missing} not found, which is required by {context}")]
    NodeNotFound { missing: NodeId, context: String },

    #[error("Node {0} already exists in this scope")]
    DuplicateNode(NodeId),

    #[error("Node {node} cannot be connected to itself")]
    SelfConnection { node: NodeId },

    #[error("Node {source_node} is already connected to node {target_node}")]
    DuplicateConnection {
        source_node: NodeId,
        target_node: NodeId,
    },

    #[error("Node {node} would exceed its output limit of {limit}")]
    OutputLimitExceeded { node: NodeId, limit: usize },

    #[error("Node {node} has an invalid parameter: {message}")]
    InvalidParameter { node: NodeId, message: String },

    #[error("Node {0} is not an interactive node and cannot own a nested scope")]
    NotInteractive(NodeId),

    #[error("Cycle {path} does not pass through a loop node")]
    UnanchoredCycle { path: String },

    #[error("Loop node {node} has no path that returns to it")]
    LoopNeverCloses { node: NodeId },

    #[error("AND gate {node} has {predecessors} converging paths, but at most 2 are supported")]
    AndGateArity { node: NodeId, predecessors: usize },
}

/// Errors that can occur while loading a saved scene.
#[derive(Error, Debug, Clone)]
pub enum SceneError {
    #[error("Failed to parse scene JSON on line {line}: {message}")]
    Json { line: usize, message: String },

    #[error("Node {node} has an unknown node type: '{type_name}'")]
    UnknownNodeType { node: u32, type_name: String },

    #[error("Invalid connector name '{0}'")]
    InvalidPort(String),

    #[error("Node {node} is missing its '{parameter}' parameter")]
    MissingParameter { node: u32, parameter: String },

    #[error("Scene file error: {0}")]
    Io(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors that can occur during the compilation phase.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Nodes {first} and {second} both normalize to the identifier '{identifier}'")]
    IdentifierCollision {
        identifier: String,
        first: NodeId,
        second: NodeId,
    },

    #[error("Compiled artifact error: {0}")]
    Artifact(String),
}

/// Errors that can occur while executing a compiled program in-process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Execution exceeded the step limit of {0}")]
    StepLimitExceeded(usize),

    #[error("Scope '{0}' not found in the compiled program")]
    UnknownScope(String),

    #[error("Method '{method}' not found in scope '{scope}'")]
    UnknownMethod { scope: String, method: String },
}

/// Errors that can occur while writing an export to disk.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    #[error("Runtime support file '{0}' is missing")]
    MissingSupportFile(String),

    #[error("Filesystem error at '{path}': {message}")]
    Io { path: String, message: String },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Errors that can occur while loading configuration.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid config: {0}")]
    Parse(String),
}
