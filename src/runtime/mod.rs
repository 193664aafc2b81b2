pub mod call_stack;
mod executor;
pub mod node_implementation;

pub use call_stack::CallStack;
pub use executor::{DEFAULT_MAX_STEPS, ExecutionTrace, Executor, TraceEntry};
pub use node_implementation::{NodeImplementation, loop_unroll};

/// Exported copy of `node_implementation.rs`.
pub const NODE_IMPLEMENTATION_SOURCE: &str = include_str!("node_implementation.rs");
/// Exported copy of `call_stack.rs`.
pub const CALL_STACK_SOURCE: &str = include_str!("call_stack.rs");

pub const NODE_IMPLEMENTATION_FILE: &str = "node_implementation.rs";
pub const CALL_STACK_FILE: &str = "call_stack.rs";
