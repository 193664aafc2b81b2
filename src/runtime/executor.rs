use super::call_stack::CallStack;
use super::node_implementation::NodeImplementation;
use crate::compiler::{CompiledProgram, CompiledScope, UnitBody};
use crate::error::RuntimeError;
use rand::Rng;
use std::fmt;
use tracing::{debug, trace};

pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// One executed node and the calls it scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub scope: String,
    pub method: String,
    pub next: Vec<String>,
}

/// The ordered record of a run, nested scopes included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionTrace {
    pub entries: Vec<TraceEntry>,
}

impl ExecutionTrace {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn methods(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.method.as_str()).collect()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.entries.iter().filter(|e| e.method == method).count()
    }
}

impl fmt::Display for ExecutionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (step, entry) in self.entries.iter().enumerate() {
            write!(f, "{:>4}  {}::{}", step, entry.scope, entry.method)?;
            if !entry.next.is_empty() {
                write!(f, " -> {}", entry.next.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Runs a `CompiledProgram` in-process with the same semantics as the
/// generated code.
pub struct Executor<'p> {
    program: &'p CompiledProgram,
    max_steps: usize,
}

impl<'p> Executor<'p> {
    pub fn new(program: &'p CompiledProgram) -> Self {
        Self {
            program,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Runs the main scope from its start nodes until no calls are pending.
    pub fn run<R: Rng>(
        &self,
        rt: &mut NodeImplementation<R>,
    ) -> Result<ExecutionTrace, RuntimeError> {
        let main = self
            .program
            .main()
            .ok_or_else(|| RuntimeError::UnknownScope("<main>".to_string()))?;

        let mut trace = ExecutionTrace::default();
        self.run_scope(main, rt, &mut trace)?;
        debug!(steps = trace.len(), "run finished");
        Ok(trace)
    }

    fn run_scope<R: Rng>(
        &self,
        scope: &CompiledScope,
        rt: &mut NodeImplementation<R>,
        trace: &mut ExecutionTrace,
    ) -> Result<(), RuntimeError> {
        let mut stack = CallStack::new();
        stack.add_to_stack(scope.starts.iter().cloned());

        while let Some(method) = stack.pop() {
            if trace.len() >= self.max_steps {
                return Err(RuntimeError::StepLimitExceeded(self.max_steps));
            }

            let next = self.dispatch(scope, &method, rt, trace)?;
            rt.record_call(&method);
            trace!(scope = %scope.name, %method, next = ?next, "executed node");

            trace.entries.push(TraceEntry {
                scope: scope.name.clone(),
                method,
                next: next.clone(),
            });
            stack.add_to_stack(next);
        }
        Ok(())
    }

    fn dispatch<R: Rng>(
        &self,
        scope: &CompiledScope,
        method: &str,
        rt: &mut NodeImplementation<R>,
        trace: &mut ExecutionTrace,
    ) -> Result<Vec<String>, RuntimeError> {
        let unit = scope
            .unit(method)
            .ok_or_else(|| RuntimeError::UnknownMethod {
                scope: scope.name.clone(),
                method: method.to_string(),
            })?;

        let next = match &unit.body {
            UnitBody::Probability {
                percent,
                successors,
            } => {
                if rt.probability_roll(*percent) {
                    successors.clone()
                } else {
                    Vec::new()
                }
            }
            UnitBody::Decision {
                paths_taken,
                successors,
            } => rt.decision_choose(*paths_taken, successors.clone()),
            UnitBody::AndGate { gate, successors } => rt.and_gate(gate, successors.clone()),
            UnitBody::Loop {
                iterations,
                body,
                exits,
            } => rt.loop_unroll(*iterations, body, exits.clone()),
            UnitBody::Interactive {
                scope: nested,
                successors,
            } => {
                let nested_scope = self
                    .program
                    .scope(nested)
                    .ok_or_else(|| RuntimeError::UnknownScope(nested.clone()))?;
                self.run_scope(nested_scope, rt, trace)?;
                successors.clone()
            }
        };
        Ok(next)
    }
}
