//! Rust source emission for compiled scopes.
//!
//! Every scope becomes one `scope_<module>.rs` file holding a unit struct with
//! one associated function per node. The functions call into the exported
//! `node_implementation` and `call_stack` modules.

use crate::compiler::{CompiledProgram, CompiledScope, CompiledUnit, UnitBody};
use crate::runtime::{CALL_STACK_FILE, NODE_IMPLEMENTATION_FILE};
use itertools::Itertools;
use std::fmt;

pub mod visualizer;

/// Generated source for one scope.
pub fn emit_scope(program: &CompiledProgram, scope: &CompiledScope) -> String {
    ScopeSource { program, scope }.to_string()
}

/// Generated `mod.rs` declaring the support modules and every scope.
pub fn module_index(program: &CompiledProgram) -> String {
    ModuleIndex(program).to_string()
}

struct ScopeSource<'a> {
    program: &'a CompiledProgram,
    scope: &'a CompiledScope,
}

impl fmt::Display for ScopeSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope;
        writeln!(f, "//! Generated from flowchart scope `{}`.", scope.name)?;
        writeln!(f)?;
        writeln!(f, "use super::call_stack::CallStack;")?;
        writeln!(f, "use super::node_implementation::NodeImplementation;")?;
        writeln!(f, "use rand::Rng;")?;
        writeln!(f)?;
        writeln!(f, "pub struct {};", scope.name)?;
        writeln!(f)?;
        writeln!(f, "#[allow(non_snake_case)]")?;
        writeln!(f, "impl {} {{", scope.name)?;
        writeln!(
            f,
            "    pub const START_NODES: &'static [&'static str] = {};",
            str_slice(&scope.starts)
        )?;
        writeln!(f)?;
        writeln!(f, "    pub fn run<R: Rng>(rt: &mut NodeImplementation<R>) {{")?;
        writeln!(f, "        let mut stack = CallStack::new();")?;
        writeln!(f, "        stack.add_to_stack(Self::START_NODES.iter().copied());")?;
        writeln!(f, "        stack.call_stack(|name| {{")?;
        writeln!(f, "            let next = Self::dispatch(rt, name);")?;
        writeln!(f, "            rt.record_call(name);")?;
        writeln!(f, "            next")?;
        writeln!(f, "        }});")?;
        writeln!(f, "    }}")?;
        writeln!(f)?;
        writeln!(
            f,
            "    fn dispatch<R: Rng>(rt: &mut NodeImplementation<R>, name: &str) -> Vec<&'static str> {{"
        )?;
        writeln!(f, "        match name {{")?;
        for unit in &scope.units {
            writeln!(
                f,
                "            \"{}\" => Self::{}(rt),",
                unit.method, unit.method
            )?;
        }
        writeln!(f, "            _ => Vec::new(),")?;
        writeln!(f, "        }}")?;
        writeln!(f, "    }}")?;

        for unit in &scope.units {
            writeln!(f)?;
            self.write_unit(f, unit)?;
        }
        writeln!(f, "}}")
    }
}

impl ScopeSource<'_> {
    fn write_unit(&self, f: &mut fmt::Formatter<'_>, unit: &CompiledUnit) -> fmt::Result {
        writeln!(f, "    /// {} node #{}.", unit.body.kind_name(), unit.node.0)?;
        writeln!(
            f,
            "    pub fn {}<R: Rng>(rt: &mut NodeImplementation<R>) -> Vec<&'static str> {{",
            unit.method
        )?;
        match &unit.body {
            UnitBody::Probability {
                percent,
                successors,
            } => {
                writeln!(f, "        if rt.probability_roll({}) {{", percent)?;
                writeln!(f, "            {}", str_vec(successors))?;
                writeln!(f, "        }} else {{")?;
                writeln!(f, "            Vec::new()")?;
                writeln!(f, "        }}")?;
            }
            UnitBody::Decision {
                paths_taken,
                successors,
            } => {
                writeln!(
                    f,
                    "        rt.decision_choose({}, {})",
                    paths_taken,
                    str_vec(successors)
                )?;
            }
            UnitBody::AndGate { gate, successors } => {
                writeln!(f, "        rt.and_gate({:?}, {})", gate, str_vec(successors))?;
            }
            UnitBody::Loop {
                iterations,
                body,
                exits,
            } => {
                writeln!(
                    f,
                    "        rt.loop_unroll({}, {}, {})",
                    iterations,
                    str_slice(body),
                    str_vec(exits)
                )?;
            }
            UnitBody::Interactive { scope, successors } => {
                let module = self
                    .program
                    .scope(scope)
                    .map(|s| s.module.as_str())
                    .unwrap_or("scope_missing");
                writeln!(f, "        super::{}::{}::run(rt);", module, scope)?;
                writeln!(f, "        {}", str_vec(successors))?;
            }
        }
        writeln!(f, "    }}")
    }
}

struct ModuleIndex<'a>(&'a CompiledProgram);

impl fmt::Display for ModuleIndex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "//! Generated flowchart code.")?;
        writeln!(f)?;
        writeln!(f, "pub mod {};", module_of(CALL_STACK_FILE))?;
        writeln!(f, "pub mod {};", module_of(NODE_IMPLEMENTATION_FILE))?;
        for scope in &self.0.scopes {
            writeln!(f, "pub mod {};", scope.module)?;
        }

        if let Some(main) = self.0.main() {
            writeln!(f)?;
            writeln!(f, "pub use {}::{};", main.module, main.name)?;
            writeln!(f)?;
            writeln!(f, "/// Runs the flowchart once with a fresh thread-local random source.")?;
            writeln!(f, "pub fn run() {{")?;
            writeln!(
                f,
                "    let mut rt = node_implementation::NodeImplementation::new();"
            )?;
            writeln!(f, "    {}::run(&mut rt);", main.name)?;
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

fn module_of(file: &str) -> &str {
    file.strip_suffix(".rs").unwrap_or(file)
}

fn quoted(names: &[String]) -> String {
    names.iter().map(|n| format!("{:?}", n)).join(", ")
}

fn str_vec(names: &[String]) -> String {
    if names.is_empty() {
        "Vec::new()".to_string()
    } else {
        format!("vec![{}]", quoted(names))
    }
}

fn str_slice(names: &[String]) -> String {
    format!("&[{}]", quoted(names))
}
