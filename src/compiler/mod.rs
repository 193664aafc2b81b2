use crate::error::{CompileError, GraphError};
use crate::graph::{FlowGraph, NodeId, NodeKind};
use crate::walker::{GraphWalker, LoopBody, validate};
use ahash::{AHashMap, AHashSet};
use tracing::{debug, info};

#[cfg(feature = "debug-tools")]
use {crate::codegen::visualizer, std::fs};

pub mod naming;
mod unit;

pub use naming::{CollisionPolicy, IdentifierTable, method_name, module_name};
pub use unit::*;

/// Compiles a validated `FlowGraph` into one `CompiledUnit` per reachable node.
pub struct Compiler<'g> {
    graph: &'g FlowGraph,
    policy: CollisionPolicy,
    main_scope: String,
}

pub struct CompilerBuilder<'g> {
    graph: &'g FlowGraph,
    policy: CollisionPolicy,
    main_scope: String,
}

impl<'g> CompilerBuilder<'g> {
    pub fn new(graph: &'g FlowGraph) -> Self {
        Self {
            graph,
            policy: CollisionPolicy::default(),
            main_scope: "Main".to_string(),
        }
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_main_scope(mut self, name: &str) -> Self {
        self.main_scope = name.to_string();
        self
    }

    pub fn build(self) -> Compiler<'g> {
        Compiler {
            graph: self.graph,
            policy: self.policy,
            main_scope: self.main_scope,
        }
    }
}

/// Per-scope context while compiling its units.
struct ScopeContext<'a> {
    walker: GraphWalker<'a>,
    idents: IdentifierTable,
    loops: AHashMap<NodeId, LoopBody>,
}

impl<'g> Compiler<'g> {
    pub fn builder(graph: &'g FlowGraph) -> CompilerBuilder<'g> {
        CompilerBuilder::new(graph)
    }

    pub fn compile(self) -> Result<CompiledProgram, CompileError> {
        validate(self.graph)?;

        let mut scope_names = AHashSet::new();
        let mut scopes = Vec::new();
        let main = unique_scope_name(&method_name(&self.main_scope), &mut scope_names);
        self.compile_scope(self.graph, main, &mut scope_names, &mut scopes)?;

        let program = CompiledProgram { scopes };
        info!(
            scopes = program.scopes.len(),
            units = program.unit_count(),
            "flowchart compiled"
        );

        #[cfg(feature = "debug-tools")]
        for scope in &program.scopes {
            self.write_debug_file(
                &format!("tmp/{}_units.txt", scope.module),
                &visualizer::visualize_scope(scope),
            )?;
        }

        Ok(program)
    }

    fn compile_scope(
        &self,
        graph: &FlowGraph,
        name: String,
        scope_names: &mut AHashSet<String>,
        scopes: &mut Vec<CompiledScope>,
    ) -> Result<(), CompileError> {
        let walker = GraphWalker::new(graph);
        let order = walker.reachable();

        let mut idents = IdentifierTable::new(self.policy);
        for &id in &order {
            idents.assign(graph.require(id, "the compiled path")?)?;
        }

        let loops = walker.loop_bodies()?;

        let ctx = ScopeContext {
            walker,
            idents,
            loops,
        };

        let starts = ctx
            .walker
            .find_start_nodes()
            .into_iter()
            .map(|id| ctx.name_of(id))
            .collect::<Result<Vec<_>, _>>()?;

        // Reserve the slot so the enclosing scope precedes its nested scopes.
        let slot = scopes.len();
        scopes.push(CompiledScope {
            module: format!("scope_{}", module_name(&name)),
            name: name.clone(),
            starts,
            units: Vec::new(),
        });

        let mut units = Vec::with_capacity(order.len());
        for id in order {
            let node = graph.require(id, "the compiled path")?;
            let method = ctx.name_of(id)?;
            let successors = ctx.names_of(&ctx.successors(id))?;

            let body = match &node.kind {
                NodeKind::Probability { percent } => UnitBody::Probability {
                    percent: *percent,
                    successors,
                },
                NodeKind::Decision { paths_taken } => UnitBody::Decision {
                    paths_taken: *paths_taken,
                    successors,
                },
                NodeKind::AndGate => UnitBody::AndGate {
                    gate: format!("{}::{}", name, method),
                    successors,
                },
                NodeKind::Loop { iterations } => {
                    let loop_body = ctx
                        .loops
                        .get(&id)
                        .ok_or(GraphError::LoopNeverCloses { node: id })?;
                    let body = ctx.pass_names(graph, loop_body)?;
                    let exits = successors
                        .into_iter()
                        .filter(|s| !body.contains(s))
                        .collect();
                    UnitBody::Loop {
                        iterations: *iterations,
                        body,
                        exits,
                    }
                }
                NodeKind::Interactive => {
                    let nested_name = unique_scope_name(&method, scope_names);
                    let empty = FlowGraph::new();
                    let nested = graph.scope(id).unwrap_or(&empty);
                    self.compile_scope(nested, nested_name.clone(), scope_names, scopes)?;
                    UnitBody::Interactive {
                        scope: nested_name,
                        successors,
                    }
                }
                NodeKind::Midpoint => continue,
            };

            debug!(scope = %name, %method, kind = body.kind_name(), "compiled node");
            units.push(CompiledUnit {
                node: id,
                method,
                body,
            });
        }

        info!(scope = %name, units = units.len(), "scope compiled");
        scopes[slot].units = units;
        Ok(())
    }

    #[cfg(feature = "debug-tools")]
    fn write_debug_file(&self, path: &str, content: &str) -> Result<(), CompileError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CompileError::Artifact(format!("Failed to create debug directory: {}", e))
            })?;
        }
        fs::write(path, content)
            .map_err(|e| CompileError::Artifact(format!("Failed to write debug file: {}", e)))
    }
}

impl ScopeContext<'_> {
    fn name_of(&self, id: NodeId) -> Result<String, CompileError> {
        self.idents.get(id).map(str::to_string).ok_or_else(|| {
            GraphError::NodeNotFound {
                missing: id,
                context: "the identifier table".to_string(),
            }
            .into()
        })
    }

    fn names_of(&self, ids: &[NodeId]) -> Result<Vec<String>, CompileError> {
        ids.iter().map(|&id| self.name_of(id)).collect()
    }

    /// Method names of one unrolled pass. An AND gate is listed once per
    /// body path converging on it, so it fires once per pass.
    fn pass_names(
        &self,
        graph: &FlowGraph,
        body: &LoopBody,
    ) -> Result<Vec<String>, CompileError> {
        let mut names = Vec::with_capacity(body.nodes.len());
        for &id in &body.nodes {
            let name = self.name_of(id)?;
            let arrivals = match graph.node(id).map(|n| &n.kind) {
                Some(NodeKind::AndGate) => self
                    .walker
                    .predecessors(id)
                    .into_iter()
                    .filter(|p| body.contains(*p))
                    .count()
                    .max(1),
                _ => 1,
            };
            names.extend(std::iter::repeat_n(name, arrivals));
        }
        Ok(names)
    }

    /// Resolved successors, minus the edges a loop's unrolled sequence owns.
    ///
    /// Inside a loop body only the terminal node keeps its edge back to the
    /// loop node, and edges between body members are dropped.
    fn successors(&self, id: NodeId) -> Vec<NodeId> {
        let mut successors = self.walker.successors(id);
        for (&loop_id, body) in &self.loops {
            if !body.contains(id) {
                continue;
            }
            let is_terminal = body.terminal() == Some(id);
            successors.retain(|s| !body.contains(*s) && (*s != loop_id || is_terminal));
        }
        successors
    }
}

/// Type names a generated scope file already uses. A scope struct named like
/// one of them would clash with its imports or shadow `Vec`.
pub const RESERVED_SCOPE_NAMES: &[&str] =
    &["CallStack", "NodeImplementation", "Rng", "Vec", "R"];

fn unique_scope_name(base: &str, taken: &mut AHashSet<String>) -> String {
    let base = if base.is_empty() { "Scope" } else { base };
    let mut name = base.to_string();
    let mut n = 2;
    while RESERVED_SCOPE_NAMES.contains(&name.as_str()) || !taken.insert(name.clone()) {
        name = format!("{}_{}", base, n);
        n += 1;
    }
    name
}
