use crate::compiler::{CompiledProgram, CompiledScope, UnitBody};
use itertools::Itertools;
use std::fmt;

/// Formats a complete `CompiledProgram` into a human-readable listing for debugging.
pub fn visualize_program(program: &CompiledProgram) -> String {
    ProgramListing(program).to_string()
}

/// Formats a single scope, one line per compiled unit.
pub fn visualize_scope(scope: &CompiledScope) -> String {
    ScopeListing(scope).to_string()
}

struct ProgramListing<'a>(&'a CompiledProgram);

impl fmt::Display for ProgramListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "======== COMPILED FLOWCHART: {} scope(s), {} unit(s) ========",
            self.0.scopes.len(),
            self.0.unit_count()
        )?;
        for scope in &self.0.scopes {
            writeln!(f)?;
            write!(f, "{}", ScopeListing(scope))?;
        }
        writeln!(f, "\n================ END OF PROGRAM ================")
    }
}

struct ScopeListing<'a>(&'a CompiledScope);

impl fmt::Display for ScopeListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0;
        writeln!(f, "--- SCOPE {} ({}) ---", scope.name, scope.file_name())?;
        writeln!(f, "start: [{}]", scope.starts.iter().join(", "))?;

        for (i, unit) in scope.units.iter().enumerate() {
            let detail = match &unit.body {
                UnitBody::Probability { percent, .. } => format!("{}%", percent),
                UnitBody::Decision { paths_taken, .. } => format!("take {}", paths_taken),
                UnitBody::AndGate { gate, .. } => format!("gate {}", gate),
                UnitBody::Loop {
                    iterations, body, ..
                } => format!("x{} [{}]", iterations, body.iter().join(", ")),
                UnitBody::Interactive { scope, .. } => format!("runs {}", scope),
            };
            writeln!(
                f,
                "{:04}: {:<24} {:<12} {:<20} -> [{}]",
                i,
                unit.method,
                unit.body.kind_name(),
                detail,
                unit.body.successors().iter().join(", ")
            )?;
        }
        Ok(())
    }
}
