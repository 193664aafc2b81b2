use crate::error::CompileError;
use crate::graph::NodeId;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// The branching behaviour of one compiled node. Successor lists hold the
/// method names of the nodes to run next, in edge order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitBody {
    Probability {
        percent: u8,
        successors: Vec<String>,
    },
    Decision {
        paths_taken: u32,
        successors: Vec<String>,
    },
    AndGate {
        gate: String,
        successors: Vec<String>,
    },
    Loop {
        iterations: u32,
        body: Vec<String>,
        exits: Vec<String>,
    },
    Interactive {
        scope: String,
        successors: Vec<String>,
    },
}

impl UnitBody {
    /// The statically known next steps. For loops these are the exits.
    pub fn successors(&self) -> &[String] {
        match self {
            UnitBody::Probability { successors, .. }
            | UnitBody::Decision { successors, .. }
            | UnitBody::AndGate { successors, .. }
            | UnitBody::Interactive { successors, .. } => successors,
            UnitBody::Loop { exits, .. } => exits,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            UnitBody::Probability { .. } => "probability",
            UnitBody::Decision { .. } => "decision",
            UnitBody::AndGate { .. } => "and-gate",
            UnitBody::Loop { .. } => "loop",
            UnitBody::Interactive { .. } => "interactive",
        }
    }
}

/// One callable unit per compiled node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledUnit {
    pub node: NodeId,
    pub method: String,
    pub body: UnitBody,
}

/// The compiled form of one scope: the main flowchart or the internals of an
/// interactive node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledScope {
    pub name: String,
    pub module: String,
    pub starts: Vec<String>,
    pub units: Vec<CompiledUnit>,
}

impl CompiledScope {
    pub fn unit(&self, method: &str) -> Option<&CompiledUnit> {
        self.units.iter().find(|u| u.method == method)
    }

    pub fn file_name(&self) -> String {
        format!("{}.rs", self.module)
    }
}

/// Every scope of a flowchart, the main scope first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledProgram {
    pub scopes: Vec<CompiledScope>,
}

impl CompiledProgram {
    pub fn main(&self) -> Option<&CompiledScope> {
        self.scopes.first()
    }

    pub fn scope(&self, name: &str) -> Option<&CompiledScope> {
        self.scopes.iter().find(|s| s.name == name)
    }

    pub fn unit_count(&self) -> usize {
        self.scopes.iter().map(|s| s.units.len()).sum()
    }

    /// Saves the compiled program to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), CompileError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| {
            CompileError::Artifact(format!("Could not create file '{}': {}", path, e))
        })?;
        file.write_all(&bytes).map_err(|e| {
            CompileError::Artifact(format!("Could not write to file '{}': {}", path, e))
        })?;
        Ok(())
    }

    /// Loads a compiled program from a file.
    pub fn from_file(path: &str) -> Result<Self, CompileError> {
        let mut file = fs::File::open(path).map_err(|e| {
            CompileError::Artifact(format!("Could not open file '{}': {}", path, e))
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            CompileError::Artifact(format!("Could not read from file '{}': {}", path, e))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CompileError> {
        encode_to_vec(self, standard())
            .map_err(|e| CompileError::Artifact(format!("Serialization failed: {}", e)))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CompileError> {
        decode_from_slice(bytes, standard())
            .map(|(program, _)| program)
            .map_err(|e| CompileError::Artifact(format!("Deserialization failed: {}", e)))
    }
}
