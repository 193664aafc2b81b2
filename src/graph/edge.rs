use super::NodeId;
use crate::error::SceneError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compass position of a midpoint connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compass {
    Top,
    Right,
    Btm,
    Left,
}

impl Compass {
    pub fn opposite(self) -> Self {
        match self {
            Compass::Top => Compass::Btm,
            Compass::Btm => Compass::Top,
            Compass::Left => Compass::Right,
            Compass::Right => Compass::Left,
        }
    }
}

/// A named connector on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Port {
    Compass(Compass),
    Index(u32),
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Compass(c) => write!(f, "{:?}Conn", c),
            Port::Index(i) => write!(f, "{}", i),
        }
    }
}

impl FromStr for Port {
    type Err = SceneError;

    /// Accepts `TopConn`/`Top` style compass names and `output-1`/`1` style indices.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_suffix("Conn").unwrap_or(trimmed);
        let compass = match name.to_ascii_lowercase().as_str() {
            "top" => Some(Compass::Top),
            "right" => Some(Compass::Right),
            "btm" | "bottom" => Some(Compass::Btm),
            "left" => Some(Compass::Left),
            _ => None,
        };
        if let Some(c) = compass {
            return Ok(Port::Compass(c));
        }

        name.rsplit('-')
            .next()
            .and_then(|idx| idx.parse().ok())
            .map(Port::Index)
            .ok_or_else(|| SceneError::InvalidPort(s.to_string()))
    }
}

/// A directed connection from one node's output port to another node's input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub source_port: Port,
    pub target: NodeId,
    pub target_port: Port,
}

impl Edge {
    pub fn new(source: NodeId, source_port: Port, target: NodeId, target_port: Port) -> Self {
        Self {
            source,
            source_port,
            target,
            target_port,
        }
    }

    /// An edge using index ports `0 -> 0`.
    pub fn simple(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::new(source.into(), Port::Index(0), target.into(), Port::Index(0))
    }
}
