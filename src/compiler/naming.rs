use crate::error::CompileError;
use crate::graph::{Node, NodeId};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What to do when two nodes normalize to the same method name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Fail compilation.
    #[default]
    Error,
    /// Keep the first name and append `_2`, `_3`, ... to later ones.
    Suffix,
}

/// Normalizes a display name into a method identifier.
///
/// `"mutate  the pool"` becomes `"MutateThePool"`. Characters that cannot
/// appear in an identifier are dropped, and a leading digit gets an `N` prefix.
pub fn method_name(display: &str) -> String {
    let ident: String = display
        .split_whitespace()
        .map(title_case)
        .collect::<String>()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    let first = ident.chars().next();
    match first {
        Some(c) if c.is_ascii_digit() => format!("N{}", ident),
        _ if ident == "Self" => "SelfNode".to_string(),
        _ => ident,
    }
}

fn title_case(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turns a `TitleCase` identifier into a `snake_case` module name.
pub fn module_name(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, c) in ident.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Assigns every node of one scope a unique method name.
pub struct IdentifierTable {
    policy: CollisionPolicy,
    by_node: AHashMap<NodeId, String>,
    owners: AHashMap<String, NodeId>,
}

impl IdentifierTable {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            by_node: AHashMap::new(),
            owners: AHashMap::new(),
        }
    }

    pub fn assign(&mut self, node: &Node) -> Result<String, CompileError> {
        if let Some(existing) = self.by_node.get(&node.id) {
            return Ok(existing.clone());
        }

        let mut ident = method_name(&node.name);
        if ident.is_empty() {
            ident = format!("Node{}", node.id.0);
        }

        if let Some(&first) = self.owners.get(&ident) {
            match self.policy {
                CollisionPolicy::Error => {
                    return Err(CompileError::IdentifierCollision {
                        identifier: ident,
                        first,
                        second: node.id,
                    });
                }
                CollisionPolicy::Suffix => {
                    let base = ident;
                    let mut n = 2;
                    ident = format!("{}_{}", base, n);
                    while self.owners.contains_key(&ident) {
                        n += 1;
                        ident = format!("{}_{}", base, n);
                    }
                    warn!(node = %node.id, %base, renamed = %ident, "identifier collision resolved with a suffix");
                }
            }
        }

        self.owners.insert(ident.clone(), node.id);
        self.by_node.insert(node.id, ident.clone());
        Ok(ident)
    }

    pub fn get(&self, id: NodeId) -> Option<&str> {
        self.by_node.get(&id).map(String::as_str)
    }
}
