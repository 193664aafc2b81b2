use serde::{Deserialize, Serialize};

/// A saved editor scene: one node per line of the save file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneDefinition {
    pub nodes: Vec<SerializedNode>,
}

/// One node as the editor writes it. Layout fields such as position and
/// colour are ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedNode {
    pub node_id: u32,
    pub node_type: String,
    #[serde(default)]
    pub node_name: String,
    #[serde(default, alias = "Connections")]
    pub connections: Vec<SerializedConnection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths_taken: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<u32>,
    /// Nested scope of an interactive node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internals: Vec<SerializedNode>,
}

/// An outgoing connection, from connector `start_pos` of the owning node to
/// connector `end_pos` of node `conn_node_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedConnection {
    pub start_pos: String,
    pub conn_node_id: u32,
    pub end_pos: String,
}
