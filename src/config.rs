//! Configuration for exporting and running flowcharts.
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.

use crate::compiler::CollisionPolicy;
use crate::error::ConfigError;
use crate::runtime::DEFAULT_MAX_STEPS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub export: ExportConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that exported folders are created in
    pub output_root: PathBuf,

    /// Folder name; a local timestamp when unset
    pub folder: Option<String>,

    /// Directory to copy the runtime support files from, instead of the embedded copies
    pub support_dir: Option<PathBuf>,

    pub collision_policy: CollisionPolicy,

    /// Name of the top-level scope struct
    pub main_scope: String,

    /// Also write a `mod.rs` declaring every generated module
    pub write_module_index: bool,

    /// Also write the compiled program as a bincode artifact
    pub write_artifact: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("Exported Code"),
            folder: None,
            support_dir: None,
            collision_policy: CollisionPolicy::default(),
            main_scope: "Main".to_string(),
            write_module_index: true,
            write_artifact: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Executed nodes allowed per run before it is aborted
    pub max_steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl FlowConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse TOML: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize TOML: {}", e)))
    }
}
