use crate::codegen::{emit_scope, module_index};
use crate::compiler::{CompiledProgram, Compiler};
use crate::config::ExportConfig;
use crate::error::{CompileError, ExportError};
use crate::graph::FlowGraph;
use crate::runtime::{
    CALL_STACK_FILE, CALL_STACK_SOURCE, NODE_IMPLEMENTATION_FILE, NODE_IMPLEMENTATION_SOURCE,
};
use chrono::Local;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub mod folder;

pub use folder::{default_folder_name, unique_folder};

pub const MODULE_INDEX_FILE: &str = "mod.rs";
pub const ARTIFACT_FILE: &str = "program.bin";

/// What an export wrote, in write order.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub folder: PathBuf,
    pub files: Vec<PathBuf>,
    pub program: CompiledProgram,
}

/// Compiles a flowchart and writes the generated sources into a fresh folder.
pub struct ExportDriver {
    config: ExportConfig,
}

impl ExportDriver {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn compile(&self, graph: &FlowGraph) -> Result<CompiledProgram, CompileError> {
        Compiler::builder(graph)
            .with_collision_policy(self.config.collision_policy)
            .with_main_scope(&self.config.main_scope)
            .build()
            .compile()
    }

    pub fn export(&self, graph: &FlowGraph) -> Result<ExportSummary, ExportError> {
        self.try_export(graph)
            .inspect_err(|e| error!(error = %e, "export failed"))
    }

    fn try_export(&self, graph: &FlowGraph) -> Result<ExportSummary, ExportError> {
        let program = self.compile(graph)?;
        let support = self.support_sources()?;

        let folder = self.resolve_folder();
        fs::create_dir_all(&folder).map_err(|e| io_error(&folder, e))?;
        info!(folder = %folder.display(), "exporting flowchart");

        let mut files = Vec::new();
        for (name, source) in &support {
            files.push(write_file(&folder.join(name), source)?);
        }
        for scope in &program.scopes {
            let source = emit_scope(&program, scope);
            files.push(write_file(&folder.join(scope.file_name()), &source)?);
        }
        if self.config.write_module_index {
            files.push(write_file(
                &folder.join(MODULE_INDEX_FILE),
                &module_index(&program),
            )?);
        }
        if self.config.write_artifact {
            let path = folder.join(ARTIFACT_FILE);
            let bytes = program.to_bytes()?;
            fs::write(&path, bytes).map_err(|e| io_error(&path, e))?;
            debug!(path = %path.display(), "wrote artifact");
            files.push(path);
        }

        info!(
            folder = %folder.display(),
            files = files.len(),
            scopes = program.scopes.len(),
            "export finished"
        );
        Ok(ExportSummary {
            folder,
            files,
            program,
        })
    }

    /// The folder this export would write to, given what already exists.
    pub fn resolve_folder(&self) -> PathBuf {
        let base = self
            .config
            .folder
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_folder_name(Local::now()));
        unique_folder(&self.config.output_root, &base)
    }

    /// The two runtime support files, read from `support_dir` when configured.
    fn support_sources(&self) -> Result<[(&'static str, Cow<'static, str>); 2], ExportError> {
        match &self.config.support_dir {
            Some(dir) => Ok([
                (NODE_IMPLEMENTATION_FILE, read_support(dir, NODE_IMPLEMENTATION_FILE)?),
                (CALL_STACK_FILE, read_support(dir, CALL_STACK_FILE)?),
            ]),
            None => Ok([
                (NODE_IMPLEMENTATION_FILE, Cow::Borrowed(NODE_IMPLEMENTATION_SOURCE)),
                (CALL_STACK_FILE, Cow::Borrowed(CALL_STACK_SOURCE)),
            ]),
        }
    }
}

fn read_support(dir: &Path, name: &str) -> Result<Cow<'static, str>, ExportError> {
    let path = dir.join(name);
    if !path.is_file() {
        return Err(ExportError::MissingSupportFile(path.display().to_string()));
    }
    fs::read_to_string(&path)
        .map(Cow::Owned)
        .map_err(|e| io_error(&path, e))
}

fn write_file(path: &Path, content: &str) -> Result<PathBuf, ExportError> {
    fs::write(path, content).map_err(|e| io_error(path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(path.to_path_buf())
}

fn io_error(path: &Path, e: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
