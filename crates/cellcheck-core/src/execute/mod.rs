//! Execution adapters: hand the assembled cells to an interpreter session and
//! write the captured outputs back onto them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cellcheck_domain::{Cell, Output};
use tracing::debug;

use crate::config::{Config, EngineKind};

mod jupyter;
mod python;

pub use jupyter::JupyterExecutor;
pub use python::PythonExecutor;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("cell {index} raised {ename}: {evalue}")]
    CellFailed {
        index: usize,
        ename: String,
        evalue: String,
        traceback: Vec<String>,
    },
    #[error("{engine} exited with code {code}: {stderr}")]
    Engine {
        engine: &'static str,
        code: i32,
        stderr: String,
    },
    #[error("failed to launch {engine}: {detail}")]
    Launch { engine: &'static str, detail: String },
    #[error("{engine} returned unusable results: {detail}")]
    Protocol { engine: &'static str, detail: String },
}

/// Where and how one notebook's cells run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    workdir: PathBuf,
}

impl ExecutionContext {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Cells run from the directory that contains the notebook.
    pub fn for_notebook(path: &Path) -> Self {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Self::new(parent),
            _ => Self::new("."),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

/// Runs a cell sequence in one shared interpreter session.
///
/// Implementations fill each cell's `outputs` in place and fail on the first
/// cell that raises. There is no timeout.
pub trait CellExecutor: Send + Sync {
    fn name(&self) -> &'static str;

    fn execute(&self, cells: &mut [Cell], ctx: &ExecutionContext) -> Result<(), ExecutionError>;
}

/// Builds the executor selected by `config`, resolving its binary.
///
/// # Errors
/// Returns an error when the required interpreter or `jupyter` cannot be found.
pub fn executor_for(config: &Config) -> Result<Box<dyn CellExecutor>> {
    let engine = config.engine();
    let executor: Box<dyn CellExecutor> = match engine.kind {
        EngineKind::Jupyter => {
            let jupyter = match &engine.jupyter {
                Some(explicit) => explicit.clone(),
                None => locate("jupyter").context(
                    "jupyter not found on PATH; install nbconvert or set CELLCHECK_JUPYTER",
                )?,
            };
            Box::new(JupyterExecutor::new(jupyter, engine.kernel.clone()))
        }
        EngineKind::Python => {
            let python = match &engine.python {
                Some(explicit) => explicit.clone(),
                None => detect_interpreter()?,
            };
            Box::new(PythonExecutor::new(python))
        }
    };
    debug!(engine = executor.name(), "selected execution engine");
    Ok(executor)
}

/// First `python3`/`python` on PATH.
///
/// # Errors
/// Returns an error when neither is available.
pub fn detect_interpreter() -> Result<String> {
    for candidate in ["python3", "python"] {
        if let Ok(path) = locate(candidate) {
            return Ok(path);
        }
    }
    anyhow::bail!("no python interpreter found; set CELLCHECK_PYTHON");
}

fn locate(binary: &str) -> Result<String> {
    let path = which::which(binary)?;
    path.into_os_string()
        .into_string()
        .map_err(|_| anyhow::anyhow!("non-utf8 path for {binary}"))
}

/// Copies per-cell outputs reported by an engine onto `cells`.
pub(crate) fn apply_outputs(
    engine: &'static str,
    cells: &mut [Cell],
    outputs: Vec<Vec<Output>>,
) -> Result<(), ExecutionError> {
    if outputs.len() != cells.len() {
        return Err(ExecutionError::Protocol {
            engine,
            detail: format!(
                "expected outputs for {} cells, got {}",
                cells.len(),
                outputs.len()
            ),
        });
    }
    for (cell, captured) in cells.iter_mut().zip(outputs) {
        cell.outputs.extend(captured);
    }
    Ok(())
}
