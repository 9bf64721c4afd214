use cellcheck_domain::{Cell, Notebook};
use tracing::{debug, warn};

use super::{apply_outputs, CellExecutor, ExecutionContext, ExecutionError};
use crate::process::run_command_with_input;

const ENGINE: &str = "jupyter";

/// Executes through `jupyter nbconvert` and a real kernel.
///
/// The notebook travels over stdin/stdout so the kernel's working directory is
/// the subprocess's, i.e. the notebook's folder.
#[derive(Debug, Clone)]
pub struct JupyterExecutor {
    jupyter: String,
    kernel: String,
}

impl JupyterExecutor {
    pub fn new(jupyter: impl Into<String>, kernel: impl Into<String>) -> Self {
        Self {
            jupyter: jupyter.into(),
            kernel: kernel.into(),
        }
    }

    pub(crate) fn args(&self) -> Vec<String> {
        vec![
            "nbconvert".to_string(),
            "--to".to_string(),
            "notebook".to_string(),
            "--execute".to_string(),
            "--stdin".to_string(),
            "--stdout".to_string(),
            "--ExecutePreprocessor.timeout=-1".to_string(),
            format!("--ExecutePreprocessor.kernel_name={}", self.kernel),
        ]
    }
}

impl CellExecutor for JupyterExecutor {
    fn name(&self) -> &'static str {
        ENGINE
    }

    fn execute(&self, cells: &mut [Cell], ctx: &ExecutionContext) -> Result<(), ExecutionError> {
        let notebook = Notebook::new(with_cell_ids(cells));
        let payload = notebook.to_json().to_string();
        debug!(
            cells = cells.len(),
            kernel = %self.kernel,
            workdir = %ctx.workdir().display(),
            "executing notebook via nbconvert"
        );
        let output = run_command_with_input(
            &self.jupyter,
            &self.args(),
            &[],
            ctx.workdir(),
            payload.as_bytes(),
        )
        .map_err(|err| ExecutionError::Launch {
            engine: ENGINE,
            detail: format!("{err:#}"),
        })?;
        if !output.success() {
            warn!(code = output.code, "nbconvert reported a failing cell");
            return Err(ExecutionError::Engine {
                engine: ENGINE,
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        let executed = parse_executed(&output.stdout)?;
        apply_outputs(
            ENGINE,
            cells,
            executed.cells.into_iter().map(|cell| cell.outputs).collect(),
        )
    }
}

// nbformat 4.5 requires an id on every cell; harness cells are created without one.
fn with_cell_ids(cells: &[Cell]) -> Vec<Cell> {
    cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let mut cell = cell.clone();
            if cell.id.is_none() {
                cell.id = Some(format!("cellcheck-{index}"));
            }
            cell
        })
        .collect()
}

fn parse_executed(stdout: &str) -> Result<Notebook, ExecutionError> {
    Notebook::from_json(stdout).map_err(|err| ExecutionError::Protocol {
        engine: ENGINE,
        detail: err.to_string(),
    })
}
