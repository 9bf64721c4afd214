use std::path::Path;

use cellcheck_domain::{Notebook, NotebookError};
use tracing::{debug, info};

use crate::execute::{CellExecutor, ExecutionContext, ExecutionError};
use crate::harness::prepare;
use crate::interpret::{interpret, InterpretError, Verdict};

#[derive(Debug, thiserror::Error)]
pub enum NotebookTestError {
    #[error(transparent)]
    Notebook(#[from] NotebookError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Interpret(#[from] InterpretError),
}

/// Filters, wraps, executes and judges an in-memory notebook.
///
/// A notebook whose tests ran but failed is `Ok` with an unsuccessful verdict;
/// `Err` means the notebook could not be executed at all.
pub fn test_loaded_notebook(
    notebook: &mut Notebook,
    executor: &dyn CellExecutor,
    ctx: &ExecutionContext,
) -> Result<Verdict, NotebookTestError> {
    prepare(notebook);
    debug!(cells = notebook.cells.len(), "assembled test notebook");
    executor.execute(&mut notebook.cells, ctx)?;
    Ok(interpret(&notebook.cells)?)
}

pub fn test_notebook(
    path: &Path,
    executor: &dyn CellExecutor,
) -> Result<Verdict, NotebookTestError> {
    let mut notebook = Notebook::read(path)?;
    let ctx = ExecutionContext::for_notebook(path);
    let verdict = test_loaded_notebook(&mut notebook, executor, &ctx)?;
    info!(
        notebook = %path.display(),
        success = verdict.success(),
        engine = executor.name(),
        "notebook tested"
    );
    Ok(verdict)
}
