use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::Config;
use crate::discover::{discover_notebooks, DiscoveryError};
use crate::execute::{executor_for, CellExecutor};
use crate::outcome::{outcome_from_reports, ExecutionOutcome, NotebookReport};
use crate::pipeline::test_notebook;

#[derive(Debug, Clone, Default)]
pub struct TestRequest {
    pub paths: Vec<PathBuf>,
}

/// Discovers, executes and judges every requested notebook.
///
/// Discovery problems and a missing engine come back as user errors; individual
/// notebooks that cannot be executed are reported as errored.
///
/// # Errors
/// Returns an error only when the worker pool cannot be created.
pub fn run_tests(config: &Config, request: &TestRequest) -> Result<ExecutionOutcome> {
    let paths = if request.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        request.paths.clone()
    };
    let notebooks = match discover_notebooks(&paths) {
        Ok(found) => found,
        Err(err) => {
            let reason = match err.downcast_ref::<DiscoveryError>() {
                Some(DiscoveryError::MissingPath(_)) => "missing_path",
                Some(DiscoveryError::Empty) => "no_notebooks",
                None => "discovery_failed",
            };
            return Ok(ExecutionOutcome::user_error(
                format!("{err:#}"),
                json!({ "reason": reason }),
            ));
        }
    };
    let executor = match executor_for(config) {
        Ok(executor) => executor,
        Err(err) => {
            return Ok(ExecutionOutcome::user_error(
                format!("{err:#}"),
                json!({ "reason": "engine_unavailable", "engine": config.engine().kind }),
            ));
        }
    };
    let reports = run_notebooks(executor.as_ref(), &notebooks, config.jobs())?;
    Ok(outcome_from_reports(reports))
}

/// Tests `notebooks` with up to `jobs` running at once; reports keep input order.
///
/// # Errors
/// Returns an error when the worker pool cannot be created.
pub fn run_notebooks(
    executor: &dyn CellExecutor,
    notebooks: &[PathBuf],
    jobs: usize,
) -> Result<Vec<NotebookReport>> {
    if jobs <= 1 || notebooks.len() <= 1 {
        return Ok(notebooks
            .iter()
            .map(|path| run_one(executor, path))
            .collect());
    }
    debug!(jobs, notebooks = notebooks.len(), "running notebooks in parallel");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("building notebook worker pool")?;
    Ok(pool.install(|| {
        notebooks
            .par_iter()
            .map(|path| run_one(executor, path))
            .collect()
    }))
}

fn run_one(executor: &dyn CellExecutor, path: &Path) -> NotebookReport {
    match test_notebook(path, executor) {
        Ok(verdict) => NotebookReport::from_verdict(path.to_path_buf(), verdict),
        Err(err) => {
            warn!(notebook = %path.display(), error = %err, "notebook could not be executed");
            NotebookReport::errored(path.to_path_buf(), err.to_string())
        }
    }
}
