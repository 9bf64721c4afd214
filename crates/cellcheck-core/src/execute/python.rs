use std::fs;

use cellcheck_domain::{Cell, Output};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{apply_outputs, CellExecutor, ExecutionContext, ExecutionError};
use crate::process::run_command_with_input;

const ENGINE: &str = "python";
const CELL_DRIVER: &str = include_str!("cell_driver.py");
const RESULT_FILE: &str = "cells.json";

/// Executes cells with a plain interpreter and a bundled driver script.
///
/// The driver keeps one `__main__` module alive across cells, so definitions
/// from earlier cells are visible to the runner cells. IPython magics are not
/// supported.
#[derive(Debug, Clone)]
pub struct PythonExecutor {
    python: String,
}

#[derive(Serialize)]
struct DriverCell<'a> {
    kind: &'static str,
    source: &'a str,
}

#[derive(Debug, Deserialize)]
struct DriverResult {
    outputs: Vec<Vec<Output>>,
    #[serde(default)]
    error: Option<DriverFailure>,
}

#[derive(Debug, Deserialize)]
struct DriverFailure {
    index: usize,
    ename: String,
    evalue: String,
    #[serde(default)]
    traceback: Vec<String>,
}

impl PythonExecutor {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    fn request(cells: &[Cell]) -> String {
        let cells: Vec<DriverCell<'_>> = cells
            .iter()
            .map(|cell| DriverCell {
                kind: if cell.is_code() { "code" } else { "skip" },
                source: &cell.source,
            })
            .collect();
        json!({ "cells": cells }).to_string()
    }
}

impl CellExecutor for PythonExecutor {
    fn name(&self) -> &'static str {
        ENGINE
    }

    fn execute(&self, cells: &mut [Cell], ctx: &ExecutionContext) -> Result<(), ExecutionError> {
        let launch = |detail: String| ExecutionError::Launch {
            engine: ENGINE,
            detail,
        };
        let scratch = tempfile::Builder::new()
            .prefix("cellcheck-")
            .tempdir()
            .map_err(|err| launch(format!("creating scratch dir: {err}")))?;
        let result_path = scratch.path().join(RESULT_FILE);
        let args = vec![
            "-c".to_string(),
            CELL_DRIVER.to_string(),
            result_path.display().to_string(),
        ];
        debug!(
            cells = cells.len(),
            python = %self.python,
            workdir = %ctx.workdir().display(),
            "executing notebook via cell driver"
        );
        let output = run_command_with_input(
            &self.python,
            &args,
            &[("PYTHONUNBUFFERED".to_string(), "1".to_string())],
            ctx.workdir(),
            Self::request(cells).as_bytes(),
        )
        .map_err(|err| launch(format!("{err:#}")))?;
        if !output.success() {
            return Err(ExecutionError::Engine {
                engine: ENGINE,
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        let raw = fs::read_to_string(&result_path).map_err(|err| ExecutionError::Protocol {
            engine: ENGINE,
            detail: format!("reading {}: {err}", result_path.display()),
        })?;
        let result: DriverResult =
            serde_json::from_str(&raw).map_err(|err| ExecutionError::Protocol {
                engine: ENGINE,
                detail: err.to_string(),
            })?;
        apply_outputs(ENGINE, cells, result.outputs)?;
        match result.error {
            Some(failure) => {
                warn!(cell = failure.index, ename = %failure.ename, "cell raised");
                Err(ExecutionError::CellFailed {
                    index: failure.index,
                    ename: failure.ename,
                    evalue: failure.evalue,
                    traceback: failure.traceback,
                })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn request_marks_non_code_cells_as_skipped() {
        let request = PythonExecutor::request(&[Cell::markdown("# @test"), Cell::code("x = 1")]);
        let value: Value = serde_json::from_str(&request).expect("json");
        assert_eq!(value["cells"][0]["kind"], "skip");
        assert_eq!(value["cells"][1]["kind"], "code");
        assert_eq!(value["cells"][1]["source"], "x = 1");
    }

    #[test]
    fn driver_result_parses_failures() {
        let raw = r#"{
            "outputs": [[], [{"output_type": "error", "ename": "NameError", "evalue": "name 'y' is not defined", "traceback": ["NameError: name 'y' is not defined"]}], []],
            "error": {"index": 1, "ename": "NameError", "evalue": "name 'y' is not defined", "traceback": []}
        }"#;
        let result: DriverResult = serde_json::from_str(raw).expect("result");
        assert_eq!(result.outputs.len(), 3);
        assert!(result.outputs[1][0].is_error());
        let failure = result.error.expect("failure");
        assert_eq!(failure.index, 1);
        assert_eq!(failure.ename, "NameError");
    }

    #[test]
    fn driver_script_is_bundled() {
        assert!(CELL_DRIVER.contains("def main()"));
        assert!(CELL_DRIVER.contains("clear_output"));
    }
}
