#![deny(clippy::all)]

pub mod config;
pub mod discover;
pub mod execute;
pub mod filter;
pub mod harness;
pub mod interpret;
pub mod outcome;
pub mod pipeline;
pub mod process;
pub mod run;

pub use cellcheck_domain::{Cell, CellKind, CellRole, Notebook, NotebookError, Output};

pub use crate::config::{Config, EngineConfig, EngineKind};
pub use crate::discover::{discover_notebooks, DiscoveryError};
pub use crate::execute::{
    executor_for, CellExecutor, ExecutionContext, ExecutionError, JupyterExecutor, PythonExecutor,
};
pub use crate::filter::{filter_marked, TEST_MARKER};
pub use crate::harness::{assemble, prepare};
pub use crate::interpret::{interpret, InterpretError, PassCriterion, RunnerKind, TailMarker, Verdict};
pub use crate::outcome::{
    outcome_from_reports, to_json_response, CommandStatus, ExecutionOutcome, NotebookReport,
    NotebookStatus, Summary,
};
pub use crate::pipeline::{test_loaded_notebook, test_notebook, NotebookTestError};
pub use crate::process::RunOutput;
pub use crate::run::{run_notebooks, run_tests, TestRequest};
