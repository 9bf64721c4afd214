use std::path::PathBuf;

use cellcheck_core::EngineKind;
use clap::{ArgAction, Parser, ValueEnum};

pub const CELLCHECK_ABOUT: &str =
    "Run the cells marked `@test` in Jupyter notebooks and report whether their unittest and doctest suites pass.";

pub const CELLCHECK_AFTER_HELP: &str = concat!(
    "Examples:\n",
    "  cellcheck                         Test every notebook under the current directory.\n",
    "  cellcheck docs/ -j 4              Test notebooks under docs/ four at a time.\n",
    "  cellcheck nb.ipynb --engine python\n",
    "                                    Run without Jupyter using a bare interpreter.\n\n",
    "Exit codes: 0 all passed, 1 tests failed or bad input, 2 a notebook could not be executed.",
);

#[derive(Parser, Debug)]
#[command(
    name = "cellcheck",
    author,
    version,
    about = CELLCHECK_ABOUT,
    after_help = CELLCHECK_AFTER_HELP
)]
#[allow(clippy::struct_excessive_bools)]
pub struct CellcheckCli {
    #[arg(value_name = "PATH", help = "Notebooks or directories to test (default: .)")]
    pub paths: Vec<PathBuf>,
    #[arg(long, value_enum, help = "Execution engine (env: CELLCHECK_ENGINE)")]
    pub engine: Option<EngineArg>,
    #[arg(long, value_name = "NAME", help = "Jupyter kernel name (env: CELLCHECK_KERNEL)")]
    pub kernel: Option<String>,
    #[arg(long, value_name = "PATH", help = "Interpreter for the python engine (env: CELLCHECK_PYTHON)")]
    pub python: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "jupyter executable (env: CELLCHECK_JUPYTER)")]
    pub jupyter: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Notebooks to run concurrently (env: CELLCHECK_JOBS)"
    )]
    pub jobs: Option<u16>,
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)"
    )]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Show every transcript; -vv raises logging")]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q")]
    pub trace: bool,
    #[arg(long, help = "Emit {status,message,details} JSON envelopes")]
    pub json: bool,
    #[arg(long, help = "Disable colored human output")]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EngineArg {
    Jupyter,
    Python,
}

impl From<EngineArg> for EngineKind {
    fn from(value: EngineArg) -> Self {
        match value {
            EngineArg::Jupyter => EngineKind::Jupyter,
            EngineArg::Python => EngineKind::Python,
        }
    }
}
