#![deny(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod notebook;
pub mod output;

pub use notebook::{Cell, CellKind, CellRole, Notebook, NotebookError, NBFORMAT_MAJOR};
pub use output::Output;
