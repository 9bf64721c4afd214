//! Synthetic cells wrapped around the marked cells before execution.

use cellcheck_domain::{Cell, CellRole, Notebook};

use crate::filter::{filter_marked, TEST_MARKER};

/// Lets marked cells import modules that live next to the notebook's folder.
const SETUP_SOURCE: &str = "\
import sys
sys.path.append('../')
";

/// Runs every `unittest.TestCase` defined so far; silent when none exist.
const UNITTEST_RUNNER_SOURCE: &str = "\
from IPython.display import clear_output
import unittest

r = unittest.main(argv=[''], verbosity=2, exit=False)

if r.result.testsRun == 0:
    clear_output()
";

/// Runs every docstring example reachable from `__main__`; silent when none exist.
const DOCTEST_RUNNER_SOURCE: &str = "\
from IPython.display import clear_output
import doctest

r = doctest.testmod(verbose=True)

if r.attempted == 0:
    clear_output()
";

pub fn setup_cell() -> Cell {
    Cell::code(SETUP_SOURCE).with_role(CellRole::Setup)
}

pub fn unittest_runner_cell() -> Cell {
    Cell::code(UNITTEST_RUNNER_SOURCE).with_role(CellRole::UnittestRunner)
}

pub fn doctest_runner_cell() -> Cell {
    Cell::code(DOCTEST_RUNNER_SOURCE).with_role(CellRole::DoctestRunner)
}

/// Setup cell first, then the marked cells with saved outputs dropped, then the
/// two runners.
pub fn assemble(filtered: Vec<Cell>) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(filtered.len() + 3);
    cells.push(setup_cell());
    cells.extend(filtered.into_iter().map(|mut cell| {
        cell.outputs.clear();
        cell.execution_count = None;
        cell.with_role(CellRole::UserTest)
    }));
    cells.push(unittest_runner_cell());
    cells.push(doctest_runner_cell());
    cells
}

/// Reduces `notebook` to its marked cells and wraps them in the harness.
pub fn prepare(notebook: &mut Notebook) {
    let cells = std::mem::take(&mut notebook.cells);
    notebook.cells = assemble(filter_marked(cells, TEST_MARKER));
}
