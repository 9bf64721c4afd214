use cellcheck_domain::Cell;

/// Token that marks a cell as part of the notebook's test suite.
pub const TEST_MARKER: &str = "@test";

/// Literal substring match; comments, strings and markdown all count.
pub fn contains_marker(cell: &Cell, marker: &str) -> bool {
    cell.source.contains(marker)
}

/// Keeps the cells whose source contains `marker`, preserving order.
pub fn filter_marked(cells: Vec<Cell>, marker: &str) -> Vec<Cell> {
    cells
        .into_iter()
        .filter(|cell| contains_marker(cell, marker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(cells: &[Cell]) -> Vec<&str> {
        cells.iter().map(|cell| cell.source.as_str()).collect()
    }

    fn sample() -> Vec<Cell> {
        vec![
            Cell::code("import math"),
            Cell::code("# @test\nclass T(unittest.TestCase): pass"),
            Cell::markdown("Notes about @test cells"),
            Cell::code("x = 1"),
            Cell::code("def f():\n    \"\"\"@test\n    >>> f()\n    1\n    \"\"\"\n    return 1"),
        ]
    }

    #[test]
    fn keeps_marked_cells_in_original_order() {
        let kept = filter_marked(sample(), TEST_MARKER);
        assert_eq!(
            sources(&kept),
            vec![
                "# @test\nclass T(unittest.TestCase): pass",
                "Notes about @test cells",
                "def f():\n    \"\"\"@test\n    >>> f()\n    1\n    \"\"\"\n    return 1",
            ]
        );
    }

    #[test]
    fn refiltering_is_idempotent() {
        let once = filter_marked(sample(), TEST_MARKER);
        let twice = filter_marked(once.clone(), TEST_MARKER);
        assert_eq!(once, twice);
    }

    #[test]
    fn no_matches_yields_empty_sequence() {
        let cells = vec![Cell::code("print('hi')"), Cell::code("@tes t")];
        assert!(filter_marked(cells, TEST_MARKER).is_empty());
    }

    #[test]
    fn match_is_case_sensitive_substring() {
        assert!(contains_marker(&Cell::code("x = 1  # @testing"), TEST_MARKER));
        assert!(!contains_marker(&Cell::code("# @Test"), TEST_MARKER));
    }
}
