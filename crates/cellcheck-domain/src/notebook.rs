use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::output::{multiline, Output};

/// Lowest nbformat major version this crate understands.
pub const NBFORMAT_MAJOR: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    #[error("failed to read notebook {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("notebook is not valid nbformat JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported nbformat version {major}.{minor} (need 4.x)")]
    UnsupportedFormat { major: u32, minor: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Code,
    Markdown,
    Raw,
}

/// Why a cell is part of the executed sequence.
///
/// Cells read from disk are authored test cells; the other roles are attached
/// to the synthetic harness cells so they can be found again after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellRole {
    Setup,
    #[default]
    UserTest,
    UnittestRunner,
    DoctestRunner,
}

impl CellRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::UserTest => "user_test",
            Self::UnittestRunner => "unittest_runner",
            Self::DoctestRunner => "doctest_runner",
        }
    }
}

impl fmt::Display for CellRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub kind: CellKind,
    pub id: Option<String>,
    pub source: String,
    pub metadata: Map<String, Value>,
    pub outputs: Vec<Output>,
    pub execution_count: Option<u64>,
    pub role: CellRole,
    attachments: Option<Value>,
}

impl Cell {
    pub fn code(source: impl Into<String>) -> Self {
        Self::new(CellKind::Code, source)
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new(CellKind::Markdown, source)
    }

    fn new(kind: CellKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            id: None,
            source: source.into(),
            metadata: Map::new(),
            outputs: Vec::new(),
            execution_count: None,
            role: CellRole::default(),
            attachments: None,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: CellRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }

    pub fn to_json(&self) -> Value {
        let mut cell = Map::new();
        cell.insert("cell_type".into(), json!(self.kind));
        if let Some(id) = &self.id {
            cell.insert("id".into(), json!(id));
        }
        cell.insert("metadata".into(), Value::Object(self.metadata.clone()));
        cell.insert("source".into(), json!(self.source));
        match self.kind {
            CellKind::Code => {
                cell.insert("execution_count".into(), json!(self.execution_count));
                cell.insert("outputs".into(), json!(self.outputs));
            }
            CellKind::Markdown | CellKind::Raw => {
                if let Some(attachments) = &self.attachments {
                    cell.insert("attachments".into(), attachments.clone());
                }
            }
        }
        Value::Object(cell)
    }
}

#[derive(Deserialize)]
struct RawCell {
    cell_type: CellKind,
    #[serde(default)]
    id: Option<String>,
    #[serde(default, deserialize_with = "multiline")]
    source: String,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    outputs: Vec<Output>,
    #[serde(default)]
    execution_count: Option<u64>,
    #[serde(default)]
    attachments: Option<Value>,
}

impl From<RawCell> for Cell {
    fn from(raw: RawCell) -> Self {
        Self {
            kind: raw.cell_type,
            id: raw.id,
            source: raw.source,
            metadata: raw.metadata,
            outputs: raw.outputs,
            execution_count: raw.execution_count,
            role: CellRole::default(),
            attachments: raw.attachments,
        }
    }
}

#[derive(Deserialize)]
struct RawNotebook {
    #[serde(default)]
    cells: Vec<RawCell>,
    #[serde(default)]
    metadata: Map<String, Value>,
    nbformat: u32,
    #[serde(default)]
    nbformat_minor: u32,
}

/// An ordered sequence of cells plus document metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: Map<String, Value>,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

impl Notebook {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: Map::new(),
            nbformat: NBFORMAT_MAJOR,
            nbformat_minor: 5,
        }
    }

    pub fn read(path: &Path) -> Result<Self, NotebookError> {
        let contents = fs::read_to_string(path).map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, NotebookError> {
        let raw: RawNotebook = serde_json::from_str(contents)?;
        if raw.nbformat < NBFORMAT_MAJOR {
            return Err(NotebookError::UnsupportedFormat {
                major: raw.nbformat,
                minor: raw.nbformat_minor,
            });
        }
        Ok(Self {
            cells: raw.cells.into_iter().map(Cell::from).collect(),
            metadata: raw.metadata,
            nbformat: raw.nbformat,
            nbformat_minor: raw.nbformat_minor,
        })
    }

    pub fn to_json(&self) -> Value {
        json!({
            "cells": self.cells.iter().map(Cell::to_json).collect::<Vec<_>>(),
            "metadata": self.metadata,
            "nbformat": self.nbformat,
            "nbformat_minor": self.nbformat_minor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
      "cells": [
        {
          "cell_type": "markdown",
          "metadata": {},
          "source": ["# Title\n", "Some prose"]
        },
        {
          "cell_type": "code",
          "execution_count": 4,
          "id": "a1b2",
          "metadata": {"tags": []},
          "outputs": [
            {"output_type": "stream", "name": "stdout", "text": ["hello\n"]}
          ],
          "source": "# @test\nprint('hello')"
        }
      ],
      "metadata": {"kernelspec": {"name": "python3"}},
      "nbformat": 4,
      "nbformat_minor": 5
    }"##;

    #[test]
    fn parses_cells_in_order() {
        let notebook = Notebook::from_json(SAMPLE).expect("notebook");
        assert_eq!(notebook.cells.len(), 2);
        assert_eq!(notebook.cells[0].kind, CellKind::Markdown);
        assert_eq!(notebook.cells[0].source, "# Title\nSome prose");
        let code = &notebook.cells[1];
        assert!(code.is_code());
        assert_eq!(code.id.as_deref(), Some("a1b2"));
        assert_eq!(code.execution_count, Some(4));
        assert_eq!(code.outputs, vec![Output::stdout("hello\n")]);
        assert_eq!(code.role, CellRole::UserTest);
    }

    #[test]
    fn rejects_pre_v4_notebooks() {
        let err = Notebook::from_json(r#"{"nbformat": 3, "nbformat_minor": 0, "worksheets": []}"#)
            .expect_err("v3 should be rejected");
        assert!(matches!(
            err,
            NotebookError::UnsupportedFormat { major: 3, minor: 0 }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Notebook::from_json("{ not json").expect_err("parse error");
        assert!(matches!(err, NotebookError::Parse(_)));
    }

    #[test]
    fn serialized_cells_follow_nbformat_shape() {
        let notebook = Notebook::from_json(SAMPLE).expect("notebook");
        let value = notebook.to_json();
        let markdown = &value["cells"][0];
        assert!(markdown.get("outputs").is_none());
        assert!(markdown.get("execution_count").is_none());
        let code = &value["cells"][1];
        assert_eq!(code["outputs"][0]["output_type"], "stream");
        assert_eq!(code["outputs"][0]["text"], "hello\n");
        assert_eq!(code["source"], "# @test\nprint('hello')");
        assert_eq!(value["metadata"]["kernelspec"]["name"], "python3");

        let reparsed = Notebook::from_json(&value.to_string()).expect("reparse");
        assert_eq!(reparsed, notebook);
    }

    #[test]
    fn new_code_cells_serialize_null_execution_count() {
        let value = Cell::code("x = 1").to_json();
        assert_eq!(value["execution_count"], Value::Null);
        assert_eq!(value["outputs"], json!([]));
    }

    #[test]
    fn read_reports_missing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("absent.ipynb");
        let err = Notebook::read(&missing).expect_err("missing file");
        assert!(matches!(err, NotebookError::Io { ref path, .. } if path == &missing));
    }
}
