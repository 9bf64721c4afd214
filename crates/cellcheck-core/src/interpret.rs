//! Turns the captured console output of the runner cells into a verdict.
//!
//! Neither test framework reports structured results through the notebook, so
//! pass/fail is decided by looking for each framework's all-pass summary token
//! near the end of its transcript.

use cellcheck_domain::{Cell, CellRole, Output};
use serde::Serialize;

/// How many trailing characters are searched for the summary token.
pub const SUMMARY_TAIL_CHARS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InterpretError {
    #[error("executed notebook has no {0} cell")]
    MissingRunner(CellRole),
}

pub trait PassCriterion {
    fn passed(&self, transcript: &str) -> bool;
}

/// Passes when `marker` occurs within the last `width` characters.
///
/// Trailing output longer than `width` after the marker hides it; callers rely
/// on that exact behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailMarker {
    pub marker: &'static str,
    pub width: usize,
}

impl PassCriterion for TailMarker {
    fn passed(&self, transcript: &str) -> bool {
        tail_chars(transcript, self.width).contains(self.marker)
    }
}

fn tail_chars(text: &str, width: usize) -> &str {
    if width == 0 {
        return "";
    }
    match text.char_indices().rev().nth(width - 1) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerKind {
    Unittest,
    Doctest,
}

impl RunnerKind {
    pub const ALL: [RunnerKind; 2] = [RunnerKind::Unittest, RunnerKind::Doctest];

    pub fn role(self) -> CellRole {
        match self {
            Self::Unittest => CellRole::UnittestRunner,
            Self::Doctest => CellRole::DoctestRunner,
        }
    }

    pub fn criterion(self) -> TailMarker {
        let marker = match self {
            Self::Unittest => "OK",
            Self::Doctest => "Test passed.",
        };
        TailMarker {
            marker,
            width: SUMMARY_TAIL_CHARS,
        }
    }
}

/// Every fragment followed by a newline, in append order.
pub fn transcript(outputs: &[Output]) -> String {
    let mut text = String::new();
    for output in outputs {
        text.push_str(&output.text());
        text.push('\n');
    }
    text
}

/// Outcome of one notebook run: overall success plus the combined console text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    success: bool,
    transcript: String,
}

impl Verdict {
    pub fn new(success: bool, transcript: impl Into<String>) -> Self {
        Self {
            success,
            transcript: transcript.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn into_parts(self) -> (bool, String) {
        (self.success, self.transcript)
    }
}

/// Judges one runner cell. Empty output means that kind of test was absent.
pub fn judge_runner(kind: RunnerKind, outputs: &[Output]) -> (bool, String) {
    if outputs.is_empty() {
        return (true, String::new());
    }
    let text = transcript(outputs);
    (kind.criterion().passed(&text), text)
}

pub fn interpret(cells: &[Cell]) -> Result<Verdict, InterpretError> {
    let mut success = true;
    let mut combined = String::new();
    for kind in RunnerKind::ALL {
        let cell = cells
            .iter()
            .rev()
            .find(|cell| cell.role == kind.role())
            .ok_or(InterpretError::MissingRunner(kind.role()))?;
        let (passed, text) = judge_runner(kind, &cell.outputs);
        success = success && passed;
        combined.push_str(&text);
    }
    Ok(Verdict::new(success, combined))
}
