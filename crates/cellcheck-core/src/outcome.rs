use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::interpret::Verdict;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.status {
            CommandStatus::Ok => 0,
            CommandStatus::UserError => 1,
            CommandStatus::Failure => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotebookStatus {
    Passed,
    Failed,
    Errored,
}

/// Result of testing one notebook, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotebookReport {
    pub path: PathBuf,
    pub status: NotebookStatus,
    #[serde(default)]
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotebookReport {
    pub fn from_verdict(path: PathBuf, verdict: Verdict) -> Self {
        let (success, transcript) = verdict.into_parts();
        Self {
            path,
            status: if success {
                NotebookStatus::Passed
            } else {
                NotebookStatus::Failed
            },
            transcript,
            error: None,
        }
    }

    pub fn errored(path: PathBuf, error: impl Into<String>) -> Self {
        Self {
            path,
            status: NotebookStatus::Errored,
            transcript: String::new(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl Summary {
    pub fn tally(reports: &[NotebookReport]) -> Self {
        let mut summary = Self {
            total: reports.len(),
            ..Self::default()
        };
        for report in reports {
            match report.status {
                NotebookStatus::Passed => summary.passed += 1,
                NotebookStatus::Failed => summary.failed += 1,
                NotebookStatus::Errored => summary.errored += 1,
            }
        }
        summary
    }

    pub fn describe(&self) -> String {
        let noun = if self.total == 1 {
            "notebook"
        } else {
            "notebooks"
        };
        format!(
            "{} {noun}: {} passed, {} failed, {} errored",
            self.total, self.passed, self.failed, self.errored
        )
    }
}

/// Folds per-notebook reports into one outcome; errors outrank failures.
pub fn outcome_from_reports(reports: Vec<NotebookReport>) -> ExecutionOutcome {
    let summary = Summary::tally(&reports);
    let details = json!({
        "summary": summary,
        "notebooks": reports,
    });
    let message = summary.describe();
    if summary.errored > 0 {
        ExecutionOutcome::failure(message, details)
    } else if summary.failed > 0 {
        ExecutionOutcome::user_error(message, details)
    } else {
        ExecutionOutcome::success(message, details)
    }
}

/// `{status,message,details}` envelope printed by `--json`.
pub fn to_json_response(outcome: &ExecutionOutcome) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": outcome.message,
        "details": details,
    })
}
