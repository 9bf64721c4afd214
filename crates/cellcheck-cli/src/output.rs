use cellcheck_core::{ExecutionOutcome, NotebookReport, NotebookStatus};
use serde_json::Value;

use crate::style::Style;

pub struct OutputOptions {
    pub quiet: bool,
    pub verbose: u8,
    pub json: bool,
}

pub fn emit_output(opts: &OutputOptions, style: &Style, outcome: &ExecutionOutcome) -> anyhow::Result<i32> {
    if opts.json {
        let payload = cellcheck_core::to_json_response(outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(outcome.exit_code());
    }

    let reports = reports_from_details(&outcome.details);
    if reports.is_empty() {
        // Nothing ran; the message explains why.
        eprintln!("{}", style.status(&outcome.status, &outcome.message));
        return Ok(outcome.exit_code());
    }
    if opts.quiet {
        for line in errored_causes(style, &reports) {
            eprintln!("{line}");
        }
        return Ok(outcome.exit_code());
    }
    for report in &reports {
        print!("{}", render_report(opts, style, report));
    }
    println!("{}", style.status(&outcome.status, &outcome.message));
    Ok(outcome.exit_code())
}

/// One `path: cause` line per notebook that could not be executed.
pub(crate) fn errored_causes(style: &Style, reports: &[NotebookReport]) -> Vec<String> {
    reports
        .iter()
        .filter(|report| report.status == NotebookStatus::Errored)
        .filter_map(|report| {
            let error = report.error.as_deref()?;
            Some(style.error_detail(&format!("{}: {error}", report.path.display())))
        })
        .collect()
}

fn reports_from_details(details: &Value) -> Vec<NotebookReport> {
    details
        .get("notebooks")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default()
}

pub(crate) fn render_report(opts: &OutputOptions, style: &Style, report: &NotebookReport) -> String {
    let mut rendered = style.notebook(report.status, &report.path.display().to_string());
    rendered.push('\n');
    let show_transcript = match report.status {
        NotebookStatus::Passed => opts.verbose > 0,
        NotebookStatus::Failed => true,
        NotebookStatus::Errored => false,
    };
    if show_transcript && !report.transcript.trim().is_empty() {
        rendered.push_str(&style.transcript(report.transcript.trim_end()));
        rendered.push('\n');
    }
    if let Some(error) = &report.error {
        rendered.push_str(&style.error_detail(error));
        rendered.push('\n');
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn opts(verbose: u8) -> OutputOptions {
        OutputOptions {
            quiet: false,
            verbose,
            json: false,
        }
    }

    fn report(status: NotebookStatus, transcript: &str, error: Option<&str>) -> NotebookReport {
        NotebookReport {
            path: PathBuf::from("nb.ipynb"),
            status,
            transcript: transcript.to_string(),
            error: error.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn passing_transcripts_only_show_when_verbose() {
        let style = Style::new(true, false);
        let passed = report(NotebookStatus::Passed, "Ran 1 test\n\nOK\n\n", None);
        assert_eq!(render_report(&opts(0), &style, &passed), "✔ nb.ipynb\n");
        assert_eq!(
            render_report(&opts(1), &style, &passed),
            "✔ nb.ipynb\nRan 1 test\n\nOK\n"
        );
    }

    #[test]
    fn failures_show_transcript_and_errors_show_cause() {
        let style = Style::new(true, false);
        let failed = report(NotebookStatus::Failed, "FAILED (failures=1)\n", None);
        assert_eq!(
            render_report(&opts(0), &style, &failed),
            "✗ nb.ipynb\nFAILED (failures=1)\n"
        );
        let errored = report(
            NotebookStatus::Errored,
            "",
            Some("cell 1 raised ValueError: boom"),
        );
        assert_eq!(
            render_report(&opts(0), &style, &errored),
            "✖ nb.ipynb\ncell 1 raised ValueError: boom\n"
        );
    }

    #[test]
    fn quiet_mode_keeps_errored_causes() {
        let style = Style::new(true, false);
        let reports = vec![
            report(NotebookStatus::Passed, "OK\n", None),
            report(NotebookStatus::Failed, "FAILED\n", None),
            report(
                NotebookStatus::Errored,
                "",
                Some("cell 1 raised ValueError: boom"),
            ),
        ];
        assert_eq!(
            errored_causes(&style, &reports),
            vec!["nb.ipynb: cell 1 raised ValueError: boom".to_string()]
        );
    }

    #[test]
    fn reports_round_trip_through_details() {
        let outcome = cellcheck_core::outcome_from_reports(vec![report(
            NotebookStatus::Failed,
            "x",
            None,
        )]);
        let reports = reports_from_details(&outcome.details);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, NotebookStatus::Failed);
    }
}
