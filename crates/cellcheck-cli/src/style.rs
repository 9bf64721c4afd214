use std::env;

use cellcheck_core::{CommandStatus, NotebookStatus};
use color_eyre::owo_colors::OwoColorize;

pub struct Style {
    enabled: bool,
}

impl Style {
    pub fn new(force_no_color: bool, is_tty: bool) -> Self {
        let env_no_color = env::var_os("NO_COLOR").is_some();
        Self {
            enabled: !(force_no_color || env_no_color) && is_tty,
        }
    }

    pub fn notebook(&self, status: NotebookStatus, text: &str) -> String {
        let (symbol, tone) = match status {
            NotebookStatus::Passed => ("✔", Tone::Green),
            NotebookStatus::Failed => ("✗", Tone::Yellow),
            NotebookStatus::Errored => ("✖", Tone::Red),
        };
        let line = format!("{symbol} {text}");
        self.paint(&line, tone, true)
    }

    pub fn status(&self, status: &CommandStatus, text: &str) -> String {
        let tone = match status {
            CommandStatus::Ok => Tone::Green,
            CommandStatus::UserError => Tone::Yellow,
            CommandStatus::Failure => Tone::Red,
        };
        self.paint(text, tone, true)
    }

    pub fn transcript(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        text.dimmed().to_string()
    }

    pub fn error_detail(&self, text: &str) -> String {
        self.paint(text, Tone::Red, false)
    }

    fn paint(&self, text: &str, tone: Tone, bold: bool) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match tone {
            Tone::Green => {
                if bold {
                    text.green().bold().to_string()
                } else {
                    text.green().to_string()
                }
            }
            Tone::Yellow => {
                if bold {
                    text.yellow().bold().to_string()
                } else {
                    text.yellow().to_string()
                }
            }
            Tone::Red => {
                if bold {
                    text.red().bold().to_string()
                } else {
                    text.red().to_string()
                }
            }
        }
    }
}

enum Tone {
    Green,
    Yellow,
    Red,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_when_disabled() {
        let style = Style::new(true, true);
        assert_eq!(
            style.notebook(NotebookStatus::Passed, "demo.ipynb"),
            "✔ demo.ipynb"
        );
        assert_eq!(
            style.notebook(NotebookStatus::Errored, "demo.ipynb"),
            "✖ demo.ipynb"
        );
        assert_eq!(style.transcript("OK"), "OK");
    }

    #[test]
    fn non_tty_disables_color() {
        let style = Style::new(false, false);
        assert_eq!(style.status(&CommandStatus::Failure, "x"), "x");
    }
}
