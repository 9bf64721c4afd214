#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Stdio};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("fixtures")
        .join("notebooks")
        .join(name)
}

fn succeeds(program: &str, args: &[&str]) -> bool {
    let status = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    matches!(status, Ok(code) if code.success())
}

pub fn find_python() -> Option<String> {
    let candidates = [
        std::env::var("PYTHON").ok(),
        Some("python3".to_string()),
        Some("python".to_string()),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|candidate| succeeds(candidate, &["--version"]))
}

/// A `jupyter` with nbconvert and a `python3` kernel installed.
pub fn find_jupyter() -> Option<String> {
    let jupyter = std::env::var("CELLCHECK_JUPYTER").unwrap_or_else(|_| "jupyter".to_string());
    if !succeeds(&jupyter, &["nbconvert", "--version"]) {
        return None;
    }
    let kernels = Command::new(&jupyter)
        .args(["kernelspec", "list"])
        .stderr(Stdio::null())
        .output()
        .ok()?;
    String::from_utf8_lossy(&kernels.stdout)
        .lines()
        .any(|line| line.split_whitespace().next() == Some("python3"))
        .then_some(jupyter)
}
