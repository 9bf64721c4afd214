use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

pub const DEFAULT_KERNEL: &str = "python3";

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// Which engine executes the assembled cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// `jupyter nbconvert --execute` against a real kernel.
    #[default]
    Jupyter,
    /// A bare interpreter running the bundled cell driver.
    Python,
}

impl EngineKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "jupyter" | "nbconvert" => Some(Self::Jupyter),
            "python" | "python3" => Some(Self::Python),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub kind: EngineKind,
    pub python: Option<String>,
    pub jupyter: Option<String>,
    pub kernel: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) engine: EngineConfig,
    pub(crate) jobs: usize,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    ///
    /// # Errors
    /// Returns an error when a `CELLCHECK_*` variable holds an unusable value.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_snapshot(&EnvSnapshot::capture())
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot) -> anyhow::Result<Self> {
        let kind = match snapshot.var("CELLCHECK_ENGINE") {
            Some(raw) => EngineKind::parse(raw).ok_or_else(|| {
                anyhow::anyhow!("CELLCHECK_ENGINE must be `jupyter` or `python` (got `{raw}`)")
            })?,
            None => EngineKind::default(),
        };
        let jobs = match snapshot.var("CELLCHECK_JOBS") {
            Some(raw) => parse_jobs(raw)?,
            None => 1,
        };
        Ok(Self {
            engine: EngineConfig {
                kind,
                python: snapshot.var("CELLCHECK_PYTHON").map(ToOwned::to_owned),
                jupyter: snapshot.var("CELLCHECK_JUPYTER").map(ToOwned::to_owned),
                kernel: snapshot
                    .var("CELLCHECK_KERNEL")
                    .unwrap_or(DEFAULT_KERNEL)
                    .to_string(),
            },
            jobs,
        })
    }

    #[must_use]
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    #[must_use]
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    #[must_use]
    pub fn with_engine_kind(mut self, kind: EngineKind) -> Self {
        self.engine.kind = kind;
        self
    }

    #[must_use]
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.engine.python = Some(python.into());
        self
    }

    #[must_use]
    pub fn with_jupyter(mut self, jupyter: impl Into<String>) -> Self {
        self.engine.jupyter = Some(jupyter.into());
        self
    }

    #[must_use]
    pub fn with_kernel(mut self, kernel: impl Into<String>) -> Self {
        self.engine.kernel = kernel.into();
        self
    }

    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }
}

fn parse_jobs(raw: &str) -> anyhow::Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => anyhow::bail!("CELLCHECK_JOBS must be a positive integer (got `{raw}`)"),
    }
}
