use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

const NOTEBOOK_EXTENSION: &str = "ipynb";
const CHECKPOINT_DIR: &str = ".ipynb_checkpoints";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("path does not exist: {0}")]
    MissingPath(PathBuf),
    #[error("no notebooks found")]
    Empty,
}

/// Expands `paths` into a sorted, de-duplicated list of notebooks.
///
/// Files are taken as given; directories are searched recursively for
/// `*.ipynb`, ignoring Jupyter checkpoint copies.
pub fn discover_notebooks(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();
    for path in paths {
        if path.is_file() {
            found.insert(path.clone());
        } else if path.is_dir() {
            collect_dir(path, &mut found)?;
        } else {
            return Err(DiscoveryError::MissingPath(path.clone()).into());
        }
    }
    if found.is_empty() {
        return Err(DiscoveryError::Empty.into());
    }
    debug!(count = found.len(), "discovered notebooks");
    Ok(found.into_iter().collect())
}

fn collect_dir(root: &Path, found: &mut BTreeSet<PathBuf>) -> Result<()> {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_checkpoint_dir(entry));
    for entry in walker {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if entry.file_type().is_file() && is_notebook(entry.path()) {
            found.insert(entry.into_path());
        }
    }
    Ok(())
}

fn is_checkpoint_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == CHECKPOINT_DIR
}

fn is_notebook(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(NOTEBOOK_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, "{}").expect("write");
    }

    #[test]
    fn walks_directories_and_skips_checkpoints() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(&root.join("b.ipynb"));
        touch(&root.join("nested/a.ipynb"));
        touch(&root.join("nested/.ipynb_checkpoints/a-checkpoint.ipynb"));
        touch(&root.join("notes.md"));

        let found = discover_notebooks(&[root.to_path_buf()]).expect("discover");
        assert_eq!(
            found,
            vec![root.join("b.ipynb"), root.join("nested/a.ipynb")]
        );
    }

    #[test]
    fn explicit_files_are_kept_and_deduplicated() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("custom.json");
        touch(&file);
        let found =
            discover_notebooks(&[file.clone(), file.clone()]).expect("discover explicit file");
        assert_eq!(found, vec![file]);
    }

    #[test]
    fn missing_paths_and_empty_results_are_errors() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("nope");
        let err = discover_notebooks(&[missing.clone()]).expect_err("missing");
        assert_eq!(
            err.downcast_ref::<DiscoveryError>(),
            Some(&DiscoveryError::MissingPath(missing))
        );

        let err = discover_notebooks(&[temp.path().to_path_buf()]).expect_err("empty");
        assert_eq!(err.downcast_ref::<DiscoveryError>(), Some(&DiscoveryError::Empty));
    }
}
