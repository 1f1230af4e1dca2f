//! Command implementations.

pub mod check;
pub mod config;
pub mod fix;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use portfix_core::{ComposeFile, Error, PortConflictsResult};
use serde::Serialize;
use tracing::debug;

/// Per-file entry of the JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    pub conflicts: Option<PortConflictsResult>,
    /// Set when the fixed file could not be written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(file: &ComposeFile, conflicts: Option<PortConflictsResult>) -> Self {
        Self {
            file: file.path().display().to_string(),
            conflicts,
            error: None,
        }
    }
}

fn is_stdin_arg(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Load every requested document.
///
/// `-` (or no arguments with piped input) reads standard input, at most once.
/// A file named more than once, under any spelling, is loaded once.
pub async fn load_documents(files: &[PathBuf]) -> Result<Vec<ComposeFile>> {
    if files.is_empty() {
        if atty::is(atty::Stream::Stdin) {
            return Err(Error::NoInput.into());
        }
        return Ok(vec![ComposeFile::read_stdin().await?]);
    }

    if files.iter().filter(|p| is_stdin_arg(p)).count() > 1 {
        anyhow::bail!("standard input (\"-\") can only be given once");
    }

    let mut seen = HashSet::new();
    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let document = if is_stdin_arg(path) {
            ComposeFile::read_stdin().await?
        } else {
            let resolved = tokio::fs::canonicalize(path).await?;
            if !seen.insert(resolved) {
                debug!(path = %path.display(), "file given more than once, skipping");
                continue;
            }
            ComposeFile::read(path).await?
        };
        documents.push(document);
    }

    Ok(documents)
}
