//! Check command - report port conflicts without modifying files.

use std::path::PathBuf;

use anyhow::Result;
use portfix_core::ConflictEngine;

use super::{load_documents, FileReport};
use crate::render;

/// Returns whether any document had conflicts.
pub async fn run(files: &[PathBuf], json: bool) -> Result<bool> {
    let documents = load_documents(files).await?;
    let engine = ConflictEngine::new();

    let reports: Vec<FileReport> = documents
        .iter()
        .map(|document| FileReport::new(document, engine.check(document.content())))
        .collect();
    let found = reports.iter().any(|r| r.conflicts.is_some());

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(found);
    }

    for report in &reports {
        print!("{}", render::report(&report.file, report.conflicts.as_ref(), false));
    }

    Ok(found)
}
