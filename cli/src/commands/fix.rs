//! Fix command - reassign conflicting host ports.

use std::path::PathBuf;

use anyhow::{bail, Result};
use portfix_core::{BackupPolicy, ComposeFile, ConfigStore};
use tracing::{info, warn};

use super::{load_documents, FileReport};
use crate::render;

pub async fn run(files: &[PathBuf], write: bool, no_backup: bool, json: bool) -> Result<()> {
    if !write && files.len() > 1 {
        bail!("fixing several files at once requires --write");
    }

    let documents = load_documents(files).await?;

    if !write {
        // Single document: fixed text on stdout, report beside it.
        let Some(document) = documents.first() else {
            return Ok(());
        };
        let outcome = document.fix();

        if json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            print!("{}", outcome.fixed_content);
            let file = document.path().display().to_string();
            eprint!("{}", render::report(&file, outcome.conflicts.as_ref(), true));
        }
        return Ok(());
    }

    if documents.iter().any(|d| d.is_stdin()) {
        bail!("--write cannot be used with standard input");
    }

    let policy = if no_backup {
        BackupPolicy::disabled()
    } else {
        let config = ConfigStore::new()?.load().await?;
        BackupPolicy::from(&config)
    };

    let mut reports = Vec::with_capacity(documents.len());
    for document in &documents {
        let report = fix_in_place(document, &policy).await;
        if !json {
            print!(
                "{}",
                render::report(&report.file, report.conflicts.as_ref(), report.error.is_none())
            );
            if let Some(error) = &report.error {
                eprintln!("{}: not written: {}", report.file, error);
            }
        }
        reports.push(report);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        bail!("{} of {} file(s) could not be written", failed, reports.len());
    }

    Ok(())
}

/// Fix one file on disk; a write failure is recorded in the report.
async fn fix_in_place(document: &ComposeFile, policy: &BackupPolicy) -> FileReport {
    let outcome = document.fix();
    let mut report = FileReport::new(document, None);

    if outcome.fixed_count() > 0 {
        match document.write_fixed(&outcome.fixed_content, policy).await {
            Ok(backup) => info!(
                file = %document.path().display(),
                fixed = outcome.fixed_count(),
                backup = ?backup,
                "rewrote compose file"
            ),
            Err(e) => {
                warn!(file = %document.path().display(), error = %e, "could not write fixed file");
                report.error = Some(e.to_string());
            }
        }
    }

    report.conflicts = outcome.conflicts;
    report
}
