//! Loading and saving compose files.

use std::fs::Permissions;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::config::Config;
use crate::domain::FixOutcome;
use crate::engine::ConflictEngine;
use crate::error::{Error, Result};

/// Display name used for documents read from standard input.
pub const STDIN_NAME: &str = "<stdin>";

/// How the original file is preserved before an in-place fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupPolicy {
    pub enabled: bool,
    pub suffix: String,
    pub timestamped: bool,
}

impl BackupPolicy {
    /// Never write backups.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::from(&Config::default())
        }
    }

    /// Where the backup of `path` goes, or `None` if backups are off.
    pub fn backup_path(&self, path: &Path, now: DateTime<Local>) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }

        let file_name = path.file_name()?.to_string_lossy();
        let backup_name = if self.timestamped {
            format!(
                "{}.{}.{}",
                file_name,
                now.format("%Y%m%d-%H%M%S"),
                self.suffix
            )
        } else {
            format!("{}.{}", file_name, self.suffix)
        };

        Some(path.with_file_name(backup_name))
    }
}

impl From<&Config> for BackupPolicy {
    fn from(config: &Config) -> Self {
        Self {
            enabled: config.create_backup,
            suffix: config.backup_suffix.clone(),
            timestamped: config.timestamp_backups,
        }
    }
}

/// A compose document and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeFile {
    path: PathBuf,
    content: String,
}

impl ComposeFile {
    /// Wrap already-loaded text.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Read a compose file from disk.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).await?;
        let content = String::from_utf8(bytes).map_err(|e| Error::InvalidDocument {
            path: path.to_path_buf(),
            reason: format!("not valid UTF-8 ({})", e.utf8_error()),
        })?;

        debug!(path = %path.display(), bytes = content.len(), "read compose file");
        Ok(Self::new(path, content))
    }

    /// Read a compose document from standard input.
    pub async fn read_stdin() -> Result<Self> {
        let mut bytes = Vec::new();
        tokio::io::stdin().read_to_end(&mut bytes).await?;
        let content = String::from_utf8(bytes).map_err(|e| Error::InvalidDocument {
            path: PathBuf::from(STDIN_NAME),
            reason: format!("not valid UTF-8 ({})", e.utf8_error()),
        })?;
        Ok(Self::new(STDIN_NAME, content))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether this document came from standard input.
    pub fn is_stdin(&self) -> bool {
        self.path.as_os_str() == STDIN_NAME
    }

    /// Run the conflict engine over this document.
    pub fn fix(&self) -> FixOutcome {
        ConflictEngine::new().fix(&self.content)
    }

    /// Replace the file on disk with `content`.
    ///
    /// Symlinks are followed and the target keeps its permissions. Fails with
    /// [`Error::InvalidDocument`] if the file no longer holds the text it was
    /// read with. The original is copied aside first when the policy asks
    /// for it; the new content is written to a temp file and renamed over
    /// the original. Returns the backup path, if one was written.
    pub async fn write_fixed(&self, content: &str, policy: &BackupPolicy) -> Result<Option<PathBuf>> {
        if self.is_stdin() {
            return Err(Error::InvalidDocument {
                path: self.path.clone(),
                reason: "cannot write back to standard input".to_string(),
            });
        }

        let target = fs::canonicalize(&self.path).await?;
        if fs::read(&target).await? != self.content.as_bytes() {
            return Err(Error::InvalidDocument {
                path: self.path.clone(),
                reason: "file changed on disk since it was read".to_string(),
            });
        }

        let backup = policy.backup_path(&target, Local::now());
        if let Some(backup_path) = &backup {
            fs::copy(&target, backup_path).await?;
            debug!(backup = %backup_path.display(), "wrote backup");
        }

        let permissions = fs::metadata(&target).await?.permissions();
        replace_file(&temp_path_for(&target), &target, content, permissions).await?;

        debug!(path = %target.display(), "wrote fixed compose file");
        Ok(backup)
    }
}

/// Hidden sibling used while replacing `target`.
fn temp_path_for(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.portfix.tmp", file_name))
}

/// Write `content` to `temp_path` and rename it over `target`.
///
/// The temp file is removed again if any step fails.
async fn replace_file(
    temp_path: &Path,
    target: &Path,
    content: &str,
    permissions: Permissions,
) -> Result<()> {
    let written = write_and_rename(temp_path, target, content, permissions).await;
    if written.is_err() {
        if let Err(e) = fs::remove_file(temp_path).await {
            debug!(path = %temp_path.display(), error = %e, "could not remove temp file");
        }
    }
    Ok(written?)
}

async fn write_and_rename(
    temp_path: &Path,
    target: &Path,
    content: &str,
    permissions: Permissions,
) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path).await?;
    file.set_permissions(permissions).await?;
    file.write_all(content.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(temp_path, target).await
}
