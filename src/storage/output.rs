use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

const BACKUP_SUFFIX: &str = ".bak";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output directory: {path}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to back up existing output: {path}")]
    Backup { path: PathBuf, source: io::Error },
    #[error("failed to write output: {path}")]
    Write { path: PathBuf, source: io::Error },
}

pub type OutputResult<T> = std::result::Result<T, OutputError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { backup: Option<PathBuf> },
    DryRun,
}

/// Writes generated artifacts, keeping the previous version of every file it
/// overwrites under `<file>.bak`. In dry-run mode nothing touches the disk.
#[derive(Debug, Default)]
pub struct OutputWriter {
    dry_run: bool,
    written: Vec<PathBuf>,
}

impl OutputWriter {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            written: Vec::new(),
        }
    }

    /// Every path written (or, in dry-run mode, that would have been written).
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn write(&mut self, path: &Path, contents: &str) -> OutputResult<WriteOutcome> {
        if self.dry_run {
            tracing::info!(
                "[dry run] would write {} ({} bytes)",
                path.display(),
                contents.len()
            );
            self.written.push(path.to_path_buf());
            return Ok(WriteOutcome::DryRun);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let backup = backup_existing(path)?;
        fs::write(path, contents).map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote");
        self.written.push(path.to_path_buf());
        Ok(WriteOutcome::Written { backup })
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn backup_existing(path: &Path) -> OutputResult<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }
    let backup = backup_path(path);
    fs::copy(path, &backup).map_err(|source| OutputError::Backup {
        path: backup.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), backup = %backup.display(), "backed up previous output");
    Ok(Some(backup))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_root() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let pid = std::process::id();
        path.push(format!("cascade-tokens-output-{pid}-{nanos}"));
        path
    }

    fn with_temp_root<F: FnOnce(&Path)>(f: F) {
        let root = fixture_root();
        fs::create_dir_all(&root).unwrap();
        f(&root);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/out/dive/component.css")),
            PathBuf::from("/out/dive/component.css.bak")
        );
    }

    #[test]
    fn first_write_creates_parents_without_backup() {
        with_temp_root(|root| {
            let target = root.join("theme").join("index.css");
            let mut writer = OutputWriter::new(false);

            let outcome = writer.write(&target, "@import './component.css';").unwrap();
            assert_eq!(outcome, WriteOutcome::Written { backup: None });
            assert_eq!(
                fs::read_to_string(&target).unwrap(),
                "@import './component.css';"
            );
            assert_eq!(writer.written(), &[target]);
        });
    }

    #[test]
    fn overwrite_preserves_previous_version() {
        with_temp_root(|root| {
            let target = root.join("index.css");
            fs::write(&target, "old").unwrap();
            let mut writer = OutputWriter::new(false);

            let outcome = writer.write(&target, "new").unwrap();
            let backup = backup_path(&target);
            assert_eq!(
                outcome,
                WriteOutcome::Written {
                    backup: Some(backup.clone())
                }
            );
            assert_eq!(fs::read_to_string(&target).unwrap(), "new");
            assert_eq!(fs::read_to_string(&backup).unwrap(), "old");
        });
    }

    #[test]
    fn dry_run_never_touches_disk() {
        with_temp_root(|root| {
            let target = root.join("nested").join("index.css");
            let mut writer = OutputWriter::new(true);

            let outcome = writer.write(&target, "content").unwrap();
            assert_eq!(outcome, WriteOutcome::DryRun);
            assert!(!target.exists());
            assert!(!root.join("nested").exists());
            assert_eq!(writer.written().len(), 1);
        });
    }
}
