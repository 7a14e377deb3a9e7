//! Backup workspace for in-place transcoding.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use vidprep_common::paths::{backup_path_for, transcode_target_for};

/// The three paths involved in transcoding one file in place.
///
/// The source is moved into the `.original` directory beside it and the
/// encoder writes the target next to where the source used to be. Once the
/// source has been moved, only the backup (or a finished target) holds the
/// content; the backup is never deleted.
///
/// # Example
///
/// ```
/// use vidprep_av::Workspace;
/// use std::path::Path;
///
/// let ws = Workspace::new("/m/movie.avi", "mkv")?;
/// assert_eq!(ws.backup(), Path::new("/m/.original/movie.avi"));
/// assert_eq!(ws.target(), Path::new("/m/movie.mkv"));
/// # Ok::<(), vidprep_av::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    source: PathBuf,
    backup: PathBuf,
    target: PathBuf,
}

impl Workspace {
    /// Lay out the paths for transcoding `source` into `container`.
    pub fn new<P: AsRef<Path>>(source: P, container: &str) -> Result<Self> {
        let source = source.as_ref();
        if container.is_empty() || container.contains(std::path::is_separator) {
            return Err(Error::InvalidInput(format!(
                "invalid container extension: {:?}",
                container
            )));
        }

        Ok(Self {
            source: source.to_path_buf(),
            backup: backup_path_for(source)?,
            target: transcode_target_for(source, container),
        })
    }

    pub fn backup(&self) -> &Path {
        &self.backup
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Directory holding the backup.
    pub fn backup_dir(&self) -> &Path {
        self.backup.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Fail with [`Error::BackupExists`] if a backup is already in place.
    pub fn ensure_backup_free(&self) -> Result<()> {
        if self.backup.exists() {
            return Err(Error::BackupExists {
                path: self.backup.clone(),
            });
        }
        Ok(())
    }

    /// Fail with [`Error::TargetExists`] if the target is already in place.
    pub fn ensure_target_free(&self) -> Result<()> {
        if self.target.exists() {
            return Err(Error::TargetExists {
                path: self.target.clone(),
            });
        }
        Ok(())
    }

    /// Move the source into the backup directory, creating it if needed.
    ///
    /// The backup check is repeated right before the rename so a backup that
    /// appeared since planning is never overwritten.
    pub fn move_to_backup(&self) -> Result<()> {
        if !self.source.is_file() {
            return Err(Error::file_not_found(&self.source));
        }

        std::fs::create_dir_all(self.backup_dir())?;
        self.ensure_backup_free()?;
        std::fs::rename(&self.source, &self.backup)?;

        tracing::debug!("Moved {:?} to {:?}", self.source, self.backup);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_paths() {
        let ws = Workspace::new("/m/show/ep1.mkv", "mkv").unwrap();
        assert_eq!(ws.backup(), Path::new("/m/show/.original/ep1.mkv"));
        assert_eq!(ws.backup_dir(), Path::new("/m/show/.original"));
        assert_eq!(ws.target(), Path::new("/m/show/ep1.mkv"));
    }

    #[test]
    fn test_invalid_container() {
        assert!(Workspace::new("/m/a.mkv", "").is_err());
        assert!(Workspace::new("/m/a.mkv", "x/y").is_err());
    }

    #[test]
    fn test_move_to_backup() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("movie.avi");
        std::fs::write(&source, b"video").unwrap();

        let ws = Workspace::new(&source, "mkv").unwrap();
        ws.ensure_backup_free().unwrap();
        ws.move_to_backup().unwrap();

        assert!(!source.exists());
        assert_eq!(std::fs::read(ws.backup()).unwrap(), b"video");
        ws.ensure_target_free().unwrap();
    }

    #[test]
    fn test_move_refuses_existing_backup() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("movie.mkv");
        std::fs::write(&source, b"new").unwrap();
        std::fs::create_dir(dir.path().join(".original")).unwrap();
        std::fs::write(dir.path().join(".original/movie.mkv"), b"old").unwrap();

        let ws = Workspace::new(&source, "mkv").unwrap();
        assert!(matches!(ws.move_to_backup(), Err(Error::BackupExists { .. })));
        assert_eq!(std::fs::read(&source).unwrap(), b"new");
        assert_eq!(std::fs::read(ws.backup()).unwrap(), b"old");
    }

    #[test]
    fn test_target_exists() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("movie.avi");
        std::fs::write(&source, b"video").unwrap();
        std::fs::write(dir.path().join("movie.mkv"), b"done").unwrap();

        let ws = Workspace::new(&source, "mkv").unwrap();
        assert!(matches!(
            ws.ensure_target_free(),
            Err(Error::TargetExists { .. })
        ));
    }
}
