//! Video file discovery.
//!
//! Turns a root directory and/or an explicit list of files into a lazy
//! sequence of absolute paths of supported videos. Anything inside a
//! `.original` backup directory is never yielded.

use crate::error::{PrepError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use vidprep_common::paths::{is_backup_dir_name, is_under_backup_dir, is_video_file};
use walkdir::{DirEntry, WalkDir};

type Walk = walkdir::FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>;

/// Lazy iterator over discovered videos: directory walk first, then the
/// explicit files in the order given.
pub struct Discovery {
    walk: Option<Walk>,
    files: std::vec::IntoIter<PathBuf>,
}

/// Start discovering videos under `directory` and among `files`.
///
/// # Errors
///
/// [`PrepError::Configuration`] if neither a directory nor any file is given.
pub fn discover(directory: Option<&Path>, files: &[PathBuf]) -> Result<Discovery> {
    if directory.is_none() && files.is_empty() {
        return Err(PrepError::configuration(
            "a directory or a file must be specified",
        ));
    }

    let walk = directory.map(|dir| {
        if !dir.is_dir() {
            warn!("Directory does not exist or is not a directory: {:?}", dir);
        }
        WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(not_backup_dir as fn(&DirEntry) -> bool)
    });

    Ok(Discovery {
        walk,
        files: files.to_vec().into_iter(),
    })
}

fn not_backup_dir(entry: &DirEntry) -> bool {
    !(entry.file_type().is_dir() && is_backup_dir_name(entry.file_name()))
}

/// Regular file with a supported extension.
fn qualifies(path: &Path) -> bool {
    path.is_file() && is_video_file(path)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

impl Iterator for Discovery {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        if let Some(walk) = self.walk.as_mut() {
            for entry in walk.by_ref() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable entry: {}", e);
                        continue;
                    }
                };

                let path = entry.path();
                if qualifies(path) {
                    // The root itself may sit inside a backup directory.
                    let path = absolute(path);
                    if is_under_backup_dir(&path) {
                        debug!("Ignoring backed up file: {:?}", path);
                        continue;
                    }
                    return Some(path);
                }
                if entry.file_type().is_file() {
                    debug!("Ignoring file: {:?}", path);
                }
            }
            self.walk = None;
        }

        for file in self.files.by_ref() {
            let path = absolute(&file);
            if is_under_backup_dir(&path) {
                warn!("Ignoring file inside a backup directory: {:?}", path);
                continue;
            }
            if qualifies(&path) {
                return Some(path);
            }
            debug!("Ignoring file: {:?}", path);
        }

        None
    }
}
