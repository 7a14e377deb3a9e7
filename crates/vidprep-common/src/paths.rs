//! Path conventions for discovered videos and the files written beside them.
//!
//! The layout is externally visible and relied upon across runs: backed up
//! originals live in a `.original` directory next to the video, and
//! subtitles are written as `<basename>.srt` next to the video.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Name of the directory that holds pre-transcode originals.
pub const BACKUP_DIR_NAME: &str = ".original";

/// Extension used for external subtitles.
pub const SUBTITLE_EXTENSION: &str = "srt";

/// Extensions of files that qualify for processing. Matched case-sensitively.
const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "mpg", "mpeg", "divx"];

/// Errors raised when a path cannot be split into the parts we need.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// The path has no file name component (e.g. `/` or `..`).
    #[error("path has no file name: {}", .0.display())]
    NoFileName(PathBuf),
}

/// Check if a path has one of the supported video extensions.
///
/// Only the extension is inspected; whether the path is a regular file is
/// the caller's concern.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vidprep_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("/media/movie.mkv")));
/// assert!(is_video_file(Path::new("clip.mpeg")));
/// assert!(!is_video_file(Path::new("movie.MKV")));
/// assert!(!is_video_file(Path::new("movie.srt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Check whether a directory name is the reserved backup directory.
pub fn is_backup_dir_name(name: &OsStr) -> bool {
    name == BACKUP_DIR_NAME
}

/// Check whether any component of `path` is the reserved backup directory.
pub fn is_under_backup_dir(path: &Path) -> bool {
    path.parent()
        .map(|parent| parent.iter().any(is_backup_dir_name))
        .unwrap_or(false)
}

/// Path of the external subtitle belonging to `video`: same directory,
/// same base name, `.srt` extension.
pub fn subtitle_path_for(video: &Path) -> PathBuf {
    video.with_extension(SUBTITLE_EXTENSION)
}

/// Directory that holds backups for videos located in `directory`.
pub fn backup_dir_for(directory: &Path) -> PathBuf {
    directory.join(BACKUP_DIR_NAME)
}

/// Where `video` is moved to before it is transcoded.
pub fn backup_path_for(video: &Path) -> Result<PathBuf, PathError> {
    let file_name = video
        .file_name()
        .ok_or_else(|| PathError::NoFileName(video.to_path_buf()))?;
    let directory = video.parent().unwrap_or_else(|| Path::new(""));
    Ok(backup_dir_for(directory).join(file_name))
}

/// Path of the transcoded output for `video` in the given container.
///
/// When the container matches the source extension this is the source path
/// itself, which is why the source is moved away first.
pub fn transcode_target_for(video: &Path, container: &str) -> PathBuf {
    video.with_extension(container)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_video_file() {
        for ext in ["mkv", "mp4", "avi", "mpg", "mpeg", "divx"] {
            let name = format!("video.{}", ext);
            assert!(is_video_file(Path::new(&name)), "{} should qualify", name);
        }

        assert!(!is_video_file(Path::new("video.MKV")));
        assert!(!is_video_file(Path::new("video.Mp4")));
        assert!(!is_video_file(Path::new("video.webm")));
        assert!(!is_video_file(Path::new("video")));
        assert!(!is_video_file(Path::new("notes.txt")));
    }

    #[test]
    fn test_backup_dir_detection() {
        assert!(is_under_backup_dir(Path::new("/m/.original/movie.mkv")));
        assert!(is_under_backup_dir(Path::new("/m/.original/sub/movie.mkv")));
        assert!(!is_under_backup_dir(Path::new("/m/movie.mkv")));
        assert!(!is_under_backup_dir(Path::new("/m/original/movie.mkv")));
        assert!(!is_under_backup_dir(Path::new(".original")));
    }

    #[test]
    fn test_subtitle_path_for() {
        assert_eq!(
            subtitle_path_for(Path::new("/m/The Movie (2019).mkv")),
            PathBuf::from("/m/The Movie (2019).srt")
        );
        assert_eq!(
            subtitle_path_for(Path::new("/m/show.s01e01.mp4")),
            PathBuf::from("/m/show.s01e01.srt")
        );
    }

    #[test]
    fn test_backup_path_for() {
        assert_eq!(
            backup_path_for(Path::new("/m/movie.avi")).unwrap(),
            PathBuf::from("/m/.original/movie.avi")
        );
        assert!(backup_path_for(Path::new("/")).is_err());
    }

    #[test]
    fn test_transcode_target_for() {
        assert_eq!(
            transcode_target_for(Path::new("/m/movie.avi"), "mkv"),
            PathBuf::from("/m/movie.mkv")
        );
        assert_eq!(
            transcode_target_for(Path::new("/m/movie.mkv"), "mkv"),
            PathBuf::from("/m/movie.mkv")
        );
    }
}
