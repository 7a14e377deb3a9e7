//! Error taxonomy for a vidprep run.
//!
//! Only [`PrepError::Configuration`] and [`PrepError::MissingTool`] stop the
//! run. Every other variant is scoped to a single file: it is reported and
//! the run moves on to the next file.

use std::path::PathBuf;

/// Result type alias using [`PrepError`].
pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    /// The run was started without anything to process.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required external binary is not installed.
    #[error("required tool not found: {tool}")]
    MissingTool { tool: String },

    /// The prober failed or produced unusable output.
    #[error("{}: failed to inspect: {source}", path.display())]
    Inspection {
        path: PathBuf,
        source: vidprep_av::Error,
    },

    /// Extracting the embedded subtitle track failed.
    #[error("{}: failed to extract embedded subtitles: {source}", path.display())]
    SubtitleExtraction {
        path: PathBuf,
        source: vidprep_av::Error,
    },

    /// The download service had no match for the requested language.
    #[error("{}: no {language} subtitles found online", path.display())]
    SubtitleNotFound { path: PathBuf, language: String },

    /// The download service itself could not be run.
    #[error("{}: subtitle download failed: {source}", path.display())]
    SubtitleDownload {
        path: PathBuf,
        source: vidprep_av::Error,
    },

    /// A backup or target from an earlier run is in the way.
    #[error("{}: transcoding cancelled, {} already exists", path.display(), existing.display())]
    TranscodeConflict { path: PathBuf, existing: PathBuf },

    /// Moving the original into the backup directory failed.
    #[error("{}: failed to back up original: {source}", path.display())]
    Backup {
        path: PathBuf,
        source: vidprep_av::Error,
    },

    /// The encoder exited non-zero or could not be started.
    #[error("{}: failed to transcode: {source}", path.display())]
    EncodeFailure {
        path: PathBuf,
        source: vidprep_av::Error,
    },
}

impl PrepError {
    /// Whether this error ends the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PrepError::Configuration(_) | PrepError::MissingTool { .. }
        )
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        PrepError::Configuration(msg.into())
    }

    pub fn missing_tool(tool: impl Into<String>) -> Self {
        PrepError::MissingTool { tool: tool.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        assert!(PrepError::configuration("nothing to do").is_fatal());
        assert!(PrepError::missing_tool("ffprobe").is_fatal());
        assert!(!PrepError::SubtitleNotFound {
            path: PathBuf::from("/m/a.mkv"),
            language: "eng".to_string(),
        }
        .is_fatal());
        assert!(!PrepError::EncodeFailure {
            path: PathBuf::from("/m/a.mkv"),
            source: vidprep_av::Error::tool_failed("ffmpeg", "exited with status 1"),
        }
        .is_fatal());
    }

    #[test]
    fn test_display() {
        let err = PrepError::TranscodeConflict {
            path: PathBuf::from("/m/a.mkv"),
            existing: PathBuf::from("/m/.original/a.mkv"),
        };
        assert_eq!(
            err.to_string(),
            "/m/a.mkv: transcoding cancelled, /m/.original/a.mkv already exists"
        );

        let err = PrepError::SubtitleNotFound {
            path: PathBuf::from("/m/a.mkv"),
            language: "eng".to_string(),
        };
        assert_eq!(err.to_string(), "/m/a.mkv: no eng subtitles found online");
    }
}
