//! What is known about one discovered video.

use crate::error::{PrepError, Result};
use std::path::{Path, PathBuf};
use vidprep_av::{MediaInfo, Prober, StreamInfo, StreamKind};
use vidprep_common::paths::subtitle_path_for;

/// A discovered video plus the facts learned from a single inspection.
///
/// Records are never updated. After a transcode the output is inspected
/// into a fresh record instead.
#[derive(Debug, Clone)]
pub struct VideoRecord {
    path: PathBuf,
    directory: PathBuf,
    filename: String,
    basename: String,
    extension: String,
    container: String,
    streams: Vec<StreamInfo>,
    embedded_subtitle_track: Option<u32>,
    has_external_subtitle: bool,
}

impl VideoRecord {
    /// Probe `path` once and derive the subtitle facts.
    ///
    /// `embedded_codecs` limits which subtitle codecs count as extractable;
    /// an empty list accepts any.
    pub fn inspect<S: AsRef<str>>(
        path: &Path,
        prober: &dyn Prober,
        embedded_codecs: &[S],
    ) -> Result<Self> {
        let path = std::path::absolute(path).map_err(|e| PrepError::Inspection {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        let info = prober.probe(&path).map_err(|source| PrepError::Inspection {
            path: path.clone(),
            source,
        })?;

        Ok(Self::from_media_info(path, info, embedded_codecs))
    }

    /// Build a record from an already obtained probe result.
    pub fn from_media_info<S: AsRef<str>>(
        path: PathBuf,
        info: MediaInfo,
        embedded_codecs: &[S],
    ) -> Self {
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let lossy = |s: Option<&std::ffi::OsStr>| {
            s.map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let filename = lossy(path.file_name());
        let basename = lossy(path.file_stem());
        let extension = lossy(path.extension());

        let embedded_subtitle_track = info.first_subtitle(embedded_codecs).map(|s| s.index);
        let has_external_subtitle = subtitle_path_for(&path).is_file();

        Self {
            path,
            directory,
            filename,
            basename,
            extension,
            container: info.container,
            streams: info.streams,
            embedded_subtitle_track,
            has_external_subtitle,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Container format name reported by the prober.
    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn streams(&self) -> &[StreamInfo] {
        &self.streams
    }

    /// Codec names of all streams of `kind`.
    pub fn codecs(&self, kind: StreamKind) -> impl Iterator<Item = &str> {
        self.streams
            .iter()
            .filter(move |s| s.kind == kind)
            .map(|s| s.codec_name.as_str())
    }

    pub fn has_embedded_subtitle(&self) -> bool {
        self.embedded_subtitle_track.is_some()
    }

    /// Track index of the first extractable embedded subtitle.
    pub fn embedded_subtitle_track_index(&self) -> Option<u32> {
        self.embedded_subtitle_track
    }

    /// Whether `<basename>.srt` existed beside the video at inspection time.
    pub fn has_external_subtitle(&self) -> bool {
        self.has_external_subtitle
    }

    /// Where the external subtitle for this video lives (or would live).
    pub fn subtitle_path(&self) -> PathBuf {
        subtitle_path_for(&self.path)
    }
}
