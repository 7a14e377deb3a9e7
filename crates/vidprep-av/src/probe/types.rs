//! Media information types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Information about a media file, as reported by the prober.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Path to the media file.
    pub file_path: PathBuf,
    /// Container format name as reported by the prober (e.g. "matroska,webm").
    pub container: String,
    /// Streams in container order.
    pub streams: Vec<StreamInfo>,
}

/// Kind of an elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    /// Data, attachments and anything else.
    Other,
}

impl StreamKind {
    /// Map a prober `codec_type` string onto a stream kind.
    pub fn from_codec_type(codec_type: &str) -> Self {
        match codec_type {
            "video" => StreamKind::Video,
            "audio" => StreamKind::Audio,
            "subtitle" => StreamKind::Subtitle,
            _ => StreamKind::Other,
        }
    }
}

/// One stream of a media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Stream kind.
    pub kind: StreamKind,
    /// Codec name (e.g. "hevc", "dts", "subrip"); empty if the prober gave none.
    pub codec_name: String,
    /// Container-level stream index, the track ID mkvextract expects.
    pub index: u32,
}

impl StreamInfo {
    pub fn new(kind: StreamKind, codec_name: impl Into<String>, index: u32) -> Self {
        Self {
            kind,
            codec_name: codec_name.into(),
            index,
        }
    }
}

impl MediaInfo {
    /// Streams of the given kind, in container order.
    pub fn streams_of(&self, kind: StreamKind) -> impl Iterator<Item = &StreamInfo> {
        self.streams.iter().filter(move |s| s.kind == kind)
    }

    /// First subtitle stream whose codec is in `codecs`, or the first
    /// subtitle stream of any codec when `codecs` is empty.
    pub fn first_subtitle<S: AsRef<str>>(&self, codecs: &[S]) -> Option<&StreamInfo> {
        self.streams_of(StreamKind::Subtitle).find(|s| {
            codecs.is_empty() || codecs.iter().any(|c| c.as_ref() == s.codec_name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> MediaInfo {
        MediaInfo {
            file_path: PathBuf::from("/m/movie.mkv"),
            container: "matroska,webm".to_string(),
            streams: vec![
                StreamInfo::new(StreamKind::Video, "hevc", 0),
                StreamInfo::new(StreamKind::Audio, "aac", 1),
                StreamInfo::new(StreamKind::Subtitle, "hdmv_pgs_subtitle", 2),
                StreamInfo::new(StreamKind::Subtitle, "subrip", 3),
            ],
        }
    }

    #[test]
    fn test_from_codec_type() {
        assert_eq!(StreamKind::from_codec_type("video"), StreamKind::Video);
        assert_eq!(StreamKind::from_codec_type("audio"), StreamKind::Audio);
        assert_eq!(StreamKind::from_codec_type("subtitle"), StreamKind::Subtitle);
        assert_eq!(StreamKind::from_codec_type("attachment"), StreamKind::Other);
        assert_eq!(StreamKind::from_codec_type("data"), StreamKind::Other);
    }

    #[test]
    fn test_first_subtitle() {
        let info = info();
        assert_eq!(info.first_subtitle(&["subrip"]).map(|s| s.index), Some(3));
        let any: &[&str] = &[];
        assert_eq!(info.first_subtitle(any).map(|s| s.index), Some(2));
        assert!(info.first_subtitle(&["ass"]).is_none());
    }

    #[test]
    fn test_streams_of() {
        let info = info();
        assert_eq!(info.streams_of(StreamKind::Subtitle).count(), 2);
        assert_eq!(info.streams_of(StreamKind::Other).count(), 0);
    }
}
