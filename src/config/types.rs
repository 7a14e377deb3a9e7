use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use vidprep_av::ToolsConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub policy: CodecPolicy,

    #[serde(default)]
    pub subtitles: SubtitlePolicy,

    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Which codecs force a re-encode and what to re-encode into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodecPolicy {
    /// Output container extension
    #[serde(default = "default_container")]
    pub container: String,

    /// Encoder used for unsupported video streams
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// Encoder used for unsupported audio streams
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Encoder preset applied when video is re-encoded
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Video codec names (as reported by ffprobe) that force a re-encode
    #[serde(default = "default_unsupported_video")]
    pub unsupported_video_codecs: BTreeSet<String>,

    /// Audio codec names (as reported by ffprobe) that force a re-encode
    #[serde(default = "default_unsupported_audio")]
    pub unsupported_audio_codecs: BTreeSet<String>,
}

impl Default for CodecPolicy {
    fn default() -> Self {
        Self {
            container: default_container(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            preset: default_preset(),
            unsupported_video_codecs: default_unsupported_video(),
            unsupported_audio_codecs: default_unsupported_audio(),
        }
    }
}

impl CodecPolicy {
    /// True when no codec can ever force a re-encode.
    pub fn is_permissive(&self) -> bool {
        self.unsupported_video_codecs.is_empty() && self.unsupported_audio_codecs.is_empty()
    }
}

fn default_container() -> String {
    "mkv".to_string()
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "ac3".to_string()
}

fn default_preset() -> String {
    "slow".to_string()
}

fn default_unsupported_video() -> BTreeSet<String> {
    ["hevc"].into_iter().map(String::from).collect()
}

fn default_unsupported_audio() -> BTreeSet<String> {
    ["dts", "dca"].into_iter().map(String::from).collect()
}

/// How subtitles are obtained.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubtitlePolicy {
    /// Language requested from the download service
    #[serde(default = "default_language")]
    pub language: String,

    /// Download even when an embedded track could be extracted
    #[serde(default)]
    pub force_download: bool,

    /// Embedded subtitle codecs eligible for extraction; empty accepts any
    #[serde(default = "default_embedded_codecs")]
    pub embedded_codecs: Vec<String>,
}

impl Default for SubtitlePolicy {
    fn default() -> Self {
        Self {
            language: default_language(),
            force_download: false,
            embedded_codecs: default_embedded_codecs(),
        }
    }
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_embedded_codecs() -> Vec<String> {
    vec!["subrip".to_string()]
}
