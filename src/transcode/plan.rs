//! Deciding whether a video must be re-encoded, and how.

use crate::config::CodecPolicy;
use crate::record::VideoRecord;
use std::collections::BTreeSet;
use vidprep_av::actions::{EncodeArgs, StreamDirective};
use vidprep_av::{StreamKind, Workspace};

/// Per-kind verdict for one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodePlan {
    /// Video codecs found in the file that are in the unsupported set.
    pub unsupported_video: BTreeSet<String>,
    /// Audio codecs found in the file that are in the unsupported set.
    pub unsupported_audio: BTreeSet<String>,
    /// Directive for video streams.
    pub video: StreamDirective,
    /// Directive for audio streams.
    pub audio: StreamDirective,
}

impl TranscodePlan {
    pub fn video_ok(&self) -> bool {
        self.unsupported_video.is_empty()
    }

    pub fn audio_ok(&self) -> bool {
        self.unsupported_audio.is_empty()
    }

    /// Whether an encoder run is needed at all.
    pub fn is_needed(&self) -> bool {
        !(self.video_ok() && self.audio_ok())
    }

    /// Encoder arguments reading the backup and writing the target.
    pub fn encode_args(&self, workspace: &Workspace) -> EncodeArgs {
        EncodeArgs {
            input: workspace.backup().to_path_buf(),
            output: workspace.target().to_path_buf(),
            video: self.video.clone(),
            audio: self.audio.clone(),
        }
    }
}

/// Compare every stream of `record` against `policy`.
///
/// Codec names are matched exactly. The verdict for a kind is false as soon
/// as any stream of that kind uses an unsupported codec.
pub fn plan(record: &VideoRecord, policy: &CodecPolicy) -> TranscodePlan {
    let unsupported = |kind, set: &BTreeSet<String>| -> BTreeSet<String> {
        record
            .codecs(kind)
            .filter(|codec| set.contains(*codec))
            .map(String::from)
            .collect()
    };

    let unsupported_video = unsupported(StreamKind::Video, &policy.unsupported_video_codecs);
    let unsupported_audio = unsupported(StreamKind::Audio, &policy.unsupported_audio_codecs);

    let video = if unsupported_video.is_empty() {
        StreamDirective::Copy
    } else {
        StreamDirective::Encode {
            codec: policy.video_codec.clone(),
            preset: Some(policy.preset.clone()),
        }
    };

    let audio = if unsupported_audio.is_empty() {
        StreamDirective::Copy
    } else {
        StreamDirective::Encode {
            codec: policy.audio_codec.clone(),
            preset: None,
        }
    };

    TranscodePlan {
        unsupported_video,
        unsupported_audio,
        video,
        audio,
    }
}
