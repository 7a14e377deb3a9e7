//! Media processing actions.
//!
//! Each action builds a [`ToolCommand`](crate::ToolCommand) and hands it to
//! a [`CommandRunner`](crate::CommandRunner):
//! - Embedded subtitle track extraction (mkvextract)
//! - Subtitle search and download (subliminal)
//! - Re-encoding with per-stream copy/encode directives (ffmpeg)

mod download;
mod encode;
mod extract;

pub use download::{download_command, download_subtitles};
pub use encode::{encode, EncodeArgs, StreamDirective};
pub use extract::{extract_command, extract_subtitle_track};
