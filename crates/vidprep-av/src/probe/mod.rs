//! Media file probing.
//!
//! A [`Prober`] turns a file path into a [`MediaInfo`]. The only backend is
//! [`FfprobeProber`], which shells out to `ffprobe`.

mod ffprobe;
mod types;

pub use ffprobe::{parse_ffprobe_json, FfprobeProber};
pub use types::*;

use crate::Result;
use std::path::Path;

/// Something that can describe the streams of a media file.
pub trait Prober: Send + Sync {
    fn probe(&self, path: &Path) -> Result<MediaInfo>;
}
