//! # vidprep-av
//!
//! External media tool plumbing for vidprep.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find ffprobe, ffmpeg,
//!   mkvextract and subliminal on `PATH` or at configured locations.
//! - **Command execution** ([`ToolCommand`], [`CommandRunner`]) -- argument
//!   lists are assembled as values and run through a swappable runner.
//! - **Probing** ([`probe::FfprobeProber`]) -- stream metadata from ffprobe.
//! - **Actions** ([`actions`]) -- subtitle extraction, subtitle download and
//!   re-encoding.
//! - **Backup layout** ([`Workspace`]) -- moving an original aside before it
//!   is transcoded in place.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use vidprep_av::probe::{FfprobeProber, Prober, StreamKind};
//! use vidprep_av::SystemRunner;
//!
//! let prober = FfprobeProber::new("ffprobe", Arc::new(SystemRunner));
//! let info = prober.probe(Path::new("/path/to/video.mkv"))?;
//! for stream in info.streams_of(StreamKind::Audio) {
//!     println!("audio #{}: {}", stream.index, stream.codec_name);
//! }
//! # Ok::<(), vidprep_av::Error>(())
//! ```

pub mod actions;
pub mod command;
mod error;
pub mod probe;
pub mod tools;
pub mod workspace;

// Re-exports
pub use command::{CommandRunner, SystemRunner, ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use probe::{MediaInfo, Prober, StreamInfo, StreamKind};
pub use tools::{ToolInfo, ToolRegistry, ToolsConfig};
pub use workspace::Workspace;
