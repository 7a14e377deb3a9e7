//! Transcoding videos whose codecs the target player cannot handle.
//!
//! [`plan`] compares a [`VideoRecord`](crate::record::VideoRecord) with the
//! [`CodecPolicy`](crate::config::CodecPolicy); [`Transcoder`] carries the
//! plan out, moving the original into `.original/` and re-encoding only the
//! stream kinds that need it.

mod executor;
mod plan;

pub use executor::{TranscodeOutcome, Transcoder};
pub use plan::{plan, TranscodePlan};
