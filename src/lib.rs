//! vidprep - prepare a video library for a picky player
//!
//! Finds videos, re-encodes the streams the player cannot decode (keeping
//! the original under `.original/`), and makes sure each video has a
//! sibling `.srt` subtitle.
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod error;
pub mod processor;
pub mod record;
pub mod scanner;
pub mod signal;
pub mod subtitles;
pub mod transcode;

pub use error::{PrepError, Result};
