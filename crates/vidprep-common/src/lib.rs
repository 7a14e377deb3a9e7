//! Vidprep-Common: shared path conventions.
//!
//! Every component that has to agree on where things live on disk goes
//! through this crate:
//!
//! - **Video detection**: which extensions qualify a file for processing
//! - **Backup layout**: the reserved `.original` directory beside each video
//! - **Subtitle layout**: the sibling `.srt` file sharing the video's base name
//!
//! # Examples
//!
//! ```
//! use vidprep_common::paths::{backup_path_for, is_video_file, subtitle_path_for};
//! use std::path::Path;
//!
//! assert!(is_video_file(Path::new("movie.mkv")));
//! assert_eq!(subtitle_path_for(Path::new("/v/movie.mkv")), Path::new("/v/movie.srt"));
//! assert_eq!(
//!     backup_path_for(Path::new("/v/movie.mkv")).unwrap(),
//!     Path::new("/v/.original/movie.mkv")
//! );
//! ```

pub mod paths;

pub use paths::{PathError, BACKUP_DIR_NAME};
