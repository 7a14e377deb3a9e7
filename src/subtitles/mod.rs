//! Subtitle resolution: keep an existing `.srt`, extract an embedded
//! track, or download one.

use crate::config::SubtitlePolicy;
use crate::error::{PrepError, Result};
use crate::record::VideoRecord;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use vidprep_av::actions::{download_command, download_subtitles, extract_command, extract_subtitle_track};
use vidprep_av::tools::{MKVEXTRACT, SUBLIMINAL};
use vidprep_av::{CommandRunner, ToolRegistry};

/// What the resolver decided to do for a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleAction {
    /// A sibling `.srt` already exists.
    AlreadySatisfied,
    /// Extract the embedded track with this index.
    Extract { track: u32 },
    /// Ask the download service.
    Download,
}

/// Decide how subtitles for `record` are obtained.
pub fn decide(record: &VideoRecord, policy: &SubtitlePolicy) -> SubtitleAction {
    if record.has_external_subtitle() {
        return SubtitleAction::AlreadySatisfied;
    }
    match record.embedded_subtitle_track_index() {
        Some(track) if !policy.force_download => SubtitleAction::Extract { track },
        _ => SubtitleAction::Download,
    }
}

/// Successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleOutcome {
    /// Nothing to do, the subtitle was already there.
    AlreadyPresent(PathBuf),
    /// Written from the embedded track.
    Extracted(PathBuf),
    /// Written by the download service.
    Downloaded(PathBuf),
    /// Dry run: the action that would have been taken.
    Planned(SubtitleAction),
}

/// Makes sure a video ends up with a sibling `.srt`. Never touches the
/// video file itself.
pub struct SubtitleResolver<'a> {
    runner: &'a dyn CommandRunner,
    tools: &'a ToolRegistry,
    policy: &'a SubtitlePolicy,
    dry_run: bool,
}

impl<'a> SubtitleResolver<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        tools: &'a ToolRegistry,
        policy: &'a SubtitlePolicy,
    ) -> Self {
        Self {
            runner,
            tools,
            policy,
            dry_run: false,
        }
    }

    /// Only log what would be done.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Resolve subtitles for `record`.
    ///
    /// A failed extraction is not fatal: it is logged and the download
    /// service is tried instead.
    ///
    /// # Errors
    ///
    /// - [`PrepError::SubtitleNotFound`] when the service has no match.
    /// - [`PrepError::SubtitleDownload`] when the service cannot be run.
    pub fn resolve(&self, record: &VideoRecord) -> Result<SubtitleOutcome> {
        let action = decide(record, self.policy);

        if self.dry_run {
            self.log_planned(record, action);
            return Ok(SubtitleOutcome::Planned(action));
        }

        match action {
            SubtitleAction::AlreadySatisfied => {
                info!("{}: Subtitles OK", record.filename());
                Ok(SubtitleOutcome::AlreadyPresent(record.subtitle_path()))
            }
            SubtitleAction::Extract { track } => match self.extract(record, track) {
                Ok(path) => Ok(SubtitleOutcome::Extracted(path)),
                Err(e) => {
                    warn!("{}; falling back to download", e);
                    self.download(record)
                }
            },
            SubtitleAction::Download => self.download(record),
        }
    }

    fn extract(&self, record: &VideoRecord, track: u32) -> Result<PathBuf> {
        info!("{}: Extracting embedded subtitles...", record.filename());
        let destination = record.subtitle_path();

        let to_error = |source| PrepError::SubtitleExtraction {
            path: record.path().to_path_buf(),
            source,
        };

        let program = self.tools.require(MKVEXTRACT).map_err(to_error)?;
        extract_subtitle_track(self.runner, program, record.path(), track, &destination)
            .map_err(to_error)?;

        info!("{}: Embedded subtitles extracted", record.filename());
        Ok(destination)
    }

    fn download(&self, record: &VideoRecord) -> Result<SubtitleOutcome> {
        info!("{}: Downloading subtitles...", record.filename());

        let to_error = |source| PrepError::SubtitleDownload {
            path: record.path().to_path_buf(),
            source,
        };

        let program = self.tools.require(SUBLIMINAL).map_err(to_error)?;
        match download_subtitles(self.runner, program, record.path(), &self.policy.language)
            .map_err(to_error)?
        {
            Some(path) => {
                info!("{}: Subtitles downloaded", record.filename());
                Ok(SubtitleOutcome::Downloaded(path))
            }
            None => Err(PrepError::SubtitleNotFound {
                path: record.path().to_path_buf(),
                language: self.policy.language.clone(),
            }),
        }
    }

    fn log_planned(&self, record: &VideoRecord, action: SubtitleAction) {
        match action {
            SubtitleAction::AlreadySatisfied => {
                info!("[DRY RUN] {}: Subtitles OK", record.filename());
            }
            SubtitleAction::Extract { track } => {
                let program = self.tools.path(MKVEXTRACT).unwrap_or(Path::new(MKVEXTRACT));
                let cmd = extract_command(program, record.path(), track, &record.subtitle_path());
                info!("[DRY RUN] {}: Would run {}", record.filename(), cmd.to_command_line());
            }
            SubtitleAction::Download => {
                let program = self.tools.path(SUBLIMINAL).unwrap_or(Path::new(SUBLIMINAL));
                let cmd = download_command(program, record.path(), &self.policy.language);
                info!("[DRY RUN] {}: Would run {}", record.filename(), cmd.to_command_line());
            }
        }
    }
}
