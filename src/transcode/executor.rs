//! Carrying out a transcode plan in place.

use super::plan::TranscodePlan;
use crate::config::CodecPolicy;
use crate::error::{PrepError, Result};
use crate::record::VideoRecord;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};
use vidprep_av::actions::encode;
use vidprep_av::tools::FFMPEG;
use vidprep_av::{CommandRunner, Error as AvError, ToolRegistry, Workspace};

/// Result of a transcode attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeOutcome {
    /// All codecs are supported.
    NotNeeded,
    /// The encoder produced `output`; the original is at `backup`.
    Transcoded { output: PathBuf, backup: PathBuf },
    /// A stop was requested before anything was touched.
    Cancelled,
    /// Dry run: the encoder command that would have been run.
    Planned { command: String },
}

/// Moves originals aside and runs the encoder.
pub struct Transcoder<'a> {
    runner: &'a dyn CommandRunner,
    tools: &'a ToolRegistry,
    policy: &'a CodecPolicy,
    stop: Option<&'a AtomicBool>,
    dry_run: bool,
}

impl<'a> Transcoder<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        tools: &'a ToolRegistry,
        policy: &'a CodecPolicy,
    ) -> Self {
        Self {
            runner,
            tools,
            policy,
            stop: None,
            dry_run: false,
        }
    }

    /// Checked right before the original is moved and the encoder started.
    pub fn with_stop_signal(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Only log what would be done.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn stop_requested(&self) -> bool {
        self.stop.is_some_and(|s| s.load(Ordering::Relaxed))
    }

    /// Execute `plan` for `record`.
    ///
    /// # Errors
    ///
    /// - [`PrepError::TranscodeConflict`] if the backup exists (nothing is
    ///   touched) or if the target exists once the original has been moved
    ///   (the original stays at the backup path).
    /// - [`PrepError::Backup`] if the original could not be moved.
    /// - [`PrepError::EncodeFailure`] if the encoder is unavailable, fails,
    ///   or produces nothing. Partial output is removed and the original
    ///   stays at the backup path.
    pub fn execute(&self, record: &VideoRecord, plan: &TranscodePlan) -> Result<TranscodeOutcome> {
        if !plan.is_needed() {
            info!("{}: No transcoding needed", record.filename());
            return Ok(TranscodeOutcome::NotNeeded);
        }

        for codec in &plan.unsupported_video {
            warn!("{}: Unsupported video codec: {}", record.filename(), codec);
        }
        for codec in &plan.unsupported_audio {
            warn!("{}: Unsupported audio codec: {}", record.filename(), codec);
        }

        let path = record.path();
        let workspace = Workspace::new(path, &self.policy.container).map_err(|source| {
            PrepError::Backup {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let args = plan.encode_args(&workspace);

        workspace
            .ensure_backup_free()
            .map_err(|e| conflict_or_backup_error(path, e))?;

        if self.dry_run {
            let program = self.tools.path(FFMPEG).unwrap_or(Path::new(FFMPEG));
            let command = args.to_command(program).to_command_line();
            info!(
                "[DRY RUN] {}: Would move original to {}",
                record.filename(),
                workspace.backup().display()
            );
            info!("[DRY RUN] {}: Would run {}", record.filename(), command);
            return Ok(TranscodeOutcome::Planned { command });
        }

        let program = self.tools.require(FFMPEG).map_err(|source| PrepError::EncodeFailure {
            path: path.to_path_buf(),
            source,
        })?;

        if self.stop_requested() {
            info!("{}: Stop requested, not starting transcode", record.filename());
            return Ok(TranscodeOutcome::Cancelled);
        }

        info!("{}: Transcoding...", record.filename());

        workspace
            .move_to_backup()
            .map_err(|e| conflict_or_backup_error(path, e))?;

        // From here on the original only exists at the backup path.
        if let Err(e) = workspace.ensure_target_free() {
            info!("{}: Skipping already converted video", record.filename());
            return Err(conflict_or_backup_error(path, e));
        }

        encode(self.runner, program, &args).map_err(|source| PrepError::EncodeFailure {
            path: path.to_path_buf(),
            source,
        })?;

        if !workspace.target().is_file() {
            return Err(PrepError::EncodeFailure {
                path: path.to_path_buf(),
                source: AvError::tool_failed(FFMPEG, "encoder reported success but wrote no output"),
            });
        }

        info!("{}: Transcoded successfully", record.filename());
        Ok(TranscodeOutcome::Transcoded {
            output: workspace.target().to_path_buf(),
            backup: workspace.backup().to_path_buf(),
        })
    }
}

fn conflict_or_backup_error(path: &Path, err: AvError) -> PrepError {
    match err {
        AvError::BackupExists { path: existing } | AvError::TargetExists { path: existing } => {
            PrepError::TranscodeConflict {
                path: path.to_path_buf(),
                existing,
            }
        }
        source => PrepError::Backup {
            path: path.to_path_buf(),
            source,
        },
    }
}
