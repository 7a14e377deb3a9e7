//! Per-file processing: inspect, transcode if needed, then subtitles.

use crate::config::Config;
use crate::error::{PrepError, Result};
use crate::record::VideoRecord;
use crate::subtitles::{SubtitleOutcome, SubtitleResolver};
use crate::transcode::{plan, TranscodeOutcome, Transcoder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};
use vidprep_av::probe::FfprobeProber;
use vidprep_av::tools::{FFMPEG, FFPROBE, MKVEXTRACT, SUBLIMINAL};
use vidprep_av::{CommandRunner, Prober, ToolRegistry};

/// Which stages run, and whether anything is actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub subtitles: bool,
    pub transcode: bool,
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            subtitles: true,
            transcode: true,
            dry_run: false,
        }
    }
}

/// Tools without which the run cannot start.
///
/// The extractor is never required: without it every video falls back to
/// the download service.
pub fn required_tools(config: &Config, options: &RunOptions) -> Vec<&'static str> {
    let mut tools = vec![FFPROBE];
    if options.transcode && !options.dry_run && !config.policy.is_permissive() {
        tools.push(FFMPEG);
    }
    if options.subtitles && !options.dry_run {
        tools.push(SUBLIMINAL);
    }
    tools
}

/// Fail with [`PrepError::MissingTool`] for the first required tool that is
/// not installed.
pub fn check_required_tools(
    config: &Config,
    options: &RunOptions,
    tools: &ToolRegistry,
) -> Result<()> {
    for tool in required_tools(config, options) {
        if !tools.is_available(tool) {
            return Err(PrepError::missing_tool(tool));
        }
    }
    if options.subtitles && !tools.is_available(MKVEXTRACT) {
        warn!(
            "{} not found, embedded subtitles will be downloaded instead",
            MKVEXTRACT
        );
    }
    Ok(())
}

/// How a file ended up, for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Succeeded,
    Skipped,
    Failed,
}

/// Everything that happened to one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub transcode: Option<TranscodeOutcome>,
    pub subtitles: Option<SubtitleOutcome>,
    pub errors: Vec<PrepError>,
}

impl FileReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            transcode: None,
            subtitles: None,
            errors: Vec::new(),
        }
    }

    pub fn status(&self) -> FileStatus {
        let failed = self.errors.iter().any(|e| {
            !matches!(
                e,
                PrepError::TranscodeConflict { .. } | PrepError::SubtitleNotFound { .. }
            )
        });
        if failed {
            return FileStatus::Failed;
        }

        let conflict = self
            .errors
            .iter()
            .any(|e| matches!(e, PrepError::TranscodeConflict { .. }));
        if conflict || self.transcode == Some(TranscodeOutcome::Cancelled) {
            return FileStatus::Skipped;
        }

        FileStatus::Succeeded
    }

    /// Path the transcoder wrote, if any.
    pub fn produced(&self) -> Option<&Path> {
        match &self.transcode {
            Some(TranscodeOutcome::Transcoded { output, .. }) => Some(output),
            _ => None,
        }
    }
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
    /// A stop was requested before every file was processed.
    pub cancelled: bool,
}

impl RunSummary {
    pub fn count(&self, status: FileStatus) -> usize {
        self.reports.iter().filter(|r| r.status() == status).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(FileStatus::Succeeded)
    }

    pub fn skipped(&self) -> usize {
        self.count(FileStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(FileStatus::Failed)
    }
}

/// Runs every stage for one file at a time.
pub struct FileProcessor {
    config: Config,
    tools: ToolRegistry,
    runner: Arc<dyn CommandRunner>,
    prober: Box<dyn Prober>,
    options: RunOptions,
    stop: Arc<AtomicBool>,
}

impl FileProcessor {
    /// Create a processor, failing if a required tool is missing.
    pub fn new(
        config: Config,
        tools: ToolRegistry,
        runner: Arc<dyn CommandRunner>,
        options: RunOptions,
    ) -> Result<Self> {
        check_required_tools(&config, &options, &tools)?;

        let ffprobe = tools
            .path(FFPROBE)
            .ok_or_else(|| PrepError::missing_tool(FFPROBE))?
            .to_path_buf();
        let prober = Box::new(FfprobeProber::new(ffprobe, Arc::clone(&runner)));

        Ok(Self {
            config,
            tools,
            runner,
            prober,
            options,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Share a stop flag, typically the one set by the signal handler.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn inspect(&self, path: &Path) -> Result<VideoRecord> {
        VideoRecord::inspect(path, self.prober.as_ref(), &self.config.subtitles.embedded_codecs)
    }

    /// Process one video. Errors are recorded in the report, never returned.
    pub fn process(&self, path: &Path) -> FileReport {
        let mut report = FileReport::new(path);

        let record = match self.inspect(path) {
            Ok(record) => record,
            Err(e) => {
                error!("{}", e);
                report.errors.push(e);
                return report;
            }
        };
        report.path = record.path().to_path_buf();

        let subject = if self.options.transcode {
            self.transcode(record, &mut report)
        } else {
            Some(record)
        };

        if !self.options.subtitles {
            return report;
        }
        let Some(subject) = subject else {
            return report;
        };

        let resolver = SubtitleResolver::new(self.runner.as_ref(), &self.tools, &self.config.subtitles)
            .dry_run(self.options.dry_run);
        match resolver.resolve(&subject) {
            Ok(outcome) => report.subtitles = Some(outcome),
            Err(e @ PrepError::SubtitleNotFound { .. }) => {
                warn!("{}", e);
                report.errors.push(e);
            }
            Err(e) => {
                error!("{}", e);
                report.errors.push(e);
            }
        }

        report
    }

    /// Returns the record subtitles should be resolved for, if any.
    fn transcode(&self, record: VideoRecord, report: &mut FileReport) -> Option<VideoRecord> {
        let plan = plan(&record, &self.config.policy);
        let transcoder = Transcoder::new(self.runner.as_ref(), &self.tools, &self.config.policy)
            .with_stop_signal(&self.stop)
            .dry_run(self.options.dry_run);

        match transcoder.execute(&record, &plan) {
            Ok(outcome) => {
                let next = match &outcome {
                    TranscodeOutcome::NotNeeded | TranscodeOutcome::Planned { .. } => Some(record),
                    TranscodeOutcome::Cancelled => None,
                    // Track indices may differ in the new file.
                    TranscodeOutcome::Transcoded { output, .. } => match self.inspect(output) {
                        Ok(fresh) => Some(fresh),
                        Err(e) => {
                            error!("{}", e);
                            report.errors.push(e);
                            None
                        }
                    },
                };
                report.transcode = Some(outcome);
                next
            }
            Err(e) => {
                if matches!(e, PrepError::TranscodeConflict { .. }) {
                    warn!("{}", e);
                } else {
                    error!("{}", e);
                }
                report.errors.push(e);
                // Only an original that was never moved gets subtitles.
                record.path().is_file().then_some(record)
            }
        }
    }

    /// Process every path in turn until done or a stop is requested.
    ///
    /// Outputs written earlier in the same run are not processed again when
    /// discovery yields them.
    pub fn run<I>(&self, paths: I) -> RunSummary
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut summary = RunSummary::default();
        let mut produced: HashSet<PathBuf> = HashSet::new();

        for path in paths {
            if self.stop_requested() {
                info!("Stop requested, not processing further files");
                summary.cancelled = true;
                break;
            }
            if produced.contains(&path) {
                continue;
            }

            info!("{}: Processing", path.display());
            let report = self.process(&path);
            if let Some(output) = report.produced() {
                produced.insert(output.to_path_buf());
            }
            summary.reports.push(report);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(permissive: bool) -> Config {
        let mut config = Config::default();
        if permissive {
            config.policy.unsupported_video_codecs.clear();
            config.policy.unsupported_audio_codecs.clear();
        }
        config
    }

    #[test]
    fn test_required_tools() {
        let options = RunOptions::default();
        assert_eq!(
            required_tools(&config_with(false), &options),
            vec![FFPROBE, FFMPEG, SUBLIMINAL]
        );
        assert_eq!(
            required_tools(&config_with(true), &options),
            vec![FFPROBE, SUBLIMINAL]
        );

        let dry = RunOptions {
            dry_run: true,
            ..RunOptions::default()
        };
        assert_eq!(required_tools(&config_with(false), &dry), vec![FFPROBE]);

        let transcode_only = RunOptions {
            subtitles: false,
            ..RunOptions::default()
        };
        assert_eq!(
            required_tools(&config_with(false), &transcode_only),
            vec![FFPROBE, FFMPEG]
        );
    }

    #[test]
    fn test_missing_tool_is_fatal() {
        let tools = ToolRegistry::from_paths([(FFPROBE, "/usr/bin/ffprobe")]);
        let err =
            check_required_tools(&Config::default(), &RunOptions::default(), &tools).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, PrepError::MissingTool { ref tool } if tool == FFMPEG));
    }

    #[test]
    fn test_report_status() {
        let mut report = FileReport::new(Path::new("/m/a.mkv"));
        assert_eq!(report.status(), FileStatus::Succeeded);

        report.errors.push(PrepError::SubtitleNotFound {
            path: PathBuf::from("/m/a.mkv"),
            language: "eng".to_string(),
        });
        assert_eq!(report.status(), FileStatus::Succeeded);

        report.errors.push(PrepError::TranscodeConflict {
            path: PathBuf::from("/m/a.mkv"),
            existing: PathBuf::from("/m/.original/a.mkv"),
        });
        assert_eq!(report.status(), FileStatus::Skipped);

        report.errors.push(PrepError::EncodeFailure {
            path: PathBuf::from("/m/a.mkv"),
            source: vidprep_av::Error::tool_failed("ffmpeg", "exited with status 1"),
        });
        assert_eq!(report.status(), FileStatus::Failed);
    }
}
