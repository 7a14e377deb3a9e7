use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;
use vidprep::config::Config;
use vidprep::processor::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "vidprep")]
#[command(
    author,
    version,
    about = "Transcode videos with unsupported codecs and fetch their subtitles"
)]
pub struct Cli {
    /// Video files to process
    pub files: Vec<PathBuf>,

    /// Directory to scan recursively for videos
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output container extension
    #[arg(short, long)]
    pub container: Option<String>,

    /// Video codec used when re-encoding
    #[arg(long, alias = "video-codec")]
    pub vcodec: Option<String>,

    /// Audio codec used when re-encoding
    #[arg(long, alias = "audio-codec")]
    pub acodec: Option<String>,

    /// Encoder preset for re-encoded video
    #[arg(long)]
    pub preset: Option<String>,

    /// Video codecs that force a re-encode
    #[arg(long, alias = "unsupported-vcodecs", num_args = 0.., value_name = "CODEC")]
    pub unsupported_video_codecs: Option<Vec<String>>,

    /// Audio codecs that force a re-encode
    #[arg(long, alias = "unsupported-acodecs", num_args = 0.., value_name = "CODEC")]
    pub unsupported_audio_codecs: Option<Vec<String>>,

    /// Subtitle language to download
    #[arg(short, long)]
    pub language: Option<String>,

    /// Download subtitles even when an embedded track exists
    #[arg(long)]
    pub download_subtitles: bool,

    /// Embedded subtitle codecs eligible for extraction (none means any)
    #[arg(long, num_args = 0.., value_name = "CODEC")]
    pub subtitle_codecs: Option<Vec<String>>,

    /// Only transcode, leave subtitles alone
    #[arg(long, conflicts_with = "skip_transcode")]
    pub skip_subtitles: bool,

    /// Only fetch subtitles, never transcode
    #[arg(long)]
    pub skip_transcode: bool,

    /// Show what would be done without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Check that the external tools are available and exit
    #[arg(long)]
    pub check_tools: bool,

    /// Logging level (RUST_LOG takes precedence when set)
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Level name understood by `tracing_subscriber::EnvFilter`.
    pub fn filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut Config) {
        let policy = &mut config.policy;
        if let Some(container) = &self.container {
            policy.container = container.clone();
        }
        if let Some(codec) = &self.vcodec {
            policy.video_codec = codec.clone();
        }
        if let Some(codec) = &self.acodec {
            policy.audio_codec = codec.clone();
        }
        if let Some(preset) = &self.preset {
            policy.preset = preset.clone();
        }
        if let Some(codecs) = &self.unsupported_video_codecs {
            policy.unsupported_video_codecs = codecs.iter().cloned().collect();
        }
        if let Some(codecs) = &self.unsupported_audio_codecs {
            policy.unsupported_audio_codecs = codecs.iter().cloned().collect();
        }

        let subtitles = &mut config.subtitles;
        if let Some(language) = &self.language {
            subtitles.language = language.clone();
        }
        if self.download_subtitles {
            subtitles.force_download = true;
        }
        if let Some(codecs) = &self.subtitle_codecs {
            subtitles.embedded_codecs = codecs.clone();
        }
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            subtitles: !self.skip_subtitles,
            transcode: !self.skip_transcode,
            dry_run: self.dry_run,
        }
    }
}

/// Multi-letter short flags kept for compatibility, with their long forms.
const LEGACY_FLAGS: &[(&str, &str)] = &[
    ("-vc", "--vcodec"),
    ("-ac", "--acodec"),
    ("-uv", "--unsupported-video-codecs"),
    ("-ua", "--unsupported-audio-codecs"),
    ("-ds", "--download-subtitles"),
];

/// Rewrite legacy flags such as `-vc libx265` to their long forms.
///
/// Arguments after `--` are left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut positional_only = false;

    for arg in args {
        if positional_only {
            normalized.push(arg);
            continue;
        }
        if arg == "--" {
            positional_only = true;
            normalized.push(arg);
            continue;
        }
        match arg.to_str().and_then(rewrite_legacy) {
            Some(long) => normalized.push(OsString::from(long)),
            None => normalized.push(arg),
        }
    }

    normalized
}

fn rewrite_legacy(arg: &str) -> Option<String> {
    let (flag, value) = match arg.split_once('=') {
        Some((flag, value)) => (flag, Some(value)),
        None => (arg, None),
    };
    let (_, long) = LEGACY_FLAGS.iter().find(|(short, _)| *short == flag)?;

    Some(match value {
        Some(value) => format!("{}={}", long, value),
        None => long.to_string(),
    })
}
