//! FFprobe-based media probing.

use super::types::*;
use super::Prober;
use crate::command::{CommandRunner, ToolCommand};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    format_name: String,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: u32,
    #[serde(default)]
    codec_type: String,
    codec_name: Option<String>,
}

/// Probes files by running `ffprobe` and parsing its JSON report.
#[derive(Clone)]
pub struct FfprobeProber {
    program: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl FfprobeProber {
    pub fn new(program: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// The command that probes `path`.
    pub fn command(&self, path: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.program);
        cmd.args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path);
        cmd
    }
}

impl std::fmt::Debug for FfprobeProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfprobeProber")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl Prober for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<MediaInfo> {
        let cmd = self.command(path);
        let output = self.runner.run(&cmd)?.into_result(&cmd.tool_name())?;
        parse_ffprobe_json(path, &output.stdout)
    }
}

/// Parse the JSON document printed by `ffprobe -show_format -show_streams`.
pub fn parse_ffprobe_json(path: &Path, json: &str) -> Result<MediaInfo> {
    if json.trim().is_empty() {
        return Err(Error::parse_error("ffprobe", "empty output"));
    }

    let output: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| Error::parse_error("ffprobe", e.to_string()))?;

    let container = output
        .format
        .map(|format| format.format_name)
        .unwrap_or_default();

    let streams = output
        .streams
        .into_iter()
        .map(|s| StreamInfo {
            kind: StreamKind::from_codec_type(&s.codec_type),
            codec_name: s.codec_name.unwrap_or_default(),
            index: s.index,
        })
        .collect();

    Ok(MediaInfo {
        file_path: path.to_path_buf(),
        container,
        streams,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ToolOutput;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_name": "hevc", "codec_type": "video", "width": 1920},
            {"index": 1, "codec_name": "dts", "codec_type": "audio", "channels": 6},
            {"index": 2, "codec_name": "subrip", "codec_type": "subtitle",
             "tags": {"language": "eng"}},
            {"index": 3, "codec_type": "attachment"}
        ],
        "format": {
            "filename": "/m/movie.mkv",
            "format_name": "matroska,webm",
            "duration": "5400.250000",
            "size": "123456"
        }
    }"#;

    struct FixedRunner(ToolOutput);

    impl CommandRunner for FixedRunner {
        fn run(&self, _command: &ToolCommand) -> Result<ToolOutput> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_parse_ffprobe_json() {
        let info = parse_ffprobe_json(Path::new("/m/movie.mkv"), SAMPLE).unwrap();
        assert_eq!(info.container, "matroska,webm");
        assert_eq!(
            info.streams,
            vec![
                StreamInfo::new(StreamKind::Video, "hevc", 0),
                StreamInfo::new(StreamKind::Audio, "dts", 1),
                StreamInfo::new(StreamKind::Subtitle, "subrip", 2),
                StreamInfo::new(StreamKind::Other, "", 3),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let path = Path::new("/m/movie.mkv");
        assert!(matches!(
            parse_ffprobe_json(path, ""),
            Err(Error::ParseError { .. })
        ));
        assert!(matches!(
            parse_ffprobe_json(path, "not json"),
            Err(Error::ParseError { .. })
        ));
    }

    #[test]
    fn test_prober_command() {
        let prober = FfprobeProber::new("/usr/bin/ffprobe", Arc::new(FixedRunner(ToolOutput::default())));
        let cmd = prober.command(Path::new("/m/movie.mkv"));
        assert_eq!(cmd.program(), Path::new("/usr/bin/ffprobe"));
        assert_eq!(
            cmd.args_lossy(),
            vec![
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                "/m/movie.mkv"
            ]
        );
    }

    #[test]
    fn test_prober_nonzero_exit() {
        let runner = FixedRunner(ToolOutput::with_code(1));
        let prober = FfprobeProber::new("ffprobe", Arc::new(runner));
        let result = prober.probe(Path::new("/m/broken.mkv"));
        assert!(matches!(result, Err(Error::ToolFailed { .. })));
    }

    #[test]
    fn test_prober_success() {
        let runner = FixedRunner(ToolOutput::with_stdout(SAMPLE));
        let prober = FfprobeProber::new("ffprobe", Arc::new(runner));
        let info = prober.probe(Path::new("/m/movie.mkv")).unwrap();
        assert_eq!(info.file_path, PathBuf::from("/m/movie.mkv"));
        assert_eq!(info.streams.len(), 4);
    }
}
