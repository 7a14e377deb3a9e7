//! Shared test harness for integration tests.
//!
//! Provides [`FakeTools`], a [`CommandRunner`] that stands in for ffprobe,
//! ffmpeg, mkvextract and subliminal. A fake video file simply contains
//! the JSON ffprobe would print for it.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use vidprep::config::Config;
use vidprep::processor::{FileProcessor, RunOptions};
use vidprep_av::{CommandRunner, ToolCommand, ToolOutput, ToolRegistry};

/// ffprobe JSON for a file with the given `(codec_type, codec_name)` streams.
pub fn probe_json(streams: &[(&str, &str)]) -> String {
    let streams: Vec<serde_json::Value> = streams
        .iter()
        .enumerate()
        .map(|(index, (kind, codec))| {
            serde_json::json!({
                "index": index,
                "codec_type": kind,
                "codec_name": codec,
            })
        })
        .collect();

    serde_json::json!({
        "streams": streams,
        "format": {"format_name": "matroska,webm", "duration": "60.0"},
    })
    .to_string()
}

/// Write a fake video whose probe output lists `streams`.
pub fn write_video(path: &Path, streams: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, probe_json(streams)).unwrap();
}

/// Scripted stand-ins for the external tools.
pub struct FakeTools {
    /// Probe JSON written by the fake encoder.
    pub encoded: String,
    /// Exit code of the fake encoder. It writes its output either way.
    pub encoder_code: i32,
    /// Exit code of the fake extractor. It only writes on 0.
    pub extractor_code: i32,
    /// Whether the fake download service finds a subtitle.
    pub subtitles_online: bool,
    /// Raised by the fake encoder, as a signal arriving mid-run would.
    pub stop_on_encode: Option<Arc<AtomicBool>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeTools {
    pub fn new(encoded: String) -> Self {
        Self {
            encoded,
            encoder_code: 0,
            extractor_code: 0,
            subtitles_online: true,
            stop_on_encode: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every invocation so far, as tool name followed by arguments.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Invocations of one tool, arguments only.
    pub fn calls_to(&self, tool: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|call| call[0] == tool)
            .map(|call| call[1..].to_vec())
            .collect()
    }

    pub fn registry() -> ToolRegistry {
        ToolRegistry::from_paths([
            ("ffprobe", "/fake/ffprobe"),
            ("ffmpeg", "/fake/ffmpeg"),
            ("mkvextract", "/fake/mkvextract"),
            ("subliminal", "/fake/subliminal"),
        ])
    }
}

impl CommandRunner for FakeTools {
    fn run(&self, command: &ToolCommand) -> vidprep_av::Result<ToolOutput> {
        let tool = command.tool_name();
        let args = command.args_lossy();
        let mut call = vec![tool.clone()];
        call.extend(args.iter().cloned());
        self.calls.lock().unwrap().push(call);

        let last = PathBuf::from(args.last().cloned().unwrap_or_default());
        match tool.as_str() {
            "ffprobe" => match fs::read_to_string(&last) {
                Ok(json) => Ok(ToolOutput::with_stdout(json)),
                Err(_) => Ok(ToolOutput::with_code(1)),
            },
            "ffmpeg" => {
                if let Some(stop) = &self.stop_on_encode {
                    stop.store(true, Ordering::Relaxed);
                }
                fs::write(&last, &self.encoded).unwrap();
                Ok(ToolOutput::with_code(self.encoder_code))
            }
            "mkvextract" => {
                if self.extractor_code == 0 {
                    let spec = args.last().cloned().unwrap_or_default();
                    let (_, dest) = spec.split_once(':').unwrap();
                    fs::write(dest, "1\n00:00:01,000 --> 00:00:02,000\nHello\n").unwrap();
                }
                Ok(ToolOutput::with_code(self.extractor_code))
            }
            "subliminal" => {
                if self.subtitles_online {
                    fs::write(last.with_extension("srt"), "1\n00:00:01,000 --> 00:00:02,000\nHi\n")
                        .unwrap();
                }
                Ok(ToolOutput::with_code(0))
            }
            other => panic!("unexpected tool {other}"),
        }
    }
}

/// A processor wired to `tools` with every fake tool available.
pub fn processor(config: Config, tools: Arc<FakeTools>, options: RunOptions) -> FileProcessor {
    FileProcessor::new(config, FakeTools::registry(), tools, options).unwrap()
}
