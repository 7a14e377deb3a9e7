//! Re-encoding with explicit per-stream copy/encode directives.

use crate::command::{CommandRunner, ToolCommand};
use crate::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// What the encoder should do with every stream of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamDirective {
    /// Pass the stream through unchanged.
    Copy,
    /// Re-encode with `codec`, optionally with an encoder preset.
    Encode {
        codec: String,
        preset: Option<String>,
    },
}

/// Arguments for one encoder invocation.
///
/// Subtitle streams are always stream-copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub video: StreamDirective,
    pub audio: StreamDirective,
}

impl EncodeArgs {
    /// Serialize into the ffmpeg argument list.
    ///
    /// ```
    /// use vidprep_av::actions::{EncodeArgs, StreamDirective};
    ///
    /// let args = EncodeArgs {
    ///     input: "/m/.original/a.mkv".into(),
    ///     output: "/m/a.mkv".into(),
    ///     video: StreamDirective::Encode { codec: "libx264".into(), preset: Some("slow".into()) },
    ///     audio: StreamDirective::Copy,
    /// };
    /// let line: Vec<String> = args.to_args().iter().map(|a| a.to_string_lossy().into_owned()).collect();
    /// assert_eq!(line.join(" "),
    ///     "-i /m/.original/a.mkv -nostats -loglevel 0 -c:v libx264 -preset slow -acodec copy -scodec copy /m/a.mkv");
    /// ```
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from("-i"), self.input.clone().into_os_string()];
        push_all(&mut args, ["-nostats", "-loglevel", "0"]);

        match &self.video {
            StreamDirective::Copy => push_all(&mut args, ["-vcodec", "copy"]),
            StreamDirective::Encode { codec, preset } => {
                push_all(&mut args, ["-c:v", codec.as_str()]);
                if let Some(preset) = preset {
                    push_all(&mut args, ["-preset", preset.as_str()]);
                }
            }
        }

        match &self.audio {
            StreamDirective::Copy => push_all(&mut args, ["-acodec", "copy"]),
            StreamDirective::Encode { codec, preset } => {
                push_all(&mut args, ["-c:a", codec.as_str()]);
                if let Some(preset) = preset {
                    push_all(&mut args, ["-preset", preset.as_str()]);
                }
            }
        }

        push_all(&mut args, ["-scodec", "copy"]);
        args.push(self.output.clone().into_os_string());
        args
    }

    /// The full encoder command.
    pub fn to_command(&self, program: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(program);
        cmd.args(self.to_args());
        cmd
    }
}

fn push_all<const N: usize>(args: &mut Vec<OsString>, items: [&str; N]) {
    args.extend(items.into_iter().map(OsString::from));
}

/// Run the encoder once.
///
/// If the encoder cannot be started or exits non-zero, whatever it wrote to
/// the output path is deleted before the error is returned.
pub fn encode(runner: &dyn CommandRunner, program: &Path, args: &EncodeArgs) -> Result<()> {
    let cmd = args.to_command(program);
    tracing::debug!("Encoding {:?} -> {:?}", args.input, args.output);

    let result = runner
        .run(&cmd)
        .and_then(|output| output.into_result(&cmd.tool_name()));

    if let Err(e) = result {
        if args.output.exists() {
            tracing::debug!("Removing partial output {:?}", args.output);
            if let Err(rm) = std::fs::remove_file(&args.output) {
                tracing::warn!("Failed to remove partial output {:?}: {}", args.output, rm);
            }
        }
        return Err(e);
    }

    Ok(())
}
