//! Builder for external tool invocations and the runner that executes them.
//!
//! Argument lists are assembled into a [`ToolCommand`] value first and only
//! then handed to a [`CommandRunner`]. Production code uses
//! [`SystemRunner`]; tests substitute a scripted runner so no real media
//! tool is needed.

use crate::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Output captured from a tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Process exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ToolOutput {
    /// Output of a process that exited with `code` and printed nothing.
    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    /// Output of a successful process that printed `stdout`.
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`Error::ToolFailed`].
    pub fn into_result(self, tool: &str) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        let status = match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        let message = if stderr.is_empty() {
            status
        } else {
            format!("{}: {}", status, stderr)
        };
        Err(Error::tool_failed(tool, message))
    }
}

/// A fully assembled external tool invocation.
///
/// # Example
///
/// ```
/// use vidprep_av::ToolCommand;
///
/// let mut cmd = ToolCommand::new("mkvextract");
/// cmd.arg("tracks").arg("/v/movie.mkv").arg("2:/v/movie.srt");
/// assert_eq!(cmd.to_command_line(), "mkvextract tracks /v/movie.mkv 2:/v/movie.srt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(s.as_ref().to_os_string());
        self
    }

    /// Append multiple arguments.
    pub fn args<I, S>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(iter.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Path of the program to run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments, in order.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments as lossy strings, convenient for assertions and logging.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// File name of the program, used to label errors.
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }

    /// Space-joined command line for logs. Not shell-escaped.
    pub fn to_command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Executes a [`ToolCommand`] and reports what happened.
///
/// Implementations return `Ok` for any process that ran to completion,
/// whatever its exit status; `Err` means the process could not be run at all.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

/// Runs commands as real child processes, blocking until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        tracing::debug!("Running command: {}", command.to_command_line());

        let mut cmd = Command::new(command.program());
        cmd.args(command.get_args());

        // Keep children out of the terminal's foreground group so Ctrl-C only
        // reaches us and a running encode is allowed to finish.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_not_found(command.tool_name())
            } else {
                Error::Io(e)
            }
        })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let mut cmd = ToolCommand::new("/usr/bin/ffmpeg");
        cmd.args(["-i", "in.mkv"]).arg("out.mkv");
        assert_eq!(cmd.tool_name(), "ffmpeg");
        assert_eq!(cmd.args_lossy(), vec!["-i", "in.mkv", "out.mkv"]);
        assert_eq!(cmd.to_command_line(), "/usr/bin/ffmpeg -i in.mkv out.mkv");
    }

    #[test]
    fn test_into_result() {
        assert!(ToolOutput::with_code(0).into_result("x").is_ok());

        let err = ToolOutput {
            code: Some(2),
            stdout: String::new(),
            stderr: "bad input\n".to_string(),
        }
        .into_result("mkvextract")
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "tool execution failed: mkvextract: exited with status 2: bad input"
        );

        let err = ToolOutput::default().into_result("ffmpeg").unwrap_err();
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_system_runner_nonexistent_tool() {
        let cmd = ToolCommand::new("nonexistent_tool_xyz_12345");
        let result = SystemRunner.run(&cmd);
        assert!(matches!(result, Err(Error::ToolNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let mut cmd = ToolCommand::new("sh");
        cmd.args(["-c", "echo hello; exit 3"]);
        let output = SystemRunner.run(&cmd).unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "hello");
        assert!(!output.success());
    }
}
