//! Embedded subtitle track extraction.

use crate::command::{CommandRunner, ToolCommand};
use crate::{Error, Result};
use std::ffi::OsString;
use std::path::Path;

/// `mkvextract tracks <video> <track>:<destination>`
pub fn extract_command(program: &Path, video: &Path, track: u32, destination: &Path) -> ToolCommand {
    let mut spec = OsString::from(format!("{}:", track));
    spec.push(destination);

    let mut cmd = ToolCommand::new(program);
    cmd.arg("tracks").arg(video).arg(spec);
    cmd
}

/// Extract subtitle `track` of `video` into `destination`.
///
/// mkvtoolnix exits with 1 when it only emitted warnings; that counts as
/// success as long as the destination was written. On failure any partial
/// destination file is removed so it is not mistaken for a subtitle later.
pub fn extract_subtitle_track(
    runner: &dyn CommandRunner,
    program: &Path,
    video: &Path,
    track: u32,
    destination: &Path,
) -> Result<()> {
    tracing::debug!(
        "Extracting track {} of {:?} to {:?}",
        track,
        video,
        destination
    );

    let cmd = extract_command(program, video, track, destination);
    let output = runner.run(&cmd)?;

    let written = is_non_empty_file(destination);

    let result = if written && (output.success() || output.code == Some(1)) {
        Ok(())
    } else if output.success() {
        Err(Error::tool_failed(
            cmd.tool_name(),
            format!("no subtitle written to {}", destination.display()),
        ))
    } else {
        output.into_result(&cmd.tool_name()).map(|_| ())
    };

    if result.is_err() && destination.exists() {
        tracing::debug!("Removing partial subtitle {:?}", destination);
        if let Err(rm) = std::fs::remove_file(destination) {
            tracing::warn!("Failed to remove partial subtitle {:?}: {}", destination, rm);
        }
    }

    result
}

fn is_non_empty_file(path: &Path) -> bool {
    path.metadata()
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}
