//! Subtitle search and download through the `subliminal` client.

use crate::command::{CommandRunner, ToolCommand};
use crate::Result;
use std::path::{Path, PathBuf};
use vidprep_common::paths::subtitle_path_for;

/// `subliminal download -l <language> -s <video>`
///
/// `-s` makes subliminal save `<basename>.srt` without a language suffix.
pub fn download_command(program: &Path, video: &Path, language: &str) -> ToolCommand {
    let mut cmd = ToolCommand::new(program);
    cmd.args(["download", "-l", language, "-s"]).arg(video);
    cmd
}

/// Search for and download the best subtitle for `video` in `language`.
///
/// Returns the path of the saved subtitle, or `None` when no match was
/// found. subliminal exits 0 either way, so the outcome is read from the
/// filesystem: only a non-empty `.srt` counts.
pub fn download_subtitles(
    runner: &dyn CommandRunner,
    program: &Path,
    video: &Path,
    language: &str,
) -> Result<Option<PathBuf>> {
    tracing::debug!("Searching {} subtitles for {:?}", language, video);

    let cmd = download_command(program, video, language);
    runner.run(&cmd)?.into_result(&cmd.tool_name())?;

    let subtitle = subtitle_path_for(video);
    let saved = subtitle
        .metadata()
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false);
    if saved {
        Ok(Some(subtitle))
    } else {
        Ok(None)
    }
}
